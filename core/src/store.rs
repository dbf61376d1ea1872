//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The autosaver and the runner call store methods; they never execute
//! SQL directly. The store knows nothing about the snapshot format: it
//! keeps opaque JSON text per named slot.

use crate::{error::SimResult, types::Millis};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

/// Slot the autosaver writes and startup restores from.
pub const AUTOSAVE_SLOT: &str = "mycelial-empire:autosave";

/// One stored save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRecord {
    pub slot:     String,
    pub save_id:  String,
    pub payload:  String,
    pub saved_at: Millis,
}

pub struct SaveStore {
    conn: Connection,
}

impl SaveStore {
    /// Open (or create) the save database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_save_slots.sql"))?;
        Ok(())
    }

    // ── Save slots ─────────────────────────────────────────────

    /// Overwrite `slot` with `payload`. Returns the fresh save id.
    pub fn write_slot(&self, slot: &str, payload: &str, saved_at: Millis) -> SimResult<String> {
        let save_id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO save_slot (slot, save_id, payload, saved_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(slot) DO UPDATE SET
                save_id  = excluded.save_id,
                payload  = excluded.payload,
                saved_at = excluded.saved_at",
            params![slot, save_id, payload, saved_at],
        )?;
        Ok(save_id)
    }

    /// Payload text of `slot`, if anything was ever saved there.
    pub fn read_slot(&self, slot: &str) -> SimResult<Option<String>> {
        Ok(self
            .load_slot(slot)?
            .map(|record| record.payload))
    }

    pub fn load_slot(&self, slot: &str) -> SimResult<Option<SaveRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT slot, save_id, payload, saved_at FROM save_slot WHERE slot = ?1",
                params![slot],
                |row| {
                    Ok(SaveRecord {
                        slot:     row.get(0)?,
                        save_id:  row.get(1)?,
                        payload:  row.get(2)?,
                        saved_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Remove `slot`. Returns whether anything was deleted.
    pub fn clear_slot(&self, slot: &str) -> SimResult<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM save_slot WHERE slot = ?1", params![slot])?;
        Ok(deleted > 0)
    }

    pub fn slot_names(&self) -> SimResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT slot FROM save_slot ORDER BY slot")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}
