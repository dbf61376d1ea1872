//! Autosave, startup restore, import and export.
//!
//! RULE: nothing in here may leave the engine half-loaded or stop the
//! simulation. Every failure is logged and handed back as an error
//! `Notice`; the live state is only replaced after a payload validated.

use crate::{
    config::AutosaveSettings,
    driver::PeriodicDriver,
    engine::SimEngine,
    error::{SimError, SimResult},
    notice::Notice,
    store::{SaveStore, AUTOSAVE_SLOT},
    types::Millis,
};
use log::{info, warn};

/// Periodically writes the engine's snapshot into the autosave slot.
pub struct Autosaver {
    settings:      AutosaveSettings,
    driver:        PeriodicDriver,
    last_saved_at: Option<Millis>,
}

impl Autosaver {
    pub fn new(settings: AutosaveSettings) -> Self {
        let settings = settings.clamped();
        Self {
            driver: PeriodicDriver::new(settings.interval_ms as Millis),
            settings,
            last_saved_at: None,
        }
    }

    pub fn settings(&self) -> AutosaveSettings {
        self.settings
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.settings.enabled = enabled;
        self.driver.reset();
    }

    /// Snapped to 5s steps within [10s, 120s]; restarts the period.
    pub fn set_interval_ms(&mut self, interval_ms: u64) {
        self.settings.set_interval_ms(interval_ms);
        self.driver.set_interval_ms(self.settings.interval_ms as Millis);
        self.driver.reset();
    }

    pub fn last_saved_at(&self) -> Option<Millis> {
        self.last_saved_at
    }

    /// Feed elapsed time. Saves once if at least one interval passed.
    /// Returns a notice only when a due save failed.
    pub fn advance(&mut self, engine: &SimEngine, store: &SaveStore, elapsed_ms: Millis) -> Option<Notice> {
        if !self.settings.enabled {
            return None;
        }
        if self.driver.advance(elapsed_ms) == 0 {
            return None;
        }
        self.save_now(engine, store).err()
    }

    /// Write the snapshot immediately. Returns the save timestamp.
    pub fn save_now(&mut self, engine: &SimEngine, store: &SaveStore) -> Result<Millis, Notice> {
        match write_autosave(engine, store) {
            Ok(saved_at) => {
                info!("tick={} autosaved", engine.tick());
                self.last_saved_at = Some(saved_at);
                Ok(saved_at)
            }
            Err(e) => {
                warn!("tick={} autosave failed: {e}", engine.tick());
                Err(Notice::error("Autosave failed", e.to_string()))
            }
        }
    }
}

fn write_autosave(engine: &SimEngine, store: &SaveStore) -> SimResult<Millis> {
    let snapshot = engine.serialize();
    let payload = snapshot.to_json()?;
    store.write_slot(AUTOSAVE_SLOT, &payload, snapshot.timestamp)?;
    Ok(snapshot.timestamp)
}

/// Read the autosave slot once and hydrate from it.
///
/// `None` when the slot is empty. A corrupted slot yields an error notice
/// and leaves the engine on its fresh colony.
pub fn restore_on_startup(engine: &mut SimEngine, store: &SaveStore) -> Option<Notice> {
    let cached = match store.read_slot(AUTOSAVE_SLOT) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(e) => {
            warn!("autosave slot unreadable: {e}");
            return Some(Notice::error("Autosave corrupted", e.to_string()));
        }
    };

    match engine.load_json(&cached) {
        Ok(()) => Some(Notice::info(
            "Autosave restored",
            "Loaded your most recent colony snapshot.",
        )),
        Err(e) => Some(Notice::error("Autosave corrupted", e.to_string())),
    }
}

/// Pretty-printed snapshot, also written to the autosave slot.
pub fn export_save(engine: &SimEngine, store: &SaveStore) -> Result<String, Notice> {
    let export = || -> SimResult<String> {
        let snapshot = engine.serialize();
        let text = snapshot.to_json_pretty()?;
        store.write_slot(AUTOSAVE_SLOT, &text, snapshot.timestamp)?;
        Ok(text)
    };
    export().map_err(|e| {
        warn!("tick={} export failed: {e}", engine.tick());
        Notice::error("Export failed", e.to_string())
    })
}

/// Validate `text`, hydrate from it and make it the new autosave.
pub fn import_save(engine: &mut SimEngine, store: &SaveStore, text: &str) -> Notice {
    if let Err(e) = engine.load_json(text) {
        return Notice::error("Import failed", e.to_string());
    }

    let snapshot = engine.serialize();
    let persisted = snapshot
        .to_json()
        .map_err(SimError::from)
        .and_then(|payload| store.write_slot(AUTOSAVE_SLOT, &payload, snapshot.timestamp));
    match persisted {
        Ok(_) => Notice::success("Save loaded", "Network restored from file."),
        Err(e) => {
            // The colony is loaded; only the slot write failed.
            warn!("tick={} imported save not persisted: {e}", engine.tick());
            Notice::error(
                "Save loaded but not stored",
                format!("Network restored from file, but the autosave slot could not be written: {e}"),
            )
        }
    }
}
