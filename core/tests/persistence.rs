//! Save slots, autosave, startup restore, import and export.

use mycelium_core::{
    autosave::{export_save, import_save, restore_on_startup, Autosaver},
    config::AutosaveSettings,
    engine::SimEngine,
    notice::NoticeIntent,
    snapshot::parse_str,
    store::{SaveStore, AUTOSAVE_SLOT},
};

fn store() -> SaveStore {
    let store = SaveStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn settings(interval_ms: u64) -> AutosaveSettings {
    AutosaveSettings { enabled: true, interval_ms }
}

// ── Store ────────────────────────────────────────────────────

#[test]
fn slots_overwrite_in_place_with_fresh_ids() {
    let store = store();
    assert_eq!(store.read_slot(AUTOSAVE_SLOT).expect("read"), None);

    let first = store.write_slot(AUTOSAVE_SLOT, "{\"a\":1}", 10).expect("write");
    let second = store.write_slot(AUTOSAVE_SLOT, "{\"a\":2}", 20).expect("write");

    assert_ne!(first, second);
    let record = store.load_slot(AUTOSAVE_SLOT).expect("load").expect("present");
    assert_eq!(record.payload, "{\"a\":2}");
    assert_eq!(record.save_id, second);
    assert_eq!(record.saved_at, 20);
    assert_eq!(store.slot_names().expect("names"), vec![AUTOSAVE_SLOT.to_string()]);

    assert!(store.clear_slot(AUTOSAVE_SLOT).expect("clear"));
    assert_eq!(store.read_slot(AUTOSAVE_SLOT).expect("read"), None);
}

#[test]
fn file_store_opens_in_wal_mode_and_persists() {
    let path = std::env::temp_dir().join(format!("mycelium-{}.db", uuid::Uuid::new_v4()));
    let path = path.to_str().expect("utf-8 temp path").to_string();
    {
        let store = SaveStore::open(&path).expect("open file store");
        store.migrate().expect("migration");
        store.write_slot(AUTOSAVE_SLOT, "{}", 5).expect("write");
    }

    let store = SaveStore::open(&path).expect("reopen");
    assert_eq!(store.read_slot(AUTOSAVE_SLOT).expect("read"), Some("{}".to_string()));
    drop(store);
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{path}{suffix}"));
    }
}

#[test]
fn migrate_is_idempotent() {
    let store = store();
    store.migrate().expect("second migration");
}

// ── Autosave ─────────────────────────────────────────────────

#[test]
fn autosave_fires_once_per_interval() {
    let store = store();
    let mut engine = SimEngine::build_test(61);
    let mut autosaver = Autosaver::new(settings(10_000));

    assert!(autosaver.advance(&engine, &store, 9_999).is_none());
    assert_eq!(autosaver.last_saved_at(), None);
    assert_eq!(store.read_slot(AUTOSAVE_SLOT).expect("read"), None);

    engine.run_ticks(4);
    assert!(autosaver.advance(&engine, &store, 1).is_none());
    assert!(autosaver.last_saved_at().is_some());

    let saved = store.read_slot(AUTOSAVE_SLOT).expect("read").expect("autosaved");
    let snapshot = parse_str(&saved).expect("autosave is a valid snapshot");
    assert_eq!(snapshot.tick, 4);
}

#[test]
fn disabled_autosave_never_writes() {
    let store = store();
    let engine = SimEngine::build_test(62);
    let mut autosaver = Autosaver::new(AutosaveSettings { enabled: false, interval_ms: 10_000 });

    assert!(autosaver.advance(&engine, &store, 1_000_000).is_none());
    assert_eq!(store.read_slot(AUTOSAVE_SLOT).expect("read"), None);
    assert_eq!(autosaver.last_saved_at(), None);
}

#[test]
fn autosave_interval_snaps_and_clamps() {
    let mut autosaver = Autosaver::new(settings(3_000));
    assert_eq!(autosaver.settings().interval_ms, 10_000);

    autosaver.set_interval_ms(200_000);
    assert_eq!(autosaver.settings().interval_ms, 120_000);

    autosaver.set_interval_ms(12_400);
    assert_eq!(autosaver.settings().interval_ms, 10_000);

    autosaver.set_interval_ms(12_600);
    assert_eq!(autosaver.settings().interval_ms, 15_000);
}

#[test]
fn failed_autosave_reports_and_leaves_state_alone() {
    // No migration: the save_slot table does not exist.
    let store = SaveStore::in_memory().expect("in-memory store");
    let mut engine = SimEngine::build_test(63);
    let mut autosaver = Autosaver::new(settings(10_000));
    engine.run_ticks(2);
    let before = engine.serialize_at(0);

    let notice = autosaver.advance(&engine, &store, 10_000).expect("failure notice");

    assert_eq!(notice.intent, NoticeIntent::Error);
    assert_eq!(notice.title, "Autosave failed");
    assert_eq!(autosaver.last_saved_at(), None);
    assert_eq!(engine.serialize_at(0), before);
    assert_eq!(engine.step(), Some(3), "simulation keeps running");
}

// ── Startup restore ──────────────────────────────────────────

#[test]
fn restore_with_empty_slot_does_nothing() {
    let store = store();
    let mut engine = SimEngine::build_test(64);
    let before = engine.serialize_at(0);

    assert!(restore_on_startup(&mut engine, &store).is_none());
    assert_eq!(engine.serialize_at(0), before);
}

#[test]
fn restore_loads_the_autosave() {
    let store = store();
    let mut source = SimEngine::build_test(65);
    source.run_ticks(12);
    assert!(source.explore().ok);
    Autosaver::new(settings(10_000))
        .save_now(&source, &store)
        .expect("save");

    let mut engine = SimEngine::build_test(65);
    let notice = restore_on_startup(&mut engine, &store).expect("notice");

    assert_eq!(notice.intent, NoticeIntent::Info);
    assert_eq!(notice.title, "Autosave restored");
    assert_eq!(engine.tick(), 12);
    assert_eq!(engine.state(), source.state());
}

#[test]
fn corrupted_autosave_is_reported_and_ignored() {
    let store = store();
    store
        .write_slot(AUTOSAVE_SLOT, r#"{"version":1,"tick":"soon"}"#, 0)
        .expect("write");
    let mut engine = SimEngine::build_test(66);
    let before = engine.serialize_at(0);

    let notice = restore_on_startup(&mut engine, &store).expect("notice");

    assert_eq!(notice.intent, NoticeIntent::Error);
    assert_eq!(notice.title, "Autosave corrupted");
    assert!(notice.description.contains("tick"));
    assert_eq!(engine.serialize_at(0), before);
}

// ── Import / export ──────────────────────────────────────────

#[test]
fn export_is_pretty_and_lands_in_the_slot() {
    let store = store();
    let mut engine = SimEngine::build_test(67);
    engine.run_ticks(3);

    let text = export_save(&engine, &store).expect("export");

    assert!(text.contains('\n'));
    assert_eq!(store.read_slot(AUTOSAVE_SLOT).expect("read"), Some(text.clone()));
    assert_eq!(parse_str(&text).expect("valid").tick, 3);
}

#[test]
fn import_replaces_state_and_autosave() {
    let store = store();
    let mut source = SimEngine::build_test(68);
    source.run_ticks(30);
    assert!(source.upgrade_hyphae().ok);
    let text = source.serialize_at(0).to_json_pretty().expect("serialize");

    let mut engine = SimEngine::build_test(1);
    let notice = import_save(&mut engine, &store, &text);

    assert_eq!(notice.intent, NoticeIntent::Success);
    assert_eq!(notice.title, "Save loaded");
    assert_eq!(engine.state(), source.state());
    let saved = store.read_slot(AUTOSAVE_SLOT).expect("read").expect("slot written");
    assert_eq!(parse_str(&saved).expect("valid").tick, 30);
}

#[test]
fn import_that_cannot_be_stored_still_loads_but_reports() {
    // No migration: the save_slot table does not exist.
    let store = SaveStore::in_memory().expect("in-memory store");
    let mut source = SimEngine::build_test(70);
    source.run_ticks(8);
    let text = source.serialize_at(0).to_json().expect("serialize");

    let mut engine = SimEngine::build_test(2);
    let notice = import_save(&mut engine, &store, &text);

    assert!(notice.is_error());
    assert_eq!(notice.title, "Save loaded but not stored");
    assert!(notice.description.contains("autosave slot"));
    assert_eq!(engine.state(), source.state());
    assert_eq!(engine.tick(), 8);
}

#[test]
fn bad_import_is_rejected_without_side_effects() {
    let store = store();
    let mut engine = SimEngine::build_test(69);
    engine.run_ticks(5);
    let before = engine.serialize_at(0);

    let notice = import_save(&mut engine, &store, "definitely not a save");

    assert_eq!(notice.intent, NoticeIntent::Error);
    assert_eq!(notice.title, "Import failed");
    assert_eq!(engine.serialize_at(0), before);
    assert_eq!(store.read_slot(AUTOSAVE_SLOT).expect("read"), None);
}
