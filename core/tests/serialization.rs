//! Snapshot round trips, validation and hydration.

use mycelium_core::{
    engine::SimEngine,
    error::SimError,
    event::SimEvent,
    snapshot::{parse_str, parse_value, SAVE_VERSION},
};
use serde_json::{json, Value};

fn played_engine(seed: u64) -> SimEngine {
    let mut engine = SimEngine::build_test(seed);
    engine.run_ticks(25);
    engine.explore();
    engine.upgrade_hyphae();
    engine.run_ticks(10);
    engine.explore();
    engine.upgrade_best_node();
    engine.run_ticks(5);
    engine
}

fn snapshot_value(engine: &SimEngine) -> Value {
    serde_json::to_value(engine.serialize_at(1_700_000_000_000)).expect("to_value")
}

#[test]
fn snapshot_round_trips_through_text() {
    let engine = played_engine(41);
    let snapshot = engine.serialize_at(1_700_000_000_000);
    let text = snapshot.to_json().expect("serialize");

    let parsed = parse_str(&text).expect("valid snapshot");

    assert_eq!(parsed, snapshot);
    assert_eq!(parsed.version, SAVE_VERSION);
    assert_eq!(parsed.tick, 40);
    assert_eq!(parsed.timestamp, 1_700_000_000_000);
}

#[test]
fn snapshot_uses_camel_case_fields() {
    let value = snapshot_value(&played_engine(42));

    assert!(value["nodes"][0].get("discoveredAt").is_some());
    assert!(value["upgrades"].get("maintenanceReduction").is_some());
    assert_eq!(value["nodes"][1]["kind"], "waterPocket");
    assert!(value.get("stats").is_none(), "stats are derived, never stored");
}

#[test]
fn hydrate_restores_state_and_recomputes_stats() {
    let source = played_engine(43);
    let text = source.serialize_at(5).to_json().expect("serialize");

    let mut target = SimEngine::build_test(999);
    target.load_json(&text).expect("load");

    assert_eq!(target.tick(), source.tick());
    assert_eq!(target.state(), source.state());
    // Health reads the post-drift strains, so compare the strain-free stats.
    assert_eq!(target.stats().net_sugar, source.stats().net_sugar);
    assert_eq!(target.stats().maintenance, source.stats().maintenance);
    assert_eq!(target.stats().flow_pressure, source.stats().flow_pressure);
    assert!(!target.is_paused());
    assert!(target
        .drain_events()
        .iter()
        .any(|e| matches!(e, SimEvent::StateHydrated { .. })));
}

#[test]
fn ids_continue_after_the_highest_restored_suffix() {
    let mut value = snapshot_value(&SimEngine::build_test(44));
    value["nodes"][3]["id"] = json!("node-17");
    value["edges"][2]["to"] = json!("node-17");
    value["edges"][2]["id"] = json!("edge-30");

    let mut engine = SimEngine::build_test(44);
    engine.load_json(&value.to_string()).expect("load");
    assert!(engine.explore().ok);

    assert_eq!(engine.nodes().last().map(|n| n.id.as_str()), Some("node-18"));
    assert_eq!(engine.edges().last().map(|e| e.id.as_str()), Some("edge-31"));
}

#[test]
fn rejects_wrong_version() {
    let mut value = snapshot_value(&SimEngine::build_test(45));
    value["version"] = json!(2);

    let err = parse_value(&value).expect_err("version 2 must be rejected");
    assert!(err.has_path("version"));
}

#[test]
fn rejects_out_of_range_maintenance_reduction() {
    let mut value = snapshot_value(&SimEngine::build_test(46));
    value["upgrades"]["maintenanceReduction"] = json!(1.5);

    let err = parse_value(&value).expect_err("reduction above 0.9 must be rejected");
    assert!(err.has_path("upgrades.maintenanceReduction"));
}

#[test]
fn rejects_unknown_node_kind() {
    let mut value = snapshot_value(&SimEngine::build_test(47));
    value["nodes"][2]["kind"] = json!("mushroom");

    let err = parse_value(&value).expect_err("bad kind must be rejected");
    assert!(err.has_path("nodes[2].kind"));
}

#[test]
fn collects_every_violation() {
    let mut value = snapshot_value(&SimEngine::build_test(48));
    value["version"] = json!(7);
    value["resources"]["sugar"] = json!(-1.0);
    value["nodes"][1]["integrity"] = json!(1.2);
    value["edges"][0]["status"] = json!("frayed");
    value["edges"][1]["strain"] = json!("high");

    let err = parse_value(&value).expect_err("invalid");

    for path in [
        "version",
        "resources.sugar",
        "nodes[1].integrity",
        "edges[0].status",
        "edges[1].strain",
    ] {
        assert!(err.has_path(path), "missing violation at {path}: {err}");
    }
    assert_eq!(err.violations.len(), 5);
    assert!(err.to_string().starts_with("5 violation(s)"));
}

#[test]
fn rejects_structural_inconsistencies() {
    let mut value = snapshot_value(&SimEngine::build_test(49));
    value["edges"][0]["to"] = json!("node-99");
    value["nodes"][3]["id"] = json!("node-2");

    let err = parse_value(&value).expect_err("invalid");
    assert!(err.has_path("edges[0].to"));
    assert!(err.has_path("nodes[3].id"));

    let mut headless = snapshot_value(&SimEngine::build_test(49));
    headless["nodes"][0]["kind"] = json!("junction");
    let err = parse_value(&headless).expect_err("no heart");
    assert!(err.has_path("nodes"));
}

#[test]
fn rejects_missing_and_mistyped_fields() {
    let mut value = snapshot_value(&SimEngine::build_test(50));
    value.as_object_mut().expect("object").remove("tick");
    value["nodes"][1]["tier"] = json!(1.5);
    value["nodes"][1]["label"] = json!("");

    let err = parse_value(&value).expect_err("invalid");
    assert!(err.has_path("tick"));
    assert!(err.has_path("nodes[1].tier"));
    assert!(err.has_path("nodes[1].label"));
}

#[test]
fn timestamp_and_discovery_tick_must_be_integers() {
    let mut value = snapshot_value(&SimEngine::build_test(53));
    value["timestamp"] = json!(1_700_000_000_000.5);
    value["nodes"][1]["discoveredAt"] = json!(0.5);

    let err = parse_value(&value).expect_err("fractional values");
    assert!(err.has_path("timestamp"));
    assert!(err.has_path("nodes[1].discoveredAt"));
}

#[test]
fn loading_at_the_last_tick_keeps_running() {
    let mut engine = SimEngine::build_test(54);
    let mut value = snapshot_value(&engine);
    value["tick"] = json!(u64::MAX);
    engine.load_json(&value.to_string()).expect("load");

    assert_eq!(engine.step(), Some(u64::MAX));
    assert_eq!(engine.tick(), u64::MAX);
    assert!(engine.explore().ok);
    assert_eq!(engine.nodes().last().map(|n| n.discovered_at), Some(u64::MAX));
}

#[test]
fn rejects_id_suffixes_without_room_to_grow() {
    let mut engine = SimEngine::build_test(55);
    let before = engine.serialize_at(0);
    let mut value = snapshot_value(&engine);
    value["nodes"][1]["id"] = json!("node-18446744073709551615");
    value["edges"][0]["to"] = json!("node-18446744073709551615");
    value["edges"][1]["id"] = json!("edge-4294967296");

    let err = parse_value(&value).expect_err("oversized suffixes");
    assert!(err.has_path("nodes[1].id"));
    assert!(err.has_path("edges[1].id"));
    assert!(engine.load_json(&value.to_string()).is_err());
    assert_eq!(engine.serialize_at(0), before);

    value["nodes"][1]["id"] = json!("node-4294967295");
    value["edges"][0]["to"] = json!("node-4294967295");
    value["edges"][1]["id"] = json!("edge-2");
    engine.load_json(&value.to_string()).expect("largest allowed suffix");
    assert!(engine.explore().ok);
    assert_eq!(engine.nodes().last().map(|n| n.id.as_str()), Some("node-4294967296"));
}

#[test]
fn malformed_text_is_a_single_root_violation() {
    let err = parse_str("{ not json").expect_err("invalid");
    assert_eq!(err.violations.len(), 1);
    assert!(err.has_path("$"));
}

#[test]
fn unknown_extra_fields_are_ignored() {
    let mut value = snapshot_value(&SimEngine::build_test(51));
    value["theme"] = json!("dark");
    value["nodes"][0]["glow"] = json!(0.4);

    assert!(parse_value(&value).is_ok());
}

#[test]
fn failed_load_leaves_the_engine_untouched() {
    let mut engine = played_engine(52);
    let before = engine.serialize_at(0);
    let mut value = snapshot_value(&engine);
    value["version"] = json!(2);

    let err = engine.load_json(&value.to_string()).expect_err("invalid");

    assert!(matches!(err, SimError::Validation(_)));
    assert_eq!(engine.serialize_at(0), before);
    assert!(!engine
        .drain_events()
        .iter()
        .any(|e| matches!(e, SimEvent::StateHydrated { .. })));
}
