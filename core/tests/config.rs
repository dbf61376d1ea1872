//! Config loading and validation.

use mycelium_core::config::{BalanceConfig, SimConfig};

#[test]
fn shipped_config_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/sim_config.json");
    let config = SimConfig::load(path).expect("load shipped config");

    assert_eq!(config, SimConfig::default());
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let config: SimConfig =
        serde_json::from_str(r#"{ "seed": 9, "balance": { "explore_cost": 100 } }"#).expect("parse");

    assert_eq!(config.seed, 9);
    assert_eq!(config.balance.explore_cost, 100.0);
    assert_eq!(config.balance.hyphae_upgrade_base_cost, BalanceConfig::default().hyphae_upgrade_base_cost);
    assert_eq!(config.tick_interval_ms, 1_000);
}

#[test]
fn negative_costs_are_rejected() {
    let mut config = SimConfig::default_test();
    config.balance.explore_cost = -1.0;
    assert!(config.validated().is_err());
}

#[test]
fn autosave_interval_is_clamped_on_load() {
    let mut config = SimConfig::default_test();
    config.autosave.interval_ms = 500_000;
    let config = config.validated().expect("valid");
    assert_eq!(config.autosave.interval_ms, 120_000);
}

#[test]
fn missing_file_is_an_error() {
    let err = SimConfig::load("/nonexistent/sim_config.json").expect_err("missing file");
    assert!(err.to_string().contains("Cannot read"));
}
