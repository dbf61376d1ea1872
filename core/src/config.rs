//! Balance and runtime configuration.
//!
//! Loaded from a single JSON file (`data/sim_config.json`); any field
//! missing from the file keeps its default. In tests, use
//! `SimConfig::default_test()`.

use serde::{Deserialize, Serialize};

pub const MIN_AUTOSAVE_INTERVAL_MS: u64 = 10_000;
pub const MAX_AUTOSAVE_INTERVAL_MS: u64 = 120_000;
pub const AUTOSAVE_INTERVAL_STEP_MS: u64 = 5_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BalanceConfig {
    pub explore_cost:              f64,
    pub hyphae_upgrade_base_cost:  f64,
    pub node_upgrade_base_cost:    f64,
    /// Radius of the disk new pockets are scattered in.
    pub world_radius:              f64,
    /// Extra per-axis perturbation applied after the disk sample.
    pub position_jitter:           f64,
    pub base_maintenance_per_edge: f64,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            explore_cost:              2_400.0,
            hyphae_upgrade_base_cost:  10_000.0,
            node_upgrade_base_cost:    6_000.0,
            world_radius:              52.0,
            position_jitter:           6.0,
            base_maintenance_per_edge: 0.03,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AutosaveSettings {
    pub enabled:     bool,
    pub interval_ms: u64,
}

impl Default for AutosaveSettings {
    fn default() -> Self {
        Self { enabled: true, interval_ms: 30_000 }
    }
}

impl AutosaveSettings {
    /// Set the interval, snapped to 5s steps and clamped to [10s, 120s].
    pub fn set_interval_ms(&mut self, interval_ms: u64) {
        let snapped = (interval_ms + AUTOSAVE_INTERVAL_STEP_MS / 2) / AUTOSAVE_INTERVAL_STEP_MS
            * AUTOSAVE_INTERVAL_STEP_MS;
        self.interval_ms = snapped.clamp(MIN_AUTOSAVE_INTERVAL_MS, MAX_AUTOSAVE_INTERVAL_MS);
    }

    pub fn clamped(mut self) -> Self {
        self.set_interval_ms(self.interval_ms);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub seed:             u64,
    pub tick_interval_ms: u64,
    pub balance:          BalanceConfig,
    pub autosave:         AutosaveSettings,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:             42,
            tick_interval_ms: 1_000,
            balance:          BalanceConfig::default(),
            autosave:         AutosaveSettings::default(),
        }
    }
}

impl SimConfig {
    /// Load from a JSON config file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validated()
    }

    /// Reject nonsensical balance values; clamp the autosave interval.
    pub fn validated(mut self) -> anyhow::Result<Self> {
        let b = &self.balance;
        let costs = [
            ("explore_cost", b.explore_cost),
            ("hyphae_upgrade_base_cost", b.hyphae_upgrade_base_cost),
            ("node_upgrade_base_cost", b.node_upgrade_base_cost),
            ("base_maintenance_per_edge", b.base_maintenance_per_edge),
            ("world_radius", b.world_radius),
            ("position_jitter", b.position_jitter),
        ];
        for (name, value) in costs {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("balance.{name} must be a finite non-negative number, got {value}");
            }
        }
        if self.tick_interval_ms == 0 {
            anyhow::bail!("tick_interval_ms must be greater than zero");
        }
        self.autosave = self.autosave.clamped();
        Ok(self)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            seed: 7,
            ..Self::default()
        }
    }
}
