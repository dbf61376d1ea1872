//! Per-tick derived statistics. Never persisted; always recomputed from
//! the authoritative state after a committed mutation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub water_per_sec:        f64,
    pub carbon_per_sec:       f64,
    pub nutrients_per_sec:    f64,
    /// Gross sugar inflow after the synthesis multiplier.
    pub sugar_from_pockets:   f64,
    pub maintenance:          f64,
    pub net_sugar:            f64,
    pub network_health:       f64,
    pub flow_pressure:        f64,
    pub maintenance_per_edge: f64,
}
