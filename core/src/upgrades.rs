//! Purchased colony upgrades and their cost curves.

use crate::{config::BalanceConfig, graph::GraphNode, numbers::clamp};
use serde::{Deserialize, Serialize};

/// Ceiling reachable through hyphae widening. Saves may carry up to
/// `MAX_MAINTENANCE_REDUCTION`, but widening never pushes past this.
pub const WIDENING_REDUCTION_CAP: f64 = 0.75;
pub const MAX_MAINTENANCE_REDUCTION: f64 = 0.9;
pub const REDUCTION_PER_WIDENING: f64 = 0.05;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameUpgrades {
    pub hyphae_level:          u32,
    pub maintenance_reduction: f64,
    pub synthesis_level:       u32,
}

impl Default for GameUpgrades {
    fn default() -> Self {
        Self {
            hyphae_level:          0,
            maintenance_reduction: 0.1,
            synthesis_level:       0,
        }
    }
}

impl GameUpgrades {
    pub fn flow_multiplier(&self) -> f64 {
        1.0 + self.hyphae_level as f64 * 0.35
    }

    pub fn synthesis_multiplier(&self) -> f64 {
        1.0 + self.synthesis_level as f64 * 0.2
    }

    /// Strain relief per tick granted by widened hyphae.
    pub fn strain_relief(&self) -> f64 {
        self.hyphae_level as f64 * 0.01
    }

    /// The upgrade record after one more hyphae widening. The reduction
    /// stalls silently at the cap; the level still rises.
    pub fn widened(&self) -> Self {
        Self {
            hyphae_level: self.hyphae_level + 1,
            maintenance_reduction: clamp(
                self.maintenance_reduction + REDUCTION_PER_WIDENING,
                0.0,
                WIDENING_REDUCTION_CAP,
            ),
            ..*self
        }
    }
}

/// Sugar price of the next hyphae widening: base × (level + 1).
pub fn hyphae_upgrade_cost(balance: &BalanceConfig, upgrades: &GameUpgrades) -> f64 {
    balance.hyphae_upgrade_base_cost * (upgrades.hyphae_level as f64 + 1.0)
}

/// Sugar price of tuning `node`: base × (tier + 1).
pub fn node_tuning_cost(balance: &BalanceConfig, node: &GraphNode) -> f64 {
    balance.node_upgrade_base_cost * (node.tier as f64 + 1.0)
}
