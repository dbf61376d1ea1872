//! The colony's resource pool.
//!
//! Five fixed kinds, each with a hard capacity. Quantities are clamped
//! to `[0, cap]` whenever the engine writes them.

use crate::numbers::clamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Sugar,
    Water,
    Carbon,
    Nutrients,
    Spores,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        Self::Sugar,
        Self::Water,
        Self::Carbon,
        Self::Nutrients,
        Self::Spores,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sugar     => "sugar",
            Self::Water     => "water",
            Self::Carbon    => "carbon",
            Self::Nutrients => "nutrients",
            Self::Spores    => "spores",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn cap(&self) -> f64 {
        match self {
            Self::Sugar     => 500_000.0,
            Self::Water     => 300_000.0,
            Self::Carbon    => 200_000.0,
            Self::Nutrients => 150_000.0,
            Self::Spores    => 999.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ResourcePool {
    pub sugar:     f64,
    pub water:     f64,
    pub carbon:    f64,
    pub nutrients: f64,
    pub spores:    f64,
}

impl ResourcePool {
    /// The stockpile a new colony starts with.
    pub fn starting() -> Self {
        Self {
            sugar:     125_700.0,
            water:     89_200.0,
            carbon:    67_100.0,
            nutrients: 45_300.0,
            spores:    12.0,
        }
    }

    pub fn get(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Sugar     => self.sugar,
            ResourceKind::Water     => self.water,
            ResourceKind::Carbon    => self.carbon,
            ResourceKind::Nutrients => self.nutrients,
            ResourceKind::Spores    => self.spores,
        }
    }

    /// Write `value` clamped to `[0, cap]`.
    pub fn set(&mut self, kind: ResourceKind, value: f64) {
        let value = clamp(value, 0.0, kind.cap());
        match kind {
            ResourceKind::Sugar     => self.sugar = value,
            ResourceKind::Water     => self.water = value,
            ResourceKind::Carbon    => self.carbon = value,
            ResourceKind::Nutrients => self.nutrients = value,
            ResourceKind::Spores    => self.spores = value,
        }
    }

    /// Add `delta` (may be negative) and clamp.
    pub fn apply_delta(&mut self, kind: ResourceKind, delta: f64) {
        self.set(kind, self.get(kind) + delta);
    }

    pub fn can_afford(&self, sugar_cost: f64) -> bool {
        self.sugar >= sugar_cost
    }

    /// Deduct a sugar cost. Callers check `can_afford` first.
    pub fn spend_sugar(&mut self, cost: f64) {
        self.apply_delta(ResourceKind::Sugar, -cost);
    }
}

impl Default for ResourcePool {
    fn default() -> Self { Self::starting() }
}
