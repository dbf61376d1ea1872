//! The change feed: everything the engine commits is announced here.
//!
//! RULE: Presentation code learns about changes ONLY through these events
//! (plus reading the state after a transition). The engine buffers them;
//! the orchestrator drains the buffer after each transition.

use crate::{
    graph::{EdgeStatus, NodeKind},
    types::{EntityId, Tick},
};
use serde::{Deserialize, Serialize};

/// Variants are appended over time; never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    TickCompleted {
        tick:           Tick,
        net_sugar:      f64,
        network_health: f64,
    },
    EdgeStatusChanged {
        tick:    Tick,
        edge_id: EntityId,
        from:    EdgeStatus,
        to:      EdgeStatus,
    },

    // ── Player action events ───────────────────────
    NodeDiscovered {
        tick:      Tick,
        node_id:   EntityId,
        kind:      NodeKind,
        anchor_id: EntityId,
        edge_id:   EntityId,
        cost:      f64,
    },
    HyphaeWidened {
        tick:                  Tick,
        level:                 u32,
        maintenance_reduction: f64,
        cost:                  f64,
    },
    NodeTuned {
        tick:    Tick,
        node_id: EntityId,
        tier:    u32,
        rate:    f64,
        cost:    f64,
    },
    ActionRejected {
        tick:   Tick,
        action: String,
        reason: String,
    },

    // ── Lifecycle events ───────────────────────────
    Paused {
        tick: Tick,
    },
    Resumed {
        tick: Tick,
    },
    StateHydrated {
        tick:       Tick,
        node_count: usize,
        edge_count: usize,
    },
    StateReset,
}

impl SimEvent {
    /// Stable string name, used in log lines.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::TickCompleted { .. }     => "tick_completed",
            Self::EdgeStatusChanged { .. } => "edge_status_changed",
            Self::NodeDiscovered { .. }    => "node_discovered",
            Self::HyphaeWidened { .. }     => "hyphae_widened",
            Self::NodeTuned { .. }         => "node_tuned",
            Self::ActionRejected { .. }    => "action_rejected",
            Self::Paused { .. }            => "paused",
            Self::Resumed { .. }           => "resumed",
            Self::StateHydrated { .. }     => "state_hydrated",
            Self::StateReset               => "state_reset",
        }
    }
}
