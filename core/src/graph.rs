//! Colony network schema: nodes (pockets, junctions, the heart) and the
//! hyphae that connect them.
//!
//! Nodes and edges live in plain `Vec`s owned by the engine. Ids are
//! strings (`heart`, `node-N`, `edge-N`); the numeric suffix drives the
//! id allocator so restored saves never collide with new discoveries.

use crate::{resources::ResourceKind, types::{EntityId, Tick}};
use serde::{Deserialize, Serialize};

/// Strain above which a hypha counts as strained.
pub const STRAINED_THRESHOLD: f64 = 0.65;
/// Strain above which a hypha counts as decaying.
pub const DECAYING_THRESHOLD: f64 = 0.82;

pub const MIN_STRAIN: f64 = 0.05;
pub const MAX_STRAIN: f64 = 0.98;
pub const MIN_FLOW: f64 = 5.0;
pub const MAX_FLOW: f64 = 260.0;

pub const HEART_ID: &str = "heart";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Heart,
    WaterPocket,
    CarbonPocket,
    NutrientPocket,
    Junction,
    Toxic,
    /// Reserved; nothing produces or consumes rival nodes yet.
    Rival,
}

impl NodeKind {
    pub const ALL: [NodeKind; 7] = [
        Self::Heart,
        Self::WaterPocket,
        Self::CarbonPocket,
        Self::NutrientPocket,
        Self::Junction,
        Self::Toxic,
        Self::Rival,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Heart          => "heart",
            Self::WaterPocket    => "waterPocket",
            Self::CarbonPocket   => "carbonPocket",
            Self::NutrientPocket => "nutrientPocket",
            Self::Junction       => "junction",
            Self::Toxic          => "toxic",
            Self::Rival          => "rival",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::WaterPocket    => "Water Pocket",
            Self::CarbonPocket   => "Carbon Vein",
            Self::NutrientPocket => "Nutrient Cache",
            Self::Junction       => "Junction",
            Self::Toxic          => "Toxic Bloom",
            Self::Heart | Self::Rival => "Node",
        }
    }

    /// Resource a pocket of this kind feeds, if any.
    pub fn focus(&self) -> Option<ResourceKind> {
        match self {
            Self::WaterPocket    => Some(ResourceKind::Water),
            Self::CarbonPocket   => Some(ResourceKind::Carbon),
            Self::NutrientPocket => Some(ResourceKind::Nutrients),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Hazard {
    Toxic,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id:            EntityId,
    pub kind:          NodeKind,
    pub label:         String,
    pub position:      Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate:          Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity:      Option<f64>,
    pub tier:          u32,
    pub integrity:     f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hazard:        Option<Hazard>,
    pub discovered_at: Tick,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus:         Option<ResourceKind>,
}

impl GraphNode {
    pub fn is_heart(&self) -> bool {
        self.kind == NodeKind::Heart
    }

    /// Eligible for node tuning: not the heart, and has a non-zero rate.
    pub fn is_tunable(&self) -> bool {
        !self.is_heart() && self.rate.is_some_and(|rate| rate != 0.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStatus {
    Healthy,
    Strained,
    Decaying,
}

impl EdgeStatus {
    pub const ALL: [EdgeStatus; 3] = [Self::Healthy, Self::Strained, Self::Decaying];

    /// Pure function of strain: ≤0.65 healthy, ≤0.82 strained, else decaying.
    pub fn for_strain(strain: f64) -> Self {
        if strain > DECAYING_THRESHOLD {
            Self::Decaying
        } else if strain > STRAINED_THRESHOLD {
            Self::Strained
        } else {
            Self::Healthy
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Healthy  => "healthy",
            Self::Strained => "strained",
            Self::Decaying => "decaying",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.name() == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphEdge {
    pub id:     EntityId,
    pub from:   EntityId,
    pub to:     EntityId,
    pub width:  f64,
    pub strain: f64,
    /// Euclidean distance between endpoints at creation. Never updated.
    pub length: f64,
    pub status: EdgeStatus,
    pub flow:   f64,
}

/// Hands out `node-N` / `edge-N` ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next_node: u64,
    next_edge: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next_node: 1, next_edge: 1 }
    }

    /// Re-seed from restored data: next suffix = max seen + 1.
    pub fn reseed(nodes: &[GraphNode], edges: &[GraphEdge]) -> Self {
        let max_node = nodes.iter().map(|n| numeric_suffix(&n.id)).max().unwrap_or(0);
        let max_edge = edges.iter().map(|e| numeric_suffix(&e.id)).max().unwrap_or(0);
        Self {
            next_node: max_node.saturating_add(1),
            next_edge: max_edge.saturating_add(1),
        }
    }

    pub fn next_node_id(&mut self) -> EntityId {
        let id = format!("node-{}", self.next_node);
        self.next_node = self.next_node.saturating_add(1);
        id
    }

    pub fn next_edge_id(&mut self) -> EntityId {
        let id = format!("edge-{}", self.next_edge);
        self.next_edge = self.next_edge.saturating_add(1);
        id
    }

    pub fn peek_node(&self) -> u64 { self.next_node }
    pub fn peek_edge(&self) -> u64 { self.next_edge }
}

impl Default for IdAllocator {
    fn default() -> Self { Self::new() }
}

/// Largest numeric id suffix a loaded snapshot may carry.
pub const MAX_ID_SUFFIX: u64 = u32::MAX as u64;

/// Number after the last `-` in an id; 0 when there is none (e.g. `heart`).
pub fn numeric_suffix(id: &str) -> u64 {
    id.rsplit('-')
        .next()
        .and_then(|tail| tail.parse::<u64>().ok())
        .unwrap_or(0)
}
