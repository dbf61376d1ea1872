//! The authoritative colony state. Only the engine mutates it.

use crate::{
    graph::{GraphEdge, GraphNode},
    resources::ResourcePool,
    upgrades::GameUpgrades,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    pub resources: ResourcePool,
    pub nodes:     Vec<GraphNode>,
    pub edges:     Vec<GraphEdge>,
    pub upgrades:  GameUpgrades,
}

impl GameState {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    /// Tuning target: the tunable node with the highest rate. Ties go to
    /// the earliest node in the array.
    pub fn best_tunable_node(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, node) in self.nodes.iter().enumerate() {
            if !node.is_tunable() {
                continue;
            }
            let rate = node.rate.unwrap_or(0.0);
            match best {
                Some((_, best_rate)) if rate <= best_rate => {}
                _ => best = Some((idx, rate)),
            }
        }
        best.map(|(idx, _)| idx)
    }
}
