//! Lookup structures derived from the node/edge arrays.
//!
//! Rebuilt synchronously by the engine after every committed mutation;
//! never edited in place. Renderers read endpoints and adjacency from
//! here instead of scanning the arrays.

use crate::{
    graph::{GraphEdge, GraphNode},
    types::EntityId,
};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEdge {
    pub edge_index: usize,
    /// `None` only if the edge points at a node that no longer exists.
    pub from_index: Option<usize>,
    pub to_index:   Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphIndex {
    nodes:     HashMap<EntityId, usize>,
    edges:     HashMap<EntityId, ResolvedEdge>,
    adjacency: HashMap<EntityId, Vec<EntityId>>,
}

impl GraphIndex {
    pub fn build(nodes: &[GraphNode], edges: &[GraphEdge]) -> Self {
        let node_lookup: HashMap<EntityId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id.clone(), idx))
            .collect();

        let mut adjacency: HashMap<EntityId, Vec<EntityId>> = HashMap::new();
        let mut edge_lookup = HashMap::with_capacity(edges.len());
        for (idx, edge) in edges.iter().enumerate() {
            edge_lookup.insert(
                edge.id.clone(),
                ResolvedEdge {
                    edge_index: idx,
                    from_index: node_lookup.get(&edge.from).copied(),
                    to_index:   node_lookup.get(&edge.to).copied(),
                },
            );
            adjacency.entry(edge.from.clone()).or_default().push(edge.to.clone());
            adjacency.entry(edge.to.clone()).or_default().push(edge.from.clone());
        }

        Self {
            nodes: node_lookup,
            edges: edge_lookup,
            adjacency,
        }
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.get(id).copied()
    }

    pub fn edge(&self, id: &str) -> Option<&ResolvedEdge> {
        self.edges.get(id)
    }

    /// Ids of nodes sharing a hypha with `id`, in edge order.
    pub fn neighbours(&self, id: &str) -> &[EntityId] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges whose endpoints do not resolve. Always empty for states the
    /// engine built or accepted.
    pub fn orphan_edges(&self) -> Vec<&str> {
        let mut orphans: Vec<&str> = self
            .edges
            .iter()
            .filter(|(_, e)| e.from_index.is_none() || e.to_index.is_none())
            .map(|(id, _)| id.as_str())
            .collect();
        orphans.sort_unstable();
        orphans
    }
}
