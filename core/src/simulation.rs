//! The per-tick economy and hypha drift.
//!
//! Both functions are pure over their inputs (edge drift additionally
//! takes an explicit random source). The engine calls them in this order
//! every tick:
//!   1. `simulate_tick`: production, maintenance, new resource pool.
//!   2. `evolve_edges`: strain/flow drift using that tick's pressure.

use crate::{
    config::BalanceConfig,
    graph::{EdgeStatus, GraphEdge, GraphNode, NodeKind, MAX_FLOW, MAX_STRAIN, MIN_FLOW, MIN_STRAIN},
    numbers::{average, clamp},
    resources::{ResourceKind, ResourcePool},
    rng::{random_between, RandomSource},
    stats::GameStats,
    upgrades::GameUpgrades,
};

/// Sugar yielded per unit of pocket flow, by node kind. Toxic is a drain.
pub fn sugar_yield(kind: NodeKind) -> f64 {
    match kind {
        NodeKind::WaterPocket    => 0.25,
        NodeKind::CarbonPocket   => 0.35,
        NodeKind::NutrientPocket => 0.20,
        NodeKind::Junction       => 0.40,
        NodeKind::Toxic          => -0.15,
        NodeKind::Heart | NodeKind::Rival => 0.0,
    }
}

/// Throughput one edge can carry before pressure saturates.
const FLOW_CAPACITY_PER_EDGE: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub next_resources: ResourcePool,
    pub stats:          GameStats,
}

/// One tick of the colony economy.
pub fn simulate_tick(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    resources: &ResourcePool,
    upgrades: &GameUpgrades,
    balance: &BalanceConfig,
) -> TickOutcome {
    let flow_multiplier = upgrades.flow_multiplier();

    let mut water_per_sec = 0.0;
    let mut carbon_per_sec = 0.0;
    let mut nutrients_per_sec = 0.0;
    let mut sugar_from_pockets = 0.0;

    for node in nodes {
        let rate = node.rate.unwrap_or(0.0) * flow_multiplier;
        match node.kind {
            NodeKind::WaterPocket    => water_per_sec += rate,
            NodeKind::CarbonPocket   => carbon_per_sec += rate,
            NodeKind::NutrientPocket => nutrients_per_sec += rate,
            _ => {}
        }
        sugar_from_pockets += rate * sugar_yield(node.kind);
    }

    let maintenance_per_edge =
        balance.base_maintenance_per_edge * (1.0 - upgrades.maintenance_reduction);
    let maintenance = maintenance_per_edge * edges.len() as f64;
    let sugar_gain = sugar_from_pockets * upgrades.synthesis_multiplier();
    let net_sugar = sugar_gain - maintenance;

    let mut next_resources = *resources;
    next_resources.apply_delta(ResourceKind::Sugar, net_sugar);
    next_resources.apply_delta(ResourceKind::Water, water_per_sec);
    next_resources.apply_delta(ResourceKind::Carbon, carbon_per_sec);
    next_resources.apply_delta(ResourceKind::Nutrients, nutrients_per_sec);
    // Spores have no producer yet.

    let flow_pressure =
        flow_pressure(edges.len(), water_per_sec + carbon_per_sec + nutrients_per_sec);
    let network_health = network_health(edges);

    let stats = GameStats {
        water_per_sec,
        carbon_per_sec,
        nutrients_per_sec,
        sugar_from_pockets: sugar_gain,
        maintenance,
        net_sugar,
        network_health,
        flow_pressure,
        maintenance_per_edge,
    };

    TickOutcome { next_resources, stats }
}

/// Stats for the current state without advancing anything.
pub fn derive_stats(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    resources: &ResourcePool,
    upgrades: &GameUpgrades,
    balance: &BalanceConfig,
) -> GameStats {
    simulate_tick(nodes, edges, resources, upgrades, balance).stats
}

/// Throughput relative to what the edge count can carry, in `[0, 1]`.
pub fn flow_pressure(edge_count: usize, throughput: f64) -> f64 {
    if edge_count == 0 {
        return 0.0;
    }
    clamp(throughput / (edge_count as f64 * FLOW_CAPACITY_PER_EDGE), 0.0, 1.0)
}

/// `1 - mean(strain) * 0.7`, clamped. An empty network is fully healthy.
pub fn network_health(edges: &[GraphEdge]) -> f64 {
    let strains: Vec<f64> = edges.iter().map(|edge| edge.strain).collect();
    clamp(1.0 - average(&strains) * 0.7, 0.0, 1.0)
}

/// Drift every hypha one tick. High pressure raises strain, widening
/// relieves it; flow eases toward a pressure-driven target.
pub fn evolve_edges(
    edges: &[GraphEdge],
    flow_pressure: f64,
    upgrades: &GameUpgrades,
    rng: &mut impl RandomSource,
) -> Vec<GraphEdge> {
    let relief = upgrades.strain_relief();
    let trend = flow_pressure * 0.05 - 0.02 - relief;

    edges
        .iter()
        .map(|edge| {
            let noise = random_between(rng, -0.01, 0.02);
            let strain = clamp(edge.strain + trend + noise, MIN_STRAIN, MAX_STRAIN);
            GraphEdge {
                strain,
                status: EdgeStatus::for_strain(strain),
                flow: clamp(edge.flow * 0.85 + flow_pressure * 35.0, MIN_FLOW, MAX_FLOW),
                ..edge.clone()
            }
        })
        .collect()
}
