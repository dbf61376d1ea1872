//! Node and edge factories, and the starting colony.
//!
//! The starting colony is the heart plus three pockets, each wired
//! straight to the heart. Exploration reuses the same edge factory and
//! `discovered_node` for everything it adds later.

use crate::{
    config::BalanceConfig,
    graph::{EdgeStatus, GraphEdge, GraphNode, Hazard, IdAllocator, NodeKind, Position, HEART_ID},
    numbers::clamp,
    rng::{jitter, point_in_disk, random_between, weighted_pick, RandomSource, WeightTable},
    types::Tick,
};

/// Discovery odds, in table order. The last entry absorbs rounding.
pub const DISCOVERY_WEIGHTS: [(NodeKind, f64); 5] = [
    (NodeKind::WaterPocket,    0.30),
    (NodeKind::CarbonPocket,   0.25),
    (NodeKind::NutrientPocket, 0.25),
    (NodeKind::Junction,       0.15),
    (NodeKind::Toxic,          0.05),
];

pub fn discovery_table() -> WeightTable<NodeKind> {
    WeightTable::new(&DISCOVERY_WEIGHTS)
}

pub fn heart_node() -> GraphNode {
    GraphNode {
        id:            HEART_ID.to_string(),
        kind:          NodeKind::Heart,
        label:         "Heart (Core)".to_string(),
        position:      Position::new(0.0, 0.0),
        rate:          None,
        capacity:      None,
        tier:          4,
        integrity:     1.0,
        hazard:        None,
        discovered_at: 0,
        focus:         None,
    }
}

/// One of the hand-placed starting pockets.
pub fn pocket_node(ids: &mut IdAllocator, kind: NodeKind, position: Position, rate: f64) -> GraphNode {
    GraphNode {
        id:            ids.next_node_id(),
        kind,
        label:         kind.label().to_string(),
        position,
        rate:          Some(rate),
        capacity:      Some(32.0),
        tier:          1,
        integrity:     0.78,
        hazard:        None,
        discovered_at: 0,
        focus:         kind.focus(),
    }
}

/// A node found by exploration at `tick`. Kind is drawn from
/// `DISCOVERY_WEIGHTS`; position is a disk sample plus per-axis jitter.
pub fn discovered_node(
    ids: &mut IdAllocator,
    balance: &BalanceConfig,
    rng: &mut impl RandomSource,
    tick: Tick,
) -> GraphNode {
    let kind = weighted_pick(rng, &discovery_table()).unwrap_or(NodeKind::Toxic);

    let (x, y) = point_in_disk(rng, balance.world_radius);
    let position = Position::new(
        jitter(rng, x, balance.position_jitter),
        jitter(rng, y, balance.position_jitter),
    );

    let is_junction = kind == NodeKind::Junction;
    let is_toxic = kind == NodeKind::Toxic;
    let rate = if is_junction {
        random_between(rng, 1.0, 2.0)
    } else {
        random_between(rng, 1.4, 3.2)
    };

    GraphNode {
        id:            ids.next_node_id(),
        kind,
        label:         kind.label().to_string(),
        position,
        rate:          Some(rate),
        capacity:      Some(if is_junction { 64.0 } else { 40.0 }),
        tier:          if is_junction { 2 } else { 1 },
        integrity:     if is_toxic { 0.4 } else { 0.8 },
        hazard:        is_toxic.then_some(Hazard::Toxic),
        discovered_at: tick,
        focus:         kind.focus(),
    }
}

/// Hypha from `from` to `to`. Length is fixed here; longer hyphae start
/// under more strain.
pub fn edge_between(
    ids: &mut IdAllocator,
    rng: &mut impl RandomSource,
    from: &GraphNode,
    to: &GraphNode,
) -> GraphEdge {
    let length = from.position.distance_to(&to.position);
    GraphEdge {
        id:     ids.next_edge_id(),
        from:   from.id.clone(),
        to:     to.id.clone(),
        width:  random_between(rng, 1.2, 2.4),
        strain: clamp(0.4 + length / 200.0, 0.15, 0.9),
        length,
        status: EdgeStatus::Healthy,
        flow:   random_between(rng, 20.0, 60.0),
    }
}

/// Heart + three pockets, with one hypha from the heart to each pocket.
pub fn starting_network(
    ids: &mut IdAllocator,
    rng: &mut impl RandomSource,
) -> (Vec<GraphNode>, Vec<GraphEdge>) {
    let heart = heart_node();
    let pockets = [
        pocket_node(ids, NodeKind::WaterPocket, Position::new(-24.0, 18.0), 2.6),
        pocket_node(ids, NodeKind::CarbonPocket, Position::new(26.0, 12.0), 1.9),
        pocket_node(ids, NodeKind::NutrientPocket, Position::new(-6.0, -28.0), 2.1),
    ];

    let edges = pockets
        .iter()
        .map(|pocket| edge_between(ids, rng, &heart, pocket))
        .collect();

    let mut nodes = Vec::with_capacity(pockets.len() + 1);
    nodes.push(heart);
    nodes.extend(pockets);
    (nodes, edges)
}
