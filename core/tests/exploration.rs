//! Exploration: discovery, linking, cost and atomic failure.

use mycelium_core::{
    engine::SimEngine,
    event::SimEvent,
    graph::{EdgeStatus, Hazard, NodeKind},
    snapshot::SerializedGame,
};

fn edit(engine: &mut SimEngine, f: impl FnOnce(&mut SerializedGame)) {
    let mut snapshot = engine.serialize_at(0);
    f(&mut snapshot);
    engine.hydrate(snapshot);
}

#[test]
fn explore_adds_one_linked_node_and_charges_sugar() {
    let mut engine = SimEngine::build_test(21);
    let sugar_before = engine.resources().sugar;
    engine.drain_events();

    let result = engine.explore();

    assert!(result.ok, "{}", result.message);
    assert_eq!(engine.nodes().len(), 5);
    assert_eq!(engine.edges().len(), 4);
    assert_eq!(engine.resources().sugar, sugar_before - 2_400.0);

    let node = engine.nodes().last().expect("new node");
    let edge = engine.edges().last().expect("new edge");
    assert_eq!(node.id, "node-4");
    assert_eq!(edge.id, "edge-4");
    assert_eq!(edge.to, node.id);
    assert!(engine.nodes()[..4].iter().any(|n| n.id == edge.from));
    assert_eq!(edge.status, EdgeStatus::Healthy);
    let anchor = engine.state().node(&edge.from).expect("anchor");
    assert!((edge.length - anchor.position.distance_to(&node.position)).abs() < 1e-12);

    assert_eq!(node.label, node.kind.label());
    assert_eq!(node.discovered_at, 1, "discovered during the tick in progress");
    assert_eq!(result.message, format!("Linked {} to the network.", node.label));

    let events = engine.drain_events();
    assert!(matches!(
        events.as_slice(),
        [SimEvent::NodeDiscovered { node_id, cost, .. }] if node_id == "node-4" && *cost == 2_400.0
    ));
}

#[test]
fn discovered_nodes_respect_kind_rules() {
    let mut engine = SimEngine::build_test(22);
    edit(&mut engine, |s| s.resources.sugar = 500_000.0);

    for _ in 0..150 {
        assert!(engine.explore().ok);
    }

    for node in &engine.nodes()[4..] {
        assert!(matches!(
            node.kind,
            NodeKind::WaterPocket
                | NodeKind::CarbonPocket
                | NodeKind::NutrientPocket
                | NodeKind::Junction
                | NodeKind::Toxic
        ));
        let rate = node.rate.expect("discovered nodes have a rate");
        match node.kind {
            NodeKind::Junction => {
                assert!((1.0..2.0).contains(&rate));
                assert_eq!(node.capacity, Some(64.0));
                assert_eq!(node.tier, 2);
            }
            _ => {
                assert!((1.4..3.2).contains(&rate));
                assert_eq!(node.capacity, Some(40.0));
                assert_eq!(node.tier, 1);
            }
        }
        if node.kind == NodeKind::Toxic {
            assert_eq!(node.hazard, Some(Hazard::Toxic));
            assert_eq!(node.integrity, 0.4);
        } else {
            assert_eq!(node.hazard, None);
            assert_eq!(node.integrity, 0.8);
        }
        assert_eq!(node.focus, node.kind.focus());
        // disk radius 52 plus up to 6 jitter on each axis
        assert!(node.position.x.hypot(node.position.y) <= 52.0 + 6.0 * 2f64.sqrt() + 1e-9);
    }
}

#[test]
fn explore_without_enough_sugar_changes_nothing() {
    let mut engine = SimEngine::build_test(23);
    edit(&mut engine, |s| s.resources.sugar = 2_399.99);
    engine.drain_events();
    let before = engine.serialize_at(0);

    for _ in 0..3 {
        let result = engine.explore();
        assert!(!result.ok);
        assert_eq!(result.message, "You need more Sugar to scout a new pocket.");
    }

    assert_eq!(engine.serialize_at(0), before);
    let events = engine.drain_events();
    assert_eq!(events.len(), 3);
    assert!(events
        .iter()
        .all(|e| matches!(e, SimEvent::ActionRejected { action, .. } if action == "explore")));
}

#[test]
fn exploring_until_broke_then_every_attempt_fails() {
    let mut engine = SimEngine::build_test(24);
    let cost = engine.explore_cost();
    let affordable = (engine.resources().sugar / cost).floor() as usize;

    let mut successes = 0;
    while engine.explore().ok {
        successes += 1;
    }
    assert_eq!(successes, affordable);
    assert!(engine.resources().sugar < cost);

    let before = engine.serialize_at(0);
    for _ in 0..50 {
        assert!(!engine.explore().ok);
    }
    assert_eq!(engine.serialize_at(0), before);
}

#[test]
fn explore_with_exact_cost_succeeds() {
    let mut engine = SimEngine::build_test(25);
    edit(&mut engine, |s| s.resources.sugar = 2_400.0);

    assert!(engine.explore().ok);
    assert_eq!(engine.resources().sugar, 0.0);
}

#[test]
fn index_and_stats_follow_exploration() {
    let mut engine = SimEngine::build_test(26);
    let maintenance_before = engine.stats().maintenance;

    assert!(engine.explore().ok);

    let index = engine.index();
    assert_eq!(index.node_count(), 5);
    assert_eq!(index.edge_count(), 4);
    assert!(index.node_index("node-4").is_some());
    assert_eq!(index.neighbours("node-4").len(), 1);
    assert_eq!(index.edge("edge-4").and_then(|e| e.to_index), Some(4));
    assert_eq!(engine.state().edge("edge-4").map(|e| e.to.as_str()), Some("node-4"));
    assert!(index.orphan_edges().is_empty());
    assert!(engine.stats().maintenance > maintenance_before);
}

#[test]
fn later_discoveries_carry_the_tick_in_progress() {
    let mut engine = SimEngine::build_test(27);
    engine.run_ticks(9);

    assert!(engine.explore().ok);
    assert_eq!(engine.nodes().last().map(|n| n.discovered_at), Some(10));
}
