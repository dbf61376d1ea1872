//! Player action handlers.
//!
//! RULES:
//!   - Every precondition is checked before anything is written, so a
//!     rejected action leaves the state untouched.
//!   - Handlers never recompute stats or rebuild indexes; the engine does
//!     that once the transition is committed.

use crate::{
    command::ActionResult,
    config::BalanceConfig,
    event::SimEvent,
    graph::IdAllocator,
    numbers::{clamp, format_thousands},
    rng::{pick_index, RandomSource},
    state::GameState,
    types::Tick,
    upgrades::{hyphae_upgrade_cost, node_tuning_cost},
    world_setup::{discovered_node, edge_between},
};

pub const TUNING_RATE_FACTOR: f64 = 1.3;
pub const TUNING_CAPACITY_FACTOR: f64 = 1.15;
pub const TUNING_INTEGRITY_BONUS: f64 = 0.05;

/// What an action did: the player-facing result plus the events to
/// publish if it succeeded (or the rejection event if it did not).
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub result: ActionResult,
    pub events: Vec<SimEvent>,
}

impl ActionOutcome {
    fn rejected(tick: Tick, action: &str, message: String) -> Self {
        Self {
            events: vec![SimEvent::ActionRejected {
                tick,
                action: action.to_string(),
                reason: message.clone(),
            }],
            result: ActionResult::failure(message),
        }
    }
}

/// Scout a new pocket: attach one discovered node to a random existing
/// node and pay the exploration cost.
pub fn explore(
    state: &mut GameState,
    ids: &mut IdAllocator,
    balance: &BalanceConfig,
    rng: &mut impl RandomSource,
    tick: Tick,
) -> ActionOutcome {
    let cost = balance.explore_cost;
    if !state.resources.can_afford(cost) {
        return ActionOutcome::rejected(
            tick,
            "explore",
            "You need more Sugar to scout a new pocket.".to_string(),
        );
    }
    let Some(anchor_idx) = pick_index(rng, state.nodes.len()) else {
        return ActionOutcome::rejected(
            tick,
            "explore",
            "There is no network to grow from.".to_string(),
        );
    };

    let anchor = &state.nodes[anchor_idx];
    let node = discovered_node(ids, balance, rng, tick);
    let edge = edge_between(ids, rng, anchor, &node);

    let event = SimEvent::NodeDiscovered {
        tick,
        node_id:   node.id.clone(),
        kind:      node.kind,
        anchor_id: anchor.id.clone(),
        edge_id:   edge.id.clone(),
        cost,
    };
    let message = format!("Linked {} to the network.", node.label);

    state.nodes.push(node);
    state.edges.push(edge);
    state.resources.spend_sugar(cost);

    ActionOutcome {
        result: ActionResult::success(message),
        events: vec![event],
    }
}

/// Widen the hyphae: +1 level, +0.05 maintenance reduction up to the cap.
/// Past the cap the upgrade still costs full price and still raises the
/// level.
pub fn upgrade_hyphae(state: &mut GameState, balance: &BalanceConfig, tick: Tick) -> ActionOutcome {
    let cost = hyphae_upgrade_cost(balance, &state.upgrades);
    if !state.resources.can_afford(cost) {
        return ActionOutcome::rejected(
            tick,
            "upgrade_hyphae",
            format!("Hyphae widening requires {} Sugar.", format_thousands(cost)),
        );
    }

    let next = state.upgrades.widened();
    state.upgrades = next;
    state.resources.spend_sugar(cost);

    ActionOutcome {
        result: ActionResult::success(format!("Hyphae widened to Level {}.", next.hyphae_level)),
        events: vec![SimEvent::HyphaeWidened {
            tick,
            level: next.hyphae_level,
            maintenance_reduction: next.maintenance_reduction,
            cost,
        }],
    }
}

/// Tune the most productive node: tier +1, rate ×1.3, capacity ×1.15,
/// integrity +0.05. Only the target node changes.
pub fn upgrade_best_node(state: &mut GameState, balance: &BalanceConfig, tick: Tick) -> ActionOutcome {
    let Some(idx) = state.best_tunable_node() else {
        return ActionOutcome::rejected(
            tick,
            "upgrade_best_node",
            "No eligible nodes to upgrade yet.".to_string(),
        );
    };

    let cost = node_tuning_cost(balance, &state.nodes[idx]);
    if !state.resources.can_afford(cost) {
        return ActionOutcome::rejected(
            tick,
            "upgrade_best_node",
            format!("Node tuning needs {} Sugar.", format_thousands(cost)),
        );
    }

    let node = &mut state.nodes[idx];
    let rate = node.rate.unwrap_or(0.0) * TUNING_RATE_FACTOR;
    node.tier += 1;
    node.rate = Some(rate);
    node.capacity = node.capacity.map(|capacity| capacity * TUNING_CAPACITY_FACTOR);
    node.integrity = clamp(node.integrity + TUNING_INTEGRITY_BONUS, 0.0, 1.0);

    let message = format!("{} now pulses {:.2}/s.", node.label, rate);
    let event = SimEvent::NodeTuned {
        tick,
        node_id: node.id.clone(),
        tier: node.tier,
        rate,
        cost,
    };
    state.resources.spend_sugar(cost);

    ActionOutcome {
        result: ActionResult::success(message),
        events: vec![event],
    }
}
