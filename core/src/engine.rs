//! The simulation engine: the single owner of colony state.
//!
//! EXECUTION ORDER per tick (fixed, never reordered):
//!   1. Economy      (`simulate_tick`: production, maintenance, stats)
//!   2. Edge drift   (`evolve_edges`, fed that tick's flow pressure)
//!   3. Clock advance, change-feed events
//!
//! RULES:
//!   - Ticks and player actions are serialized through `&mut self`;
//!     nothing else mutates the state.
//!   - All randomness flows through the RngBank.
//!   - Every committed transition recomputes stats, rebuilds the graph
//!     index and pushes its events. Rejected actions change nothing.
//!   - Loads are all-or-nothing: validation happens before any field of
//!     the live state is touched.

use crate::{
    actions::{self, ActionOutcome},
    clock::SimClock,
    command::{ActionResult, PlayerCommand},
    config::SimConfig,
    error::SimResult,
    event::SimEvent,
    graph::{GraphEdge, GraphNode, IdAllocator},
    graph_index::GraphIndex,
    resources::ResourcePool,
    rng::{RngBank, SubsystemSlot},
    simulation::{derive_stats, evolve_edges, simulate_tick},
    snapshot::{self, SerializedGame},
    state::GameState,
    stats::GameStats,
    types::{Millis, Tick},
    upgrades::{self, GameUpgrades},
    world_setup::starting_network,
};
use log::{debug, info, warn};

pub struct SimEngine {
    pub config:   SimConfig,
    pub clock:    SimClock,
    pub rng_bank: RngBank,
    state:        GameState,
    stats:        GameStats,
    ids:          IdAllocator,
    index:        GraphIndex,
    events:       Vec<SimEvent>,
    /// Separates RNG streams of several actions in the same tick.
    action_seq:   u64,
}

impl SimEngine {
    /// A fresh colony: heart, three pockets, starting resources.
    pub fn new(config: SimConfig) -> Self {
        let rng_bank = RngBank::new(config.seed);
        let (state, ids) = initial_world(&rng_bank);
        let mut engine = Self {
            config,
            clock: SimClock::new(),
            rng_bank,
            state,
            stats: GameStats::default(),
            ids,
            index: GraphIndex::default(),
            events: Vec::new(),
            action_seq: 0,
        };
        engine.refresh_derived();
        engine
    }

    /// Build an engine for `seed`, keeping the rest of `config`.
    pub fn build(seed: u64, config: SimConfig) -> Self {
        Self::new(SimConfig { seed, ..config })
    }

    /// Engine with test config (used throughout core/tests).
    pub fn build_test(seed: u64) -> Self {
        Self::build(seed, SimConfig::default_test())
    }

    // ── Ticking ────────────────────────────────────────────────

    /// Advance one tick. Returns the new tick, or `None` while paused.
    pub fn step(&mut self) -> Option<Tick> {
        if self.clock.paused {
            return None;
        }
        let tick = self.clock.tick_in_progress();

        let outcome = simulate_tick(
            &self.state.nodes,
            &self.state.edges,
            &self.state.resources,
            &self.state.upgrades,
            &self.config.balance,
        );

        let mut rng = self.rng_bank.for_subsystem_at(SubsystemSlot::EdgeDrift, tick, 0);
        let next_edges = evolve_edges(
            &self.state.edges,
            outcome.stats.flow_pressure,
            &self.state.upgrades,
            &mut rng,
        );
        for (before, after) in self.state.edges.iter().zip(&next_edges) {
            if before.status != after.status {
                self.events.push(SimEvent::EdgeStatusChanged {
                    tick,
                    edge_id: after.id.clone(),
                    from:    before.status,
                    to:      after.status,
                });
            }
        }

        self.state.resources = outcome.next_resources;
        self.state.edges = next_edges;
        self.stats = outcome.stats;
        self.index = GraphIndex::build(&self.state.nodes, &self.state.edges);
        self.clock.advance();

        debug!(
            "tick={tick} economy: net_sugar={:.3} maintenance={:.3} health={:.3} pressure={:.3}",
            self.stats.net_sugar,
            self.stats.maintenance,
            self.stats.network_health,
            self.stats.flow_pressure,
        );
        self.events.push(SimEvent::TickCompleted {
            tick,
            net_sugar:      self.stats.net_sugar,
            network_health: self.stats.network_health,
        });
        Some(tick)
    }

    /// Run up to `n` ticks. Returns how many actually ran (0 while paused).
    pub fn run_ticks(&mut self, n: u64) -> u64 {
        let mut ran = 0;
        for _ in 0..n {
            if self.step().is_none() {
                break;
            }
            ran += 1;
        }
        ran
    }

    // ── Player actions ─────────────────────────────────────────

    pub fn explore(&mut self) -> ActionResult {
        let tick = self.clock.tick_in_progress();
        self.action_seq += 1;
        let mut rng = self
            .rng_bank
            .for_subsystem_at(SubsystemSlot::Exploration, tick, self.action_seq);
        let outcome = actions::explore(
            &mut self.state,
            &mut self.ids,
            &self.config.balance,
            &mut rng,
            tick,
        );
        self.commit("explore", outcome)
    }

    pub fn upgrade_hyphae(&mut self) -> ActionResult {
        let tick = self.clock.tick_in_progress();
        let outcome = actions::upgrade_hyphae(&mut self.state, &self.config.balance, tick);
        self.commit("upgrade_hyphae", outcome)
    }

    pub fn upgrade_best_node(&mut self) -> ActionResult {
        let tick = self.clock.tick_in_progress();
        let outcome = actions::upgrade_best_node(&mut self.state, &self.config.balance, tick);
        self.commit("upgrade_best_node", outcome)
    }

    /// Dispatch a player command.
    pub fn apply(&mut self, command: PlayerCommand) -> ActionResult {
        match command {
            PlayerCommand::Explore         => self.explore(),
            PlayerCommand::UpgradeHyphae   => self.upgrade_hyphae(),
            PlayerCommand::UpgradeBestNode => self.upgrade_best_node(),
            PlayerCommand::Pause => {
                self.pause();
                ActionResult::success("Simulation paused.")
            }
            PlayerCommand::Resume => {
                self.resume();
                ActionResult::success("Simulation resumed.")
            }
            PlayerCommand::Reset => {
                self.reset();
                ActionResult::success("Colony reset to its first heartbeat.")
            }
        }
    }

    fn commit(&mut self, action: &str, outcome: ActionOutcome) -> ActionResult {
        let ActionOutcome { result, events } = outcome;
        if result.ok {
            self.refresh_derived();
            info!("tick={} {action}: {}", self.clock.current_tick, result.message);
        } else {
            debug!("tick={} {action} rejected: {}", self.clock.current_tick, result.message);
        }
        for event in &events {
            debug!("tick={} event={}", self.clock.current_tick, event.type_name());
        }
        self.events.extend(events);
        result
    }

    // ── Clock control ──────────────────────────────────────────

    pub fn pause(&mut self) {
        if !self.clock.paused {
            self.clock.pause();
            self.events.push(SimEvent::Paused { tick: self.clock.current_tick });
        }
    }

    pub fn resume(&mut self) {
        if self.clock.paused {
            self.clock.resume();
            self.events.push(SimEvent::Resumed { tick: self.clock.current_tick });
        }
    }

    pub fn is_paused(&self) -> bool {
        self.clock.paused
    }

    // ── Persistence ────────────────────────────────────────────

    /// Snapshot stamped with the current wall-clock time.
    pub fn serialize(&self) -> SerializedGame {
        self.serialize_at(chrono::Utc::now().timestamp_millis())
    }

    pub fn serialize_at(&self, timestamp: Millis) -> SerializedGame {
        SerializedGame::capture(&self.state, self.clock.current_tick, timestamp)
    }

    /// Replace the whole state with `snapshot`. Stats are recomputed, id
    /// counters continue after the highest restored suffix, and the clock
    /// resumes running at the snapshot's tick.
    pub fn hydrate(&mut self, snapshot: SerializedGame) {
        let tick = snapshot.tick;
        self.state = snapshot.to_state();
        self.ids = IdAllocator::reseed(&self.state.nodes, &self.state.edges);
        self.clock = SimClock::starting_at(tick);
        self.action_seq = 0;
        self.refresh_derived();

        info!(
            "tick={tick} hydrated: {} nodes, {} edges",
            self.state.nodes.len(),
            self.state.edges.len()
        );
        self.events.push(SimEvent::StateHydrated {
            tick,
            node_count: self.state.nodes.len(),
            edge_count: self.state.edges.len(),
        });
    }

    /// Validate `text` and hydrate from it. On any error the live state is
    /// untouched.
    pub fn load_json(&mut self, text: &str) -> SimResult<()> {
        match snapshot::parse_str(text) {
            Ok(parsed) => {
                self.hydrate(parsed);
                Ok(())
            }
            Err(e) => {
                warn!("tick={} snapshot rejected: {e}", self.clock.current_tick);
                Err(e.into())
            }
        }
    }

    /// Back to the starting colony. The engine keeps running.
    pub fn reset(&mut self) {
        let (state, ids) = initial_world(&self.rng_bank);
        self.state = state;
        self.ids = ids;
        self.clock = SimClock::new();
        self.action_seq = 0;
        self.refresh_derived();
        info!("colony reset");
        self.events.push(SimEvent::StateReset);
    }

    // ── Read access ────────────────────────────────────────────

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn resources(&self) -> &ResourcePool {
        &self.state.resources
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.state.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.state.edges
    }

    pub fn upgrades(&self) -> &GameUpgrades {
        &self.state.upgrades
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn tick(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn index(&self) -> &GraphIndex {
        &self.index
    }

    /// Take every event buffered since the last drain.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Cost previews ──────────────────────────────────────────

    pub fn explore_cost(&self) -> f64 {
        self.config.balance.explore_cost
    }

    pub fn hyphae_upgrade_cost(&self) -> f64 {
        upgrades::hyphae_upgrade_cost(&self.config.balance, &self.state.upgrades)
    }

    /// Price of tuning the current best node; `None` if nothing is tunable.
    pub fn node_tuning_cost(&self) -> Option<f64> {
        self.state
            .best_tunable_node()
            .map(|idx| upgrades::node_tuning_cost(&self.config.balance, &self.state.nodes[idx]))
    }

    fn refresh_derived(&mut self) {
        self.stats = derive_stats(
            &self.state.nodes,
            &self.state.edges,
            &self.state.resources,
            &self.state.upgrades,
            &self.config.balance,
        );
        self.index = GraphIndex::build(&self.state.nodes, &self.state.edges);
    }
}

fn initial_world(rng_bank: &RngBank) -> (GameState, IdAllocator) {
    let mut ids = IdAllocator::new();
    let mut rng = rng_bank.for_subsystem(SubsystemSlot::WorldSetup);
    let (nodes, edges) = starting_network(&mut ids, &mut rng);
    let state = GameState {
        resources: ResourcePool::starting(),
        nodes,
        edges,
        upgrades: GameUpgrades::default(),
    };
    (state, ids)
}
