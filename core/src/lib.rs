//! mycelium-core: deterministic simulation engine for a fungal colony
//! idle game. Everything here is headless; presentation lives elsewhere
//! and talks to the engine through commands, state reads and events.

pub mod actions;
pub mod autosave;
pub mod clock;
pub mod command;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod event;
pub mod graph;
pub mod graph_index;
pub mod notice;
pub mod numbers;
pub mod resources;
pub mod rng;
pub mod simulation;
pub mod snapshot;
pub mod state;
pub mod stats;
pub mod store;
pub mod types;
pub mod upgrades;
pub mod world_setup;
