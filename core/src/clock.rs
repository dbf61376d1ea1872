//! Simulation clock: owns tick state and pause.

use crate::types::Tick;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub current_tick: Tick,
    pub paused:       bool,
}

impl SimClock {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// A running clock resumed at `tick` (after a load).
    pub fn starting_at(tick: Tick) -> Self {
        Self { current_tick: tick, paused: false }
    }

    /// Advance one tick. Returns the new tick number.
    /// Panics if called while paused; callers must check.
    pub fn advance(&mut self) -> Tick {
        assert!(!self.paused, "advance() called on paused clock");
        self.current_tick = self.current_tick.saturating_add(1);
        self.current_tick
    }

    /// The tick currently being played (the one the next `advance` reaches).
    /// Both saturate at `Tick::MAX` rather than wrap.
    pub fn tick_in_progress(&self) -> Tick {
        self.current_tick.saturating_add(1)
    }

    pub fn pause(&mut self)  { self.paused = true;  }
    pub fn resume(&mut self) { self.paused = false; }
}

impl Default for SimClock {
    fn default() -> Self { Self::new() }
}
