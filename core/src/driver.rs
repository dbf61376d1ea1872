//! Fixed-period driver.
//!
//! Turns elapsed wall (or simulated) time into a count of periods that
//! fired. The runner feeds it real elapsed time for the 1s tick driver;
//! the autosaver feeds it the same deltas for its own interval.

use crate::types::Millis;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodicDriver {
    interval_ms: Millis,
    accumulated: Millis,
}

impl PeriodicDriver {
    /// Intervals below 1ms are treated as 1ms.
    pub fn new(interval_ms: Millis) -> Self {
        Self { interval_ms: interval_ms.max(1), accumulated: 0 }
    }

    pub fn interval_ms(&self) -> Millis {
        self.interval_ms
    }

    /// Change the period. Time already accumulated carries over.
    pub fn set_interval_ms(&mut self, interval_ms: Millis) {
        self.interval_ms = interval_ms.max(1);
    }

    /// Add `elapsed_ms` and return how many whole periods completed.
    /// Negative deltas are ignored.
    pub fn advance(&mut self, elapsed_ms: Millis) -> u64 {
        self.accumulated += elapsed_ms.max(0);
        let fired = self.accumulated / self.interval_ms;
        self.accumulated -= fired * self.interval_ms;
        fired as u64
    }

    /// Start a fresh period from now.
    pub fn reset(&mut self) {
        self.accumulated = 0;
    }
}
