//! Shared primitive types used across the entire simulation.

/// A simulation tick. One tick = one nominal second of colony time.
pub type Tick = u64;

/// A stable, unique identifier for a node or edge in the colony graph.
pub type EntityId = String;

/// Epoch milliseconds, as stamped on snapshots and save slots.
pub type Millis = i64;
