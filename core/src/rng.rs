//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through SubsystemRng instances derived
//! from the single master seed the engine was built with.
//!
//! Each concern gets its own RNG stream, seeded deterministically
//! from (master_seed, slot, tick, sequence). This means:
//!   - Adding a new slot never changes existing streams.
//!   - Two explores in the same tick still draw different numbers.
//!
//! The pure helpers at the bottom (`random_between`, `weighted_pick`, ...)
//! only need a `RandomSource`, so tests can script their input.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// Anything that can hand out uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// A named, deterministic RNG for a single concern.
pub struct SubsystemRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SubsystemRng {
    pub fn new(seed: u64) -> Self {
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        use rand::RngCore;
        self.inner.next_u64()
    }
}

impl RandomSource for SubsystemRng {
    /// Roll a float in [0.0, 1.0).
    fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Hands out per-slot streams for a single colony.
#[derive(Debug, Clone)]
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_subsystem(&self, slot: SubsystemSlot) -> SubsystemRng {
        self.for_subsystem_at(slot, 0, 0)
    }

    /// Stream for `slot` at `tick`; `sequence` separates several draws
    /// that land on the same tick (e.g. repeated explores).
    pub fn for_subsystem_at(&self, slot: SubsystemSlot, tick: u64, sequence: u64) -> SubsystemRng {
        let derived_seed = self.master_seed
            ^ (slot as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
            ^ tick.wrapping_mul(0xbf58_476d_1ce4_e5b9)
            ^ sequence.wrapping_mul(0x94d0_49bb_1331_11eb);
        SubsystemRng::new(derived_seed).with_name(slot.name())
    }
}

/// Stable slot assignments.
/// NEVER reorder or remove entries; only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum SubsystemSlot {
    WorldSetup = 0,
    Exploration = 1,
    EdgeDrift = 2,
}

impl SubsystemSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::WorldSetup => "world_setup",
            Self::Exploration => "exploration",
            Self::EdgeDrift => "edge_drift",
        }
    }
}

// ── Pure helpers ─────────────────────────────────────────────────────────────

/// Uniform draw in `[min, max)`.
pub fn random_between(rng: &mut impl RandomSource, min: f64, max: f64) -> f64 {
    rng.next_f64() * (max - min) + min
}

/// Uniform index into a collection of `len` items. `None` when empty.
pub fn pick_index(rng: &mut impl RandomSource, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let idx = (rng.next_f64() * len as f64).floor() as usize;
    Some(idx.min(len - 1))
}

/// `value` perturbed uniformly by up to `delta` either way.
pub fn jitter(rng: &mut impl RandomSource, value: f64, delta: f64) -> f64 {
    value + random_between(rng, -delta, delta)
}

/// Uniform point inside a disk of `radius` centred on the origin.
pub fn point_in_disk(rng: &mut impl RandomSource, radius: f64) -> (f64, f64) {
    let r = radius * rng.next_f64().sqrt();
    let theta = rng.next_f64() * std::f64::consts::TAU;
    (r * theta.cos(), r * theta.sin())
}

/// Cumulative-weight table for weighted choice.
#[derive(Debug, Clone)]
pub struct WeightTable<T> {
    entries: Vec<(T, f64)>,
    total: f64,
}

impl<T: Copy> WeightTable<T> {
    /// Build from `(value, weight)` pairs; order is preserved and matters
    /// for tie-breaking.
    pub fn new(options: &[(T, f64)]) -> Self {
        let mut running = 0.0;
        let entries = options
            .iter()
            .map(|&(value, weight)| {
                running += weight;
                (value, running)
            })
            .collect();
        Self { entries, total: running }
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Value whose cumulative bucket contains `roll` (a fraction of the
    /// total). The last entry is the fallback if rounding leaves a gap.
    pub fn select(&self, fraction: f64) -> Option<T> {
        let roll = fraction * self.total;
        self.entries
            .iter()
            .find(|(_, cumulative)| roll <= *cumulative)
            .or_else(|| self.entries.last())
            .map(|(value, _)| *value)
    }
}

/// Weighted choice over `table` driven by one draw from `rng`.
pub fn weighted_pick<T: Copy>(rng: &mut impl RandomSource, table: &WeightTable<T>) -> Option<T> {
    let fraction = rng.next_f64();
    table.select(fraction)
}
