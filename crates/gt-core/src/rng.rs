//! Seedable per-vehicle and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! All randomness flows from one `SimRng`.  A run with `SimConfig::seed =
//! Some(s)` is fully reproducible; `None` seeds from OS entropy, matching the
//! wall-clock-driven behaviour of an interactive session.
//!
//! Vehicles that need their own randomness (plane banking) get a
//! `VehicleRng` seeded by:
//!
//!   seed = vehicle_seed XOR (vehicle_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive vehicle IDs uniformly across the seed space, so
//! the random walk of one vehicle does not depend on the update order of the
//! others.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::VehicleId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── VehicleRng ────────────────────────────────────────────────────────────────

/// Per-vehicle deterministic RNG.
pub struct VehicleRng(SmallRng);

impl VehicleRng {
    /// Seed deterministically from a parent seed and a vehicle ID.
    pub fn new(seed: u64, vehicle: VehicleId) -> Self {
        let seed = seed ^ (vehicle.0 as u64).wrapping_mul(MIXING_CONSTANT);
        VehicleRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}

impl std::fmt::Debug for VehicleRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VehicleRng")
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for spawning, itinerary planning and satellite
/// population.
///
/// Used only from the single simulation thread.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed from OS entropy (non-reproducible runs).
    pub fn from_entropy() -> Self {
        SimRng(SmallRng::from_entropy())
    }

    /// `Some(seed)` → reproducible, `None` → entropy.
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::new(s),
            None    => Self::from_entropy(),
        }
    }

    /// Derive a child `SimRng` with a different seed offset, so independent
    /// subsystems do not perturb each other's sequences.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Seed for a new vehicle's private RNG.
    #[inline]
    pub fn vehicle_rng(&mut self, vehicle: VehicleId) -> VehicleRng {
        VehicleRng::new(self.0.r#gen(), vehicle)
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Choose a random element from a slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}
