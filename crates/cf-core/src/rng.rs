//! Deterministic per-mover RNG.
//!
//! # Determinism strategy
//!
//! Each mover's RNG is seeded by:
//!
//!   seed = global_seed XOR (mover_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive mover IDs uniformly across the seed space.
//! Registering movers in a different order therefore never changes the
//! phase offset any individual mover receives.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::MoverId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── MoverRng ──────────────────────────────────────────────────────────────────

/// Per-mover deterministic RNG.
pub struct MoverRng(SmallRng);

impl MoverRng {
    /// Seed deterministically from the run's global seed and a mover ID.
    pub fn new(global_seed: u64, mover: MoverId) -> Self {
        let seed = global_seed ^ (mover.0 as u64).wrapping_mul(MIXING_CONSTANT);
        MoverRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform fraction in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}
