//! Randomness source used to interleave tracks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The only source of nondeterminism in a test session.
pub trait Randomizer: Send {
    /// Uniform integer in `[lower, upper]`.
    fn between_inclusive_int(&mut self, lower: i32, upper: i32) -> i32;

    /// Uniform float in `[lower, upper]`.
    fn between_inclusive_float(&mut self, lower: f64, upper: f64) -> f64;
}

/// [`Randomizer`] backed by a seedable standard RNG.
pub struct SeededRandomizer {
    rng: StdRng,
}

impl SeededRandomizer {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for SeededRandomizer {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl Randomizer for SeededRandomizer {
    fn between_inclusive_int(&mut self, lower: i32, upper: i32) -> i32 {
        if upper <= lower {
            return lower;
        }
        self.rng.gen_range(lower..=upper)
    }

    fn between_inclusive_float(&mut self, lower: f64, upper: f64) -> f64 {
        if upper <= lower {
            return lower;
        }
        self.rng.gen_range(lower..=upper)
    }
}
