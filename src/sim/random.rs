//! Injected randomness for the simulator

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform draws. Seeded PRNG in production, scripted in tests.
pub trait RandomSource {
    /// Uniform draw in [0, 1)
    fn unit(&mut self) -> f32;

    /// Uniform draw in [min, max); returns `min` for an empty range
    fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + (max - min) * self.unit()
    }

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    /// Uniform draw in [-amplitude, amplitude)
    fn symmetric(&mut self, amplitude: f32) -> f32 {
        self.range(-amplitude, amplitude)
    }
}

impl RandomSource for Pcg32 {
    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Run RNG for a seed
pub fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}
