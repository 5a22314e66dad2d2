//! Seedable random source
//!
//! Lane picks, distractor letters, speeds and shuffles all draw from one
//! source per session so a seed reproduces the whole run.

use std::ops::RangeInclusive;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Random draws the engine needs
pub trait RandomSource {
    /// Uniform integer in `[0, upper)`; `upper` must be non-zero
    fn next_index(&mut self, upper: usize) -> usize;

    /// Uniform float in `[0, 1)`
    fn next_unit(&mut self) -> f32;

    /// Uniform integer in an inclusive range
    fn next_in_range(&mut self, range: RangeInclusive<usize>) -> usize {
        let (low, high) = (*range.start(), *range.end());
        if high <= low {
            return low;
        }
        low + self.next_index(high - low + 1)
    }

    /// Fisher-Yates shuffle
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }
}

/// PCG-backed source with its seed kept for logging/replay
#[derive(Debug, Clone)]
pub struct GameRng {
    seed: u64,
    inner: Pcg32,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed from the platform entropy source
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for GameRng {
    fn next_index(&mut self, upper: usize) -> usize {
        debug_assert!(upper > 0);
        self.inner.random_range(0..upper.max(1))
    }

    fn next_unit(&mut self) -> f32 {
        self.inner.random::<f32>()
    }
}
