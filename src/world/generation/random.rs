//! Seeded random source
//!
//! Every random decision a generator makes goes through [`RandomSource`],
//! so replaying a seed with the same call order replays the same layout.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic integer-range and probability draws
pub trait RandomSource {
    /// Uniform integer in `[min, max)`. Returns `min` when the range is empty.
    fn range(&mut self, min: i32, max: i32) -> i32;

    /// `true` with the given probability. `0.0` never fires, `1.0` always does.
    fn chance(&mut self, probability: f32) -> bool;
}

/// [`RandomSource`] backed by a seeded `StdRng`
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Rewind to the first draw of the seed
    pub fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }
}

impl RandomSource for SeededRandom {
    fn range(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    fn chance(&mut self, probability: f32) -> bool {
        self.rng.gen::<f32>() < probability
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn range(&mut self, min: i32, max: i32) -> i32 {
        (**self).range(min, max)
    }

    fn chance(&mut self, probability: f32) -> bool {
        (**self).chance(probability)
    }
}

/// Replays a fixed script of draws, for forcing specific branches in tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedRandom {
    pub ranges: std::collections::VecDeque<i32>,
    pub chances: std::collections::VecDeque<bool>,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(ranges: &[i32], chances: &[bool]) -> Self {
        Self {
            ranges: ranges.iter().copied().collect(),
            chances: chances.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    /// Scripted values are clamped into the requested range; an exhausted
    /// script answers with `min`.
    fn range(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.ranges.pop_front().map_or(min, |v| v.clamp(min, max - 1))
    }

    fn chance(&mut self, _probability: f32) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }
}
