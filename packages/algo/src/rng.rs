//! Random Source
//!
//! All randomness used by the engine (presentation shuffle, pool draws and
//! due-time jitter) goes through [`RandomSource`], so a session can run on a
//! seeded ChaCha generator in production and on a scripted sequence in tests.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Injectable source of uniform integers
pub trait RandomSource {
    /// Uniform index in `[0, upper)`. Callers guarantee `upper > 0`.
    fn index(&mut self, upper: usize) -> usize;

    /// Uniform value in `[low, high]`, both inclusive
    fn between(&mut self, low: u64, high: u64) -> u64;
}

/// ChaCha8-backed generator, reproducible when built from a seed
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn index(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper)
    }

    fn between(&mut self, low: u64, high: u64) -> u64 {
        self.rng.gen_range(low..=high)
    }
}

/// Replays a fixed list of raw values.
///
/// Each value is reduced into the requested range; once the script runs out
/// every draw returns the lowest value of its range.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    values: VecDeque<u64>,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn index(&mut self, upper: usize) -> usize {
        match self.values.pop_front() {
            Some(v) => (v % upper as u64) as usize,
            None => 0,
        }
    }

    fn between(&mut self, low: u64, high: u64) -> u64 {
        let span = high - low + 1;
        match self.values.pop_front() {
            Some(v) => low + v % span,
            None => low,
        }
    }
}

/// Unbiased Fisher-Yates shuffle
pub fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1);
        items.swap(i, j);
    }
}
