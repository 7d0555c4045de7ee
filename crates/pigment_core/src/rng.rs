//! Random number generator abstraction for the simulation.
//!
//! Every random draw in the engine goes through the [`SimRng`] trait so that
//! runs are reproducible from a seed and tests can script exact draws.
//!
//! # Example
//!
//! ```
//! use pigment_core::rng::{SimRng, StdRandom};
//!
//! let mut rng = StdRandom::from_seed(42);
//! let row = rng.next_usize_max(100); // 0..100
//! let u = rng.next_double(); // 0.0..1.0
//! assert!(row < 100 && (0.0..1.0).contains(&u));
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of randomness used by the sampler, neighbor locator and initial
/// conditions.
pub trait SimRng: Send + Sync {
    /// Returns a random double in [0.0, 1.0).
    fn next_double(&mut self) -> f64;

    /// Returns a random usize in [0, max). Returns 0 when `max` is 0.
    fn next_usize_max(&mut self, max: usize) -> usize;

    /// Returns a random angle in [0, 2π).
    fn next_angle(&mut self) -> f64 {
        self.next_double() * std::f64::consts::TAU
    }

    /// Returns a random u64, for seeding sub-generators.
    fn next_u64(&mut self) -> u64;
}

/// Standard RNG wrapper using `rand::rngs::StdRng`.
#[derive(Clone, Debug)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Create a generator from a u64 seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl SimRng for StdRandom {
    fn next_double(&mut self) -> f64 {
        self.rng.gen()
    }

    fn next_usize_max(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        self.rng.gen_range(0..max)
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.gen()
    }
}

/// Scripted generator for tests: replays fixed doubles and indices in order,
/// cycling when exhausted.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub(crate) struct ScriptedRng {
    pub doubles: Vec<f64>,
    pub indices: Vec<usize>,
    double_pos: usize,
    index_pos: usize,
}

#[cfg(test)]
impl ScriptedRng {
    pub fn new(doubles: Vec<f64>, indices: Vec<usize>) -> Self {
        Self {
            doubles,
            indices,
            double_pos: 0,
            index_pos: 0,
        }
    }
}

#[cfg(test)]
impl SimRng for ScriptedRng {
    fn next_double(&mut self) -> f64 {
        let v = self.doubles[self.double_pos % self.doubles.len()];
        self.double_pos += 1;
        v
    }

    fn next_usize_max(&mut self, max: usize) -> usize {
        let v = self.indices[self.index_pos % self.indices.len()];
        self.index_pos += 1;
        v % max.max(1)
    }

    fn next_u64(&mut self) -> u64 {
        self.next_usize_max(usize::MAX) as u64
    }
}
