//! Level assignment for new nodes.
//!
//! Every node occupies level 0. A node on level `n` is promoted to level
//! `n + 1` with probability `p`, so the chance of reaching level `k` is `p^k`.
//! With `p = 0.5` each level holds about half the nodes of the level below.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::error::{Error, Result};

pub const DEFAULT_MAX_LEVEL: usize = 16;

pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Source of node heights for a skip list.
pub trait LevelGenerator {
    /// Number of levels the generator draws from.
    fn max_level(&self) -> usize;

    /// Draws a level in `[0, max_level)`.
    ///
    /// Must never return a value `>= self.max_level()`.
    fn random_level(&mut self) -> usize;
}

/// Geometric level distribution driven by a biased coin.
#[derive(Debug, Clone)]
pub struct GeometricLevel {
    max_level: usize,
    p: f64,
    rng: StdRng,
}

impl GeometricLevel {
    pub fn new(max_level: usize, p: f64) -> Result<Self> {
        Self::with_rng(max_level, p, StdRng::from_os_rng())
    }

    /// Same as [`GeometricLevel::new`], but every draw is reproducible from `seed`.
    pub fn with_seed(max_level: usize, p: f64, seed: u64) -> Result<Self> {
        Self::with_rng(max_level, p, StdRng::seed_from_u64(seed))
    }

    fn with_rng(max_level: usize, p: f64, rng: StdRng) -> Result<Self> {
        if max_level == 0 {
            return Err(Error::InvalidMaxLevel(max_level));
        }
        // also rejects NaN
        if !(p > 0.0 && p < 1.0) {
            return Err(Error::InvalidProbability(p));
        }
        tracing::debug!(max_level, p, "create geometric level generator");
        Ok(Self { max_level, p, rng })
    }

    pub fn probability(&self) -> f64 {
        self.p
    }
}

impl Default for GeometricLevel {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            p: DEFAULT_PROBABILITY,
            rng: StdRng::from_os_rng(),
        }
    }
}

impl LevelGenerator for GeometricLevel {
    fn max_level(&self) -> usize {
        self.max_level
    }

    // [0, max_level - 1]
    fn random_level(&mut self) -> usize {
        let mut level = 0;
        while level + 1 < self.max_level && self.rng.random_bool(self.p) {
            level += 1;
        }
        level
    }
}
