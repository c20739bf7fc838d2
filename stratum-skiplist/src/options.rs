use crate::{
    error::Result,
    level::{DEFAULT_MAX_LEVEL, DEFAULT_PROBABILITY, GeometricLevel},
    skip_list::SkipList,
};

#[derive(Debug, Clone)]
pub struct SkipListOptions {
    max_level: usize,

    probability: f64,

    seed: Option<u64>,
}

impl Default for SkipListOptions {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            probability: DEFAULT_PROBABILITY,
            seed: None,
        }
    }
}

impl SkipListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of levels a node may occupy, at least 1.
    pub fn max_level(&mut self, max_level: usize) -> &mut Self {
        self.max_level = max_level;
        self
    }

    /// Chance of promoting a node one level up, in (0, 1).
    pub fn probability(&mut self, p: f64) -> &mut Self {
        self.probability = p;
        self
    }

    /// Fixed seed for level draws, so the same operations build the same structure.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    pub fn level_generator(&self) -> Result<GeometricLevel> {
        match self.seed {
            Some(seed) => GeometricLevel::with_seed(self.max_level, self.probability, seed),
            None => GeometricLevel::new(self.max_level, self.probability),
        }
    }

    pub fn build<K: Ord, V>(&self) -> Result<SkipList<K, V>> {
        SkipList::with_generator(self.level_generator()?)
    }
}
