//! An ordered map built on a skip list.
//!
//! Lookups, inserts and removals walk down a stack of sparser and sparser
//! linked levels, costing `O(log n)` expected time without any rebalancing.
//! The list is single-threaded; wrap it in a lock for shared use.
#![warn(rust_2018_idioms, unreachable_pub)]

pub mod error;
pub mod level;
pub mod options;
pub mod skip_list;

#[cfg(test)]
mod test_utils;

pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::level::{
        DEFAULT_MAX_LEVEL, DEFAULT_PROBABILITY, GeometricLevel, LevelGenerator,
    };
    pub use crate::options::SkipListOptions;
    pub use crate::skip_list::{Iter, SkipList};
}
