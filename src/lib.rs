pub mod shared;

#[cfg(test)]
mod test_utils;

pub use stratum_skiplist::{error, level, options, skip_list};

pub mod prelude {
    pub use crate::shared::SharedSkipList;
    pub use stratum_skiplist::prelude::*;
}
