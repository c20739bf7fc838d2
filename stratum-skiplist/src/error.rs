#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid max level: {0}, must be at least 1")]
    InvalidMaxLevel(usize),

    #[error("Invalid probability: {0}, must be in (0, 1)")]
    InvalidProbability(f64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
