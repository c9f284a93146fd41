use thiserror::Error;

use crate::transaction::ValidationError;

/// Failures in the mine/append path. A rejected block never mutates the
/// chain or the pending pool.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("block {index} does not link to the current tip")]
    BrokenLink { index: u64 },
    #[error("block {index} does not satisfy difficulty {difficulty}")]
    DifficultyNotMet { index: u64, difficulty: u32 },
    #[error("mining was cancelled before a valid nonce was found")]
    Cancelled,
    #[error(transparent)]
    InvalidReward(#[from] ValidationError),
}
