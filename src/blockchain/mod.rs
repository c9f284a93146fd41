pub mod block;
pub mod error;
pub mod miner;
pub mod model;

pub use block::{Block, hash_meets_difficulty};
pub use error::ChainError;
pub use model::{Ledger, is_chain_valid};

/// Default Proof-of-Work difficulty (leading zero hex digits).
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Amount credited by the reward transaction of each mined block.
pub const REWARD_AMOUNT: u64 = 1;

/// Sentinel previous-hash of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Fixed genesis nonce; the genesis block is exempt from the difficulty
/// predicate.
pub const GENESIS_NONCE: u64 = 1;
