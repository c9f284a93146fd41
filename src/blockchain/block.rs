use chrono::Utc;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use sha2::{Digest, Sha256};

use super::{GENESIS_NONCE, GENESIS_PREVIOUS_HASH};
use crate::transaction::Transaction;

/// A single block in the chain holding the transactions it settles.
///
/// The hash is never stored: it is always the deterministic function
/// `compute_hash()` of the fields below, so a block cannot desynchronize
/// from its own digest. Serialization emits a `hash` field alongside the
/// stored fields; deserialization accepts and discards it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix timestamp (UTC, second precision)
    pub nonce: u64,     // Proof-of-Work solution
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Create the genesis block (index 1). Its nonce is fixed and its hash
    /// is not required to satisfy the difficulty predicate.
    pub fn genesis() -> Self {
        Self {
            index: 1,
            timestamp: Utc::now().timestamp(),
            nonce: GENESIS_NONCE,
            previous_hash: String::from(GENESIS_PREVIOUS_HASH),
            transactions: Vec::new(),
        }
    }

    /// Compute the SHA-256 hash of this block from its fields.
    /// Transactions are serialized deterministically as JSON and included
    /// in the preimage in list order.
    pub fn compute_hash(&self) -> String {
        let txs_json = serde_json::to_string(&self.transactions).expect("serialize txs");
        let preimage = format!(
            "{}:{}:{}:{}:{}",
            self.index, self.timestamp, self.previous_hash, self.nonce, txs_json
        );
        let mut hasher = Sha256::new();
        hasher.update(preimage.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Block", 6)?;
        state.serialize_field("index", &self.index)?;
        state.serialize_field("timestamp", &self.timestamp)?;
        state.serialize_field("nonce", &self.nonce)?;
        state.serialize_field("previous_hash", &self.previous_hash)?;
        state.serialize_field("transactions", &self.transactions)?;
        state.serialize_field("hash", &self.compute_hash())?;
        state.end()
    }
}

/// The Proof-of-Work predicate: the hex digest must begin with
/// `difficulty` zero characters.
pub fn hash_meets_difficulty(hash: &str, difficulty: u32) -> bool {
    hash.bytes().take(difficulty as usize).all(|c| c == b'0')
}
