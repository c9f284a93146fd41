use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;

use super::block::{Block, hash_meets_difficulty};
use super::error::ChainError;
use crate::transaction::Transaction;

/// Brute-force the Proof-of-Work nonce for a candidate block.
///
/// The timestamp is sampled once before the loop, so the search is
/// deterministic in the nonce alone. The search is unbounded; the only
/// termination guarantee is probabilistic (~16^difficulty attempts).
/// `cancel` is checked on every iteration so a hosting service can bound
/// mining time.
pub fn mine_block(
    index: u64,
    previous_hash: String,
    transactions: Vec<Transaction>,
    difficulty: u32,
    cancel: Option<&AtomicBool>,
) -> Result<Block, ChainError> {
    let mut candidate = Block {
        index,
        timestamp: Utc::now().timestamp(),
        nonce: 0,
        previous_hash,
        transactions,
    };
    loop {
        if let Some(flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(ChainError::Cancelled);
            }
        }
        if hash_meets_difficulty(&candidate.compute_hash(), difficulty) {
            return Ok(candidate);
        }
        candidate.nonce = candidate.nonce.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::mine_block;
    use crate::blockchain::{ChainError, hash_meets_difficulty};
    use crate::transaction::Transaction;

    #[test]
    fn found_nonce_satisfies_difficulty() {
        let txs = vec![Transaction::new("alice", "bob", 2).unwrap()];
        let block = mine_block(2, "0".into(), txs.clone(), 2, None).unwrap();
        assert_eq!(block.index, 2);
        assert_eq!(block.previous_hash, "0");
        assert_eq!(block.transactions, txs);
        assert!(block.compute_hash().starts_with("00"));
        assert!(hash_meets_difficulty(&block.compute_hash(), 2));
    }

    #[test]
    fn zero_difficulty_accepts_the_first_nonce() {
        let block = mine_block(2, "0".into(), Vec::new(), 0, None).unwrap();
        assert_eq!(block.nonce, 0);
    }

    #[test]
    fn cancelled_search_reports_instead_of_spinning() {
        let cancel = AtomicBool::new(false);
        cancel.store(true, Ordering::Relaxed);
        // Difficulty high enough that the first nonce cannot plausibly win.
        let result = mine_block(2, "0".into(), Vec::new(), 16, Some(&cancel));
        assert_eq!(result, Err(ChainError::Cancelled));
    }
}
