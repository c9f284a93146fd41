use std::sync::atomic::AtomicBool;

use super::block::{Block, hash_meets_difficulty};
use super::error::ChainError;
use super::{REWARD_AMOUNT, miner};
use crate::transaction::Transaction;

/// In-memory ledger: the block chain plus the pending-transaction pool.
///
/// All mutation goes through the methods below; callers serialize access
/// behind a single lock so mining cannot race a chain replacement or a
/// concurrent pool drain.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    difficulty: u32,
}

impl Ledger {
    /// Initialize a new ledger rooted at the genesis block.
    pub fn new(difficulty: u32) -> Self {
        let mut ledger = Self {
            chain: Vec::new(),
            pending: Vec::new(),
            difficulty,
        };
        ledger.chain.push(Block::genesis());
        ledger
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Return the current tip of the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    /// Queue a transaction for the next mined block. Returns the index of
    /// the block that will settle it.
    pub fn add_transaction(&mut self, tx: Transaction) -> u64 {
        self.pending.push(tx);
        self.last_block().index + 1
    }

    /// Mine one block settling the pending pool plus a reward transaction
    /// (amount 1, sender to receiver) appended last. The mined block is
    /// appended through the hardened path and returned.
    pub fn mine(
        &mut self,
        sender: &str,
        receiver: &str,
        cancel: Option<&AtomicBool>,
    ) -> Result<Block, ChainError> {
        let reward = Transaction::new(sender, receiver, REWARD_AMOUNT)?;
        let mut transactions = self.pending.clone();
        transactions.push(reward);

        let tip = self.last_block();
        let block = miner::mine_block(
            tip.index + 1,
            tip.compute_hash(),
            transactions,
            self.difficulty,
            cancel,
        )?;
        self.push_block(block)?;
        Ok(self.last_block().clone())
    }

    /// Hardened append: reject any block that would break the chain
    /// invariant, without mutating state. The pending pool is cleared
    /// exactly on success.
    pub fn push_block(&mut self, block: Block) -> Result<(), ChainError> {
        let tip = self.last_block();
        if block.index != tip.index + 1 || block.previous_hash != tip.compute_hash() {
            return Err(ChainError::BrokenLink { index: block.index });
        }
        if !hash_meets_difficulty(&block.compute_hash(), self.difficulty) {
            return Err(ChainError::DifficultyNotMet {
                index: block.index,
                difficulty: self.difficulty,
            });
        }
        self.pending.clear();
        self.chain.push(block);
        Ok(())
    }

    /// Validate the local chain: linkage and PoW for every non-genesis block.
    pub fn is_valid(&self) -> bool {
        is_chain_valid(&self.chain, self.difficulty)
    }

    /// Swap in a candidate chain iff it is strictly longer than the local
    /// one and fully valid. Ties keep the local chain. Returns whether the
    /// replacement happened.
    pub fn adopt_if_longer(&mut self, candidate: Vec<Block>) -> bool {
        if candidate.len() > self.chain.len() && is_chain_valid(&candidate, self.difficulty) {
            self.chain = candidate;
            return true;
        }
        false
    }
}

/// Walk a chain pairwise from the second block: each block must link to its
/// predecessor's hash and satisfy the difficulty predicate. A genesis-only
/// chain is trivially valid; the genesis block itself is exempt from the
/// difficulty check.
pub fn is_chain_valid(chain: &[Block], difficulty: u32) -> bool {
    if chain.is_empty() {
        return false;
    }
    for pair in chain.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        if cur.previous_hash != prev.compute_hash() {
            return false;
        }
        if !hash_meets_difficulty(&cur.compute_hash(), difficulty) {
            return false;
        }
    }
    true
}
