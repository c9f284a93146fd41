use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::blockchain::{Block, DEFAULT_DIFFICULTY, Ledger};
use crate::consensus::{HttpChainFetcher, PeerRegistry};
use crate::transaction::Transaction;

/// Shared application state: the ledger (chain + pending pool) behind a
/// single mutation lock, the peer registry, and the reused HTTP client
/// for consensus fetches.
pub struct AppState {
    pub ledger: Mutex<Ledger>,
    pub peers: Mutex<PeerRegistry>,
    pub fetcher: HttpChainFetcher,
}

impl AppState {
    pub fn new(difficulty: u32) -> Self {
        Self {
            ledger: Mutex::new(Ledger::new(difficulty)),
            peers: Mutex::new(PeerRegistry::new()),
            fetcher: HttpChainFetcher::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

/* ---------- Mining API Models ---------- */

#[derive(Deserialize)]
pub struct MineRequest {
    pub sender: String,
    pub receiver: String,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub mine_duration_secs: f64,
    pub difficulty: u32,
    pub block: Block,
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub difficulty: u32,
    pub chain: &'a [Block],
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTransactionRequest {
    pub sender: String,
    pub receiver: String,
    pub amount: u64,
}

#[derive(Serialize)]
pub struct NewTransactionResponse {
    /// Index of the block the transaction will be settled in.
    pub index: u64,
}

#[derive(Serialize)]
pub struct PendingResponse<'a> {
    pub size: usize,
    pub transactions: &'a [Transaction],
}

/* ---------- Consensus API Models ---------- */

#[derive(Deserialize)]
pub struct ConnectRequest {
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct NodesResponse {
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ReplaceResponse<'a> {
    pub replaced: bool,
    pub length: usize,
    pub chain: &'a [Block],
}
