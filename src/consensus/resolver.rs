use log::warn;
use serde::Deserialize;
use thiserror::Error;

use crate::blockchain::{Block, is_chain_valid};

/// Reasons a peer abstains from consensus resolution. None of these abort
/// the scan of the remaining peers.
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("peer request failed: {0}")]
    Unavailable(#[from] reqwest::Error),
    #[error("peer responded with status {0}")]
    BadStatus(reqwest::StatusCode),
    #[error("peer chain could not be decoded: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The slice of the get-chain response the resolver cares about; any extra
/// fields a peer serves alongside are ignored.
#[derive(Debug, Deserialize)]
struct ChainEnvelope {
    chain: Vec<Block>,
}

/// Fetches a peer's advertised chain. Injected into resolution so the
/// longest-chain scan can be exercised without a network.
#[allow(async_fn_in_trait)]
pub trait ChainFetcher {
    async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>, PeerError>;
}

/// HTTP implementation speaking the `GET http://<peer>/get_chain` protocol.
#[derive(Debug, Clone, Default)]
pub struct HttpChainFetcher {
    client: reqwest::Client,
}

impl HttpChainFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>, PeerError> {
        let response = self
            .client
            .get(format!("http://{peer}/get_chain"))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(PeerError::BadStatus(response.status()));
        }
        let body = response.text().await?;
        let envelope: ChainEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.chain)
    }
}

/// Scan the peers in registry order and return the longest fully valid
/// chain strictly longer than `local_len`, if any.
///
/// A peer that fails to respond, responds non-2xx or sends an undecodable
/// body abstains. Replacement of the running best requires a strictly
/// greater length, so the first peer to reach a length keeps the win.
pub async fn find_longest_chain<F: ChainFetcher>(
    fetcher: &F,
    peers: &[String],
    local_len: usize,
    difficulty: u32,
) -> Option<Vec<Block>> {
    let mut best: Option<Vec<Block>> = None;
    let mut best_len = local_len;
    for peer in peers {
        let chain = match fetcher.fetch_chain(peer).await {
            Ok(chain) => chain,
            Err(err) => {
                warn!("CONSENSUS - peer {peer} abstains: {err}");
                continue;
            }
        };
        if chain.len() > best_len && is_chain_valid(&chain, difficulty) {
            best_len = chain.len();
            best = Some(chain);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{ChainFetcher, PeerError, find_longest_chain};
    use crate::blockchain::{Block, miner};

    /// In-memory fetcher: peers absent from the map are unreachable.
    struct StaticFetcher {
        chains: HashMap<String, Vec<Block>>,
    }

    impl ChainFetcher for StaticFetcher {
        async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>, PeerError> {
            self.chains
                .get(peer)
                .cloned()
                .ok_or(PeerError::BadStatus(reqwest::StatusCode::NOT_FOUND))
        }
    }

    fn mined_chain(blocks: usize, genesis_offset: i64) -> Vec<Block> {
        let mut genesis = Block::genesis();
        // Distinguish otherwise-identical chains built in the same second.
        genesis.timestamp += genesis_offset;
        let mut chain = vec![genesis];
        for _ in 0..blocks {
            let tip = chain.last().unwrap();
            let block =
                miner::mine_block(tip.index + 1, tip.compute_hash(), Vec::new(), 0, None).unwrap();
            chain.push(block);
        }
        chain
    }

    fn peers(entries: &[(&str, Vec<Block>)]) -> (StaticFetcher, Vec<String>) {
        let mut chains = HashMap::new();
        let mut order = Vec::new();
        for (peer, chain) in entries {
            chains.insert(peer.to_string(), chain.clone());
            order.push(peer.to_string());
        }
        (StaticFetcher { chains }, order)
    }

    #[actix_web::test]
    async fn adopts_the_longest_valid_candidate() {
        let (fetcher, order) = peers(&[
            ("10.0.0.1:5000", mined_chain(1, 1)),
            ("10.0.0.2:5000", mined_chain(3, 2)),
        ]);
        let best = find_longest_chain(&fetcher, &order, 1, 0).await.unwrap();
        assert_eq!(best.len(), 4);
    }

    #[actix_web::test]
    async fn chains_no_longer_than_local_are_ignored() {
        let (fetcher, order) = peers(&[
            ("10.0.0.1:5000", mined_chain(1, 1)),
            ("10.0.0.2:5000", mined_chain(2, 2)),
        ]);
        // Local already at length 3; both peers are at most that long.
        assert!(find_longest_chain(&fetcher, &order, 3, 0).await.is_none());
    }

    #[actix_web::test]
    async fn unreachable_peers_do_not_abort_the_scan() {
        let (fetcher, _) = peers(&[("10.0.0.2:5000", mined_chain(2, 1))]);
        let order = vec!["10.0.0.1:5000".to_string(), "10.0.0.2:5000".to_string()];
        let best = find_longest_chain(&fetcher, &order, 1, 0).await.unwrap();
        assert_eq!(best.len(), 3);
    }

    #[actix_web::test]
    async fn first_peer_wins_a_length_tie() {
        let first = mined_chain(2, 1);
        let second = mined_chain(2, 2);
        let (fetcher, order) = peers(&[
            ("10.0.0.1:5000", first.clone()),
            ("10.0.0.2:5000", second),
        ]);
        let best = find_longest_chain(&fetcher, &order, 1, 0).await.unwrap();
        assert_eq!(best, first);
    }

    #[actix_web::test]
    async fn an_invalid_longer_chain_loses_to_a_valid_shorter_one() {
        let mut forged = mined_chain(4, 1);
        forged[1].nonce += 1; // breaks the link to the next block
        let valid = mined_chain(2, 2);
        let (fetcher, order) = peers(&[
            ("10.0.0.1:5000", forged),
            ("10.0.0.2:5000", valid.clone()),
        ]);
        let best = find_longest_chain(&fetcher, &order, 1, 0).await.unwrap();
        assert_eq!(best, valid);
    }
}
