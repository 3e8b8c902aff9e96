use std::sync::{Mutex, MutexGuard};

use actix_web::web;
use log::{debug, info};
use serde_json::Number;
use uuid::Uuid;

use crate::blockchain::{Block, Blockchain, MINING_REWARD, REWARD_SENDER, find_proof};
use crate::consensus::{ChainSource, HttpChainSource, PeerRegistry, longest_valid_chain};
use crate::error::Result;

/// One ledger node: its identity, its chain and pending pool, and its peers.
///
/// Ledger mutations (new transaction, new block, chain replacement) are
/// serialized behind a single lock; the peer registry has its own.
pub struct Node<S = HttpChainSource> {
    node_id: String,
    ledger: Mutex<Blockchain>,
    peers: Mutex<PeerRegistry>,
    source: S,
}

impl Node<HttpChainSource> {
    /// A node with a fresh random identity that fetches peer chains over HTTP.
    pub fn new(source: HttpChainSource) -> Self {
        Self::with_source(Uuid::new_v4().simple().to_string(), source)
    }
}

impl<S: ChainSource> Node<S> {
    pub fn with_source(node_id: impl Into<String>, source: S) -> Self {
        Self {
            node_id: node_id.into(),
            ledger: Mutex::new(Blockchain::new()),
            peers: Mutex::new(PeerRegistry::new()),
            source,
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Exclusive access to the ledger.
    pub fn ledger(&self) -> MutexGuard<'_, Blockchain> {
        self.ledger.lock().expect("mutex poisoned")
    }

    fn peers(&self) -> MutexGuard<'_, PeerRegistry> {
        self.peers.lock().expect("mutex poisoned")
    }

    /// Forge a block: search for a proof on a blocking worker, then record
    /// the mining reward and seal the pending pool.
    ///
    /// If the tip moves while searching (another block or a replaced chain),
    /// the search restarts against the new tip.
    pub async fn mine(&self) -> Result<Block> {
        loop {
            let (last_proof, last_hash) = {
                let ledger = self.ledger();
                let last = ledger.last_block();
                (last.proof, last.hash())
            };

            debug!("MINER - searching proof after {last_proof}");
            let proof = web::block(move || find_proof(last_proof)).await?;

            let mut ledger = self.ledger();
            if ledger.last_block().hash() != last_hash {
                debug!("MINER - tip moved during search, retrying");
                continue;
            }

            ledger.new_transaction(REWARD_SENDER, &self.node_id, Number::from(MINING_REWARD));
            let block = ledger.new_block(proof, Some(last_hash)).clone();
            info!(
                "MINER - forged block #{} (proof={}, txs={})",
                block.index,
                block.proof,
                block.transactions.len()
            );
            return Ok(block);
        }
    }

    /// Queue a transaction; returns the index of the block it will land in.
    pub fn submit_transaction(&self, sender: &str, recipient: &str, amount: Number) -> u64 {
        self.ledger().new_transaction(sender, recipient, amount)
    }

    /// Snapshot of the whole chain.
    pub fn chain(&self) -> Vec<Block> {
        self.ledger().chain().to_vec()
    }

    /// Register peers by URL or `host:port`; returns every known peer.
    pub fn register_nodes<A: AsRef<str>>(&self, addresses: &[A]) -> Result<Vec<String>> {
        let mut peers = self.peers();
        let added = peers.register_all(addresses)?;
        info!("NODES - registered {added} new peer(s), {} total", peers.len());
        Ok(peers.to_vec())
    }

    pub fn peer_list(&self) -> Vec<String> {
        self.peers().to_vec()
    }

    /// Longest-chain rule: adopt the longest valid peer chain that is
    /// strictly longer than ours. Returns whether the chain was replaced.
    ///
    /// Peers are queried in sorted address order, so equal-length candidates
    /// resolve to the lowest address. Unreachable peers are skipped.
    pub async fn resolve_conflicts(&self) -> bool {
        let peers = {
            let registry = self.peers();
            if registry.is_empty() {
                debug!("CONSENSUS - no peers registered");
                return false;
            }
            registry.to_vec()
        };
        let local_len = self.ledger().len();

        let mut responses = Vec::with_capacity(peers.len());
        for peer in peers {
            let response = self.source.fetch_chain(&peer).await;
            responses.push((peer, response));
        }

        let Some((peer, chain)) = longest_valid_chain(local_len, responses) else {
            debug!("CONSENSUS - local chain of {local_len} blocks is authoritative");
            return false;
        };

        let mut ledger = self.ledger();
        if chain.len() <= ledger.len() {
            debug!("CONSENSUS - local chain grew past {peer}'s while resolving");
            return false;
        }
        let previous = ledger.len();
        ledger.replace_chain(chain);
        info!(
            "CONSENSUS - replaced chain ({previous} -> {} blocks) from {peer}",
            ledger.len()
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{valid_chain, valid_proof};
    use crate::consensus::RemoteChain;
    use crate::error::{NodeError, PeerError};
    use crate::transaction::Transaction;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Serves fixed chains per peer; unknown peers are unreachable.
    #[derive(Default)]
    struct FixedChains(HashMap<String, Vec<Block>>);

    impl ChainSource for FixedChains {
        async fn fetch_chain(&self, peer: &str) -> std::result::Result<RemoteChain, PeerError> {
            self.0
                .get(peer)
                .map(|chain| RemoteChain {
                    chain: chain.clone(),
                    length: chain.len(),
                })
                .ok_or_else(|| PeerError::Unreachable(peer.to_string()))
        }
    }

    async fn mined_chain(blocks: usize) -> Vec<Block> {
        let node = Node::with_source("peer", FixedChains::default());
        for _ in 0..blocks {
            node.mine().await.unwrap();
        }
        node.chain()
    }

    #[actix_web::test]
    async fn mining_scenario() {
        let node = Node::with_source("me", FixedChains::default());
        let genesis_hash = node.ledger().last_block().hash();

        let block = node.mine().await.unwrap();
        assert_eq!(node.chain().len(), 2);
        assert_eq!(block.index, 2);
        assert_eq!(block.previous_hash, genesis_hash);
        assert!(valid_proof(100, block.proof));
        assert_eq!(block.transactions.len(), 1);
        assert_eq!(block.transactions[0].sender, "0");
        assert_eq!(block.transactions[0].recipient, "me");
        assert_eq!(block.transactions[0].amount, Number::from(1));

        let index = node.submit_transaction("alice", "bob", Number::from(5));
        assert_eq!(index, 3);

        let block = node.mine().await.unwrap();
        assert_eq!(block.index, 3);
        assert_eq!(block.transactions.len(), 2);
        assert_eq!(
            block.transactions[0],
            Transaction::new("alice", "bob", Number::from(5))
        );
        assert_eq!(
            block.transactions[1],
            Transaction::new("0", "me", Number::from(1))
        );
        assert!(node.ledger().pending().is_empty());
        assert!(valid_chain(&node.chain()));
    }

    #[actix_web::test]
    async fn concurrent_miners_restart_when_tip_moves() {
        let node = Arc::new(Node::with_source("me", FixedChains::default()));

        let first = actix_web::rt::spawn({
            let node = node.clone();
            async move { node.mine().await }
        });
        let second = actix_web::rt::spawn({
            let node = node.clone();
            async move { node.mine().await }
        });
        let a = first.await.unwrap().unwrap();
        let b = second.await.unwrap().unwrap();

        let mut indices = vec![a.index, b.index];
        indices.sort();
        assert_eq!(indices, vec![2, 3]);

        let chain = node.chain();
        assert_eq!(chain.len(), 3);
        assert!(valid_chain(&chain));
        for block in &chain[1..] {
            assert_eq!(block.transactions, vec![Transaction::new("0", "me", Number::from(1))]);
        }
    }

    #[actix_web::test]
    async fn adopts_longer_valid_peer_chain() {
        let longer = mined_chain(3).await;
        let mut peers = FixedChains::default();
        peers.0.insert("a:5000".into(), longer.clone());

        let node = Node::with_source("me", peers);
        node.mine().await.unwrap();
        node.register_nodes(&["http://a:5000", "http://down:5000"])
            .unwrap();

        assert!(node.resolve_conflicts().await);
        assert_eq!(node.chain(), longer);
        assert!(!node.resolve_conflicts().await);
    }

    #[actix_web::test]
    async fn keeps_chain_against_equal_or_invalid_peers() {
        let equal = mined_chain(1).await;
        let mut forged = mined_chain(3).await;
        forged[2].previous_hash = "f".repeat(64);

        let mut peers = FixedChains::default();
        peers.0.insert("equal:1".into(), equal);
        peers.0.insert("forged:1".into(), forged);

        let node = Node::with_source("me", peers);
        node.mine().await.unwrap();
        let before = node.chain();
        node.register_nodes(&["equal:1", "forged:1"]).unwrap();

        assert!(!node.resolve_conflicts().await);
        assert_eq!(node.chain(), before);
    }

    #[actix_web::test]
    async fn resolve_without_peers_is_a_no_op() {
        let node = Node::with_source("me", FixedChains::default());
        assert!(!node.resolve_conflicts().await);
        assert_eq!(node.chain().len(), 1);
    }

    #[test]
    fn rejects_bad_peer_addresses() {
        let node = Node::with_source("me", FixedChains::default());
        assert!(matches!(
            node.register_nodes(&["/nope"]),
            Err(NodeError::InvalidNodeAddress(_))
        ));
        assert!(node.peer_list().is_empty());
    }

    #[test]
    fn http_nodes_get_random_ids() {
        let a = Node::new(HttpChainSource::default());
        let b = Node::new(HttpChainSource::default());
        assert_eq!(a.node_id().len(), 32);
        assert_ne!(a.node_id(), b.node_id());
    }
}
