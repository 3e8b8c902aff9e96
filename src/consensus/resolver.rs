use std::time::Duration;

use actix_web::http::StatusCode;
use log::{debug, warn};
use serde::Deserialize;

use crate::blockchain::{Block, valid_chain};
use crate::error::PeerError;

/// Upper bound on a peer's `/chain` body.
const MAX_CHAIN_BYTES: usize = 64 * 1024 * 1024;

/// A peer's answer to `GET /chain`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

impl RemoteChain {
    /// The blocks, provided the reported length matches what was sent.
    pub fn into_blocks(self) -> Result<Vec<Block>, PeerError> {
        if self.length != self.chain.len() {
            return Err(PeerError::LengthMismatch {
                reported: self.length,
                actual: self.chain.len(),
            });
        }
        Ok(self.chain)
    }
}

/// Where a node gets its peers' chains from.
#[allow(async_fn_in_trait)]
pub trait ChainSource {
    async fn fetch_chain(&self, peer: &str) -> Result<RemoteChain, PeerError>;
}

/// Fetches `http://<peer>/chain` with a bounded per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpChainSource {
    timeout: Duration,
}

impl HttpChainSource {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpChainSource {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl ChainSource for HttpChainSource {
    async fn fetch_chain(&self, peer: &str) -> Result<RemoteChain, PeerError> {
        let client = awc::Client::builder().timeout(self.timeout).finish();
        let mut response = client
            .get(format!("http://{peer}/chain"))
            .send()
            .await
            .map_err(|e| PeerError::Unreachable(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(PeerError::BadStatus(response.status().as_u16()));
        }

        response
            .json::<RemoteChain>()
            .limit(MAX_CHAIN_BYTES)
            .await
            .map_err(|e| PeerError::Decode(e.to_string()))
    }
}

/// Pick the longest valid chain that is strictly longer than `local_len`.
///
/// Responses are considered in the order given; on equal length the first
/// one wins. Failed or invalid responses are logged and skipped.
pub fn longest_valid_chain<I>(local_len: usize, responses: I) -> Option<(String, Vec<Block>)>
where
    I: IntoIterator<Item = (String, Result<RemoteChain, PeerError>)>,
{
    responses
        .into_iter()
        .fold(None, |best: Option<(String, Vec<Block>)>, (peer, response)| {
            let chain = match response.and_then(RemoteChain::into_blocks) {
                Ok(chain) => chain,
                Err(e) => {
                    warn!("CONSENSUS - skipping peer {peer}: {e}");
                    return best;
                }
            };

            let to_beat = best.as_ref().map_or(local_len, |(_, c)| c.len());
            if chain.len() <= to_beat {
                debug!(
                    "CONSENSUS - peer {peer} has {} blocks, not longer than {to_beat}",
                    chain.len()
                );
                return best;
            }
            if !valid_chain(&chain) {
                warn!("CONSENSUS - peer {peer} sent an invalid chain of {} blocks", chain.len());
                return best;
            }

            debug!("CONSENSUS - peer {peer} leads with {} blocks", chain.len());
            Some((peer, chain))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{Blockchain, find_proof};

    fn mined(blocks: usize) -> Vec<Block> {
        let mut bc = Blockchain::new();
        for _ in 0..blocks {
            let proof = find_proof(bc.last_block().proof);
            bc.new_block(proof, None);
        }
        bc.chain().to_vec()
    }

    fn ok(peer: &str, chain: &[Block]) -> (String, Result<RemoteChain, PeerError>) {
        (
            peer.to_string(),
            Ok(RemoteChain {
                chain: chain.to_vec(),
                length: chain.len(),
            }),
        )
    }

    #[test]
    fn picks_the_longest_valid_chain() {
        let short = mined(1);
        let long = mined(3);
        let best = longest_valid_chain(2, vec![ok("a:1", &short), ok("b:1", &long)]);
        let (peer, chain) = best.unwrap();
        assert_eq!(peer, "b:1");
        assert_eq!(chain, long);
    }

    #[test]
    fn never_adopts_equal_or_shorter() {
        let chain = mined(2);
        assert!(longest_valid_chain(3, vec![ok("a:1", &chain)]).is_none());
        assert!(longest_valid_chain(4, vec![ok("a:1", &chain)]).is_none());
    }

    #[test]
    fn skips_invalid_chains() {
        let mut forged = mined(3);
        forged[3].proof += 1;
        let honest = mined(2);
        let (peer, chain) =
            longest_valid_chain(1, vec![ok("a:1", &forged), ok("b:1", &honest)]).unwrap();
        assert_eq!(peer, "b:1");
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn skips_failed_peers_and_length_lies() {
        let chain = mined(2);
        let lying = (
            "c:1".to_string(),
            Ok(RemoteChain {
                chain: chain.clone(),
                length: 99,
            }),
        );
        let responses = vec![
            ("a:1".to_string(), Err(PeerError::Unreachable("refused".into()))),
            ("b:1".to_string(), Err(PeerError::BadStatus(500))),
            lying,
        ];
        assert!(longest_valid_chain(1, responses).is_none());
    }

    #[test]
    fn ties_keep_the_first_response() {
        let first = mined(2);
        let mut second = mined(2);
        // Distinct chain of the same length.
        second[0].timestamp += 1.0;
        second[1].previous_hash = second[0].hash();
        second[2].previous_hash = second[1].hash();
        assert!(valid_chain(&second));
        assert_ne!(first, second);

        let (peer, chain) =
            longest_valid_chain(1, vec![ok("a:1", &first), ok("b:1", &second)]).unwrap();
        assert_eq!(peer, "a:1");
        assert_eq!(chain, first);
    }
}
