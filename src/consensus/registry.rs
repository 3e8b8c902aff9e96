use std::collections::BTreeSet;

use actix_web::http::Uri;

use crate::error::{NodeError, Result};

/// Reduce a peer address to its `host[:port]` authority.
///
/// Accepts full URLs (`http://10.0.0.5:5000/`) as well as bare `10.0.0.5:5000`.
pub fn normalize_address(address: &str) -> Result<String> {
    let uri: Uri = address
        .trim()
        .parse()
        .map_err(|_| NodeError::InvalidNodeAddress(address.to_string()))?;
    uri.authority()
        .map(|a| a.as_str().to_string())
        .filter(|a| !a.is_empty())
        .ok_or_else(|| NodeError::InvalidNodeAddress(address.to_string()))
}

/// Deduplicated set of peer authorities, iterated in sorted order.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: BTreeSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer. Returns `true` if it was not known yet.
    pub fn register(&mut self, address: &str) -> Result<bool> {
        let authority = normalize_address(address)?;
        Ok(self.peers.insert(authority))
    }

    /// Register several peers; nothing is inserted unless every address is valid.
    pub fn register_all<S: AsRef<str>>(&mut self, addresses: &[S]) -> Result<usize> {
        let normalized = addresses
            .iter()
            .map(|a| normalize_address(a.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let mut added = 0;
        for authority in &normalized {
            if self.register(authority)? {
                added += 1;
            }
        }
        Ok(added)
    }

    #[cfg(test)]
    pub fn contains(&self, authority: &str) -> bool {
        self.peers.contains(authority)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Snapshot of all peers in sorted order.
    pub fn to_vec(&self) -> Vec<String> {
        self.peers.iter().cloned().collect()
    }
}
