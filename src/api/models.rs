use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::blockchain::Block;
use crate::error::{NodeError, Result};
use crate::node::Node;
use crate::transaction::Transaction;

/// Shared application state: this process's node.
pub type AppState = Node;

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
    pub length: usize,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

/* ---------- TX API Models ---------- */

/// Fields are optional so missing ones can be reported by name.
#[derive(Deserialize)]
pub struct NewTransactionRequest {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub amount: Option<Number>,
}

impl NewTransactionRequest {
    /// Split into `(sender, recipient, amount)`, naming any missing field.
    pub fn into_parts(self) -> Result<(String, String, Number)> {
        match (self.sender, self.recipient, self.amount) {
            (Some(sender), Some(recipient), Some(amount)) => Ok((sender, recipient, amount)),
            (sender, recipient, amount) => {
                let missing = [
                    ("sender", sender.is_none()),
                    ("recipient", recipient.is_none()),
                    ("amount", amount.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(name))
                .collect::<Vec<_>>();
                Err(NodeError::MissingFields(missing.join(", ")))
            }
        }
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: &'static str,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum ResolveResponse {
    Replaced {
        message: &'static str,
        new_chain: Vec<Block>,
    },
    Authoritative {
        message: &'static str,
        chain: Vec<Block>,
    },
}
