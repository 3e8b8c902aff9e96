pub mod block;
pub mod hasher;
pub mod model;
pub mod pow;
pub mod validation;

pub use block::Block;
pub use hasher::hash_block;
pub use model::Blockchain;
pub use pow::{find_proof, valid_proof};
pub use validation::valid_chain;

/// Proof-of-Work difficulty (number of leading zero hex digits).
pub const DIFFICULTY: usize = 4;

/// Proof recorded in the genesis block.
pub const GENESIS_PROOF: u64 = 100;

/// `previous_hash` recorded in the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Sender of the mining reward, marking newly minted coins.
pub const REWARD_SENDER: &str = "0";

/// Amount paid to the node that forges a block.
pub const MINING_REWARD: u64 = 1;
