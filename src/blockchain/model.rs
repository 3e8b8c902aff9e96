use serde_json::Number;

use super::{Block, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// In-memory ledger: the chain plus the pool of transactions waiting for the next block.
#[derive(Debug)]
pub struct Blockchain {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Blockchain {
    /// Initialize a new blockchain with a genesis block.
    pub fn new() -> Self {
        let mut bc = Self {
            chain: Vec::new(),
            pending: Vec::new(),
        };
        bc.new_block(GENESIS_PROOF, Some(GENESIS_PREVIOUS_HASH.to_string()));
        bc
    }

    /// Queue a transaction for the next block and return that block's index.
    pub fn new_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: Number,
    ) -> u64 {
        self.pending
            .push(Transaction::new(sender, recipient, amount));
        self.last_block().index + 1
    }

    /// Seal every pending transaction into a new block and append it.
    ///
    /// `previous_hash` defaults to the hash of the current last block.
    pub fn new_block(&mut self, proof: u64, previous_hash: Option<String>) -> &Block {
        let previous_hash = previous_hash.unwrap_or_else(|| self.last_block().hash());
        let index = self.chain.len() as u64 + 1;
        let transactions = std::mem::take(&mut self.pending);

        self.chain
            .push(Block::new(index, transactions, proof, previous_hash));
        self.last_block()
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
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

    /// Swap in a chain adopted through consensus. Pending transactions are kept.
    pub fn replace_chain(&mut self, chain: Vec<Block>) {
        assert!(!chain.is_empty(), "replacement chain must contain a genesis block");
        self.chain = chain;
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}
