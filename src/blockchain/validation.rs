use super::{Block, valid_proof};

/// Check linkage and Proof-of-Work for every adjacent pair of blocks.
///
/// Chains of length 0 or 1 are trivially valid; the genesis block itself is
/// not inspected.
pub fn valid_chain(chain: &[Block]) -> bool {
    chain.windows(2).all(|pair| {
        let (prev, current) = (&pair[0], &pair[1]);

        // Check linkage
        if current.previous_hash != prev.hash() {
            return false;
        }

        // Check PoW against the predecessor's proof
        valid_proof(prev.proof, current.proof)
    })
}
