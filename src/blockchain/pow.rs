use super::{DIFFICULTY, hasher::sha256_hex};

/// True when `sha256("{last_proof}{proof}")` starts with `DIFFICULTY` hex zeros.
pub fn valid_proof(last_proof: u64, proof: u64) -> bool {
    let guess = format!("{last_proof}{proof}");
    sha256_hex(guess.as_bytes())
        .bytes()
        .take(DIFFICULTY)
        .all(|c| c == b'0')
}

/// Search `0, 1, 2, ...` for the first proof accepted by [`valid_proof`].
///
/// CPU-bound and unbounded; callers serving requests should run this on a
/// blocking worker.
pub fn find_proof(last_proof: u64) -> u64 {
    let mut proof = 0u64;
    while !valid_proof(last_proof, proof) {
        proof = proof.wrapping_add(1);
    }
    proof
}
