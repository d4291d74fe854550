//! Solution and Commit Hashing
//!
//! Deterministic hashing shared by puzzle creation, commitments and reveals:
//! - Puzzle hash: `sha256(solution)`
//! - Commit binding: `sha256(solution || scavenger)`
//!
//! Both are rendered as lowercase hex, which is also the key format of the
//! scavenge and commit stores.

use sha2::{Sha256, Digest};

use super::address::Address;

/// Raw digest output (256 bits / 32 bytes).
pub type Digest32 = [u8; 32];

/// Version tag of the hash scheme used for stored keys.
pub const HASH_SCHEME: &str = "sha256-hex/v1";

/// Incremental hasher for values that must hash identically everywhere.
///
/// Order of updates is part of the hash; `update_str("4")` followed by
/// `update_str("bob")` is the same as `update_str("4bob")`.
pub struct SolutionHasher {
    hasher: Sha256,
}

impl SolutionHasher {
    /// Create an empty hasher.
    pub fn new() -> Self {
        Self { hasher: Sha256::new() }
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with the UTF-8 bytes of a string.
    #[inline]
    pub fn update_str(&mut self, value: &str) {
        self.hasher.update(value.as_bytes());
    }

    /// Finalize and return the raw digest.
    pub fn finalize(self) -> Digest32 {
        self.hasher.finalize().into()
    }

    /// Finalize and return the lowercase hex digest.
    pub fn finalize_hex(self) -> String {
        hex::encode(self.finalize())
    }
}

impl Default for SolutionHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute a raw SHA-256 digest of arbitrary data.
pub fn hash_bytes(data: &[u8]) -> Digest32 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 of `data` as lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(hash_bytes(data))
}

/// Puzzle hash of a plaintext solution.
pub fn solution_hash(solution: &str) -> String {
    sha256_hex(solution.as_bytes())
}

/// Binding hash of a solution to the scavenger who commits to it.
///
/// Concatenates the plaintext with the canonical address string, no
/// separator. A different scavenger revealing the same plaintext produces a
/// different hash and so cannot claim someone else's commitment.
pub fn commit_hash(solution: &str, scavenger: &Address) -> String {
    let mut hasher = SolutionHasher::new();
    hasher.update_str(solution);
    hasher.update_str(scavenger.as_str());
    hasher.finalize_hex()
}
