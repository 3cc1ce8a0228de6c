//! Service API key hashing.
//!
//! Trusted system callers (schedulers, back-office scripts) authenticate
//! with a static key. Only its SHA-256 digest is kept in memory after
//! startup; presented keys are hashed and compared digest to digest.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hex digest of an API key.
pub fn hash_api_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a presented key against a stored digest.
pub fn matches_api_key(presented: &str, stored_hash: &str) -> bool {
    let presented_hash = hash_api_key(presented);
    // Equal-length hex digests; fold the whole string so timing does not
    // depend on the position of the first mismatch.
    presented_hash.len() == stored_hash.len()
        && presented_hash
            .bytes()
            .zip(stored_hash.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
