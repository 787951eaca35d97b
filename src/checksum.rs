use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of `bytes`.
///
/// Recorded into the ledger when a script is applied, and recomputed on
/// later runs to detect drift in already-applied scripts.
pub fn checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
