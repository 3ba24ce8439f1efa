use sha2::{Digest, Sha256};

/// SHA-256 digest as lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
