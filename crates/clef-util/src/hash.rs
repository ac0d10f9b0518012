use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of a byte slice, returning a lowercase hex string.
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Short digest used to derive collision-free file names from paths.
pub fn short_digest(data: &[u8]) -> String {
    sha256_bytes(data)[..8].to_string()
}
