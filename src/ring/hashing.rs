use sha2::{Digest, Sha256};

/// Position of `value` on the ring: the first 8 bytes of its SHA-256 digest,
/// read big-endian.
///
/// Used for both node addresses and object keys.
pub fn ring_hash(value: &str) -> u64 {
    let digest = Sha256::digest(value.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}
