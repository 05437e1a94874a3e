//! Consistent Hash Ring
//!
//! Maps object keys to the storage node that owns them. Each node contributes a
//! single position on a 64-bit ring (no virtual nodes); a key belongs to the first
//! node at or after its own position, wrapping around past the largest hash.
//!
//! A membership change therefore only moves the keys between the changed node and
//! its predecessor, roughly `1/N` of the keyspace.
//!
//! The ring is a plain value with no interior locking. The coordinator owns it and
//! guards it together with the client map.

pub mod hash_ring;
pub mod hashing;

pub use hash_ring::HashRing;
pub use hashing::ring_hash;

#[cfg(test)]
mod tests;
