use super::hashing::ring_hash;
use std::collections::HashMap;

/// Sorted node positions plus the reverse map from position to address.
///
/// `hashes` is strictly ascending and holds exactly the keys of `nodes`.
#[derive(Debug, Clone, Default)]
pub struct HashRing {
    hashes: Vec<u64>,
    nodes: HashMap<u64, String>,
}

impl HashRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ring from a list of addresses. Duplicates collapse to one entry.
    pub fn with_nodes<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ring = Self::new();
        for address in addresses {
            ring.add_node(address.as_ref());
        }
        ring
    }

    /// Inserts `address` at its hash position.
    ///
    /// Returns `false` without touching the ring when the position is already
    /// taken, either by the same address or by a colliding one.
    pub fn add_node(&mut self, address: &str) -> bool {
        let hash = ring_hash(address);
        match self.hashes.binary_search(&hash) {
            Ok(_) => false,
            Err(idx) => {
                self.hashes.insert(idx, hash);
                self.nodes.insert(hash, address.to_string());
                true
            }
        }
    }

    /// Removes `address` from the ring if it is the one occupying its position.
    pub fn remove_node(&mut self, address: &str) -> bool {
        let hash = ring_hash(address);
        if self.nodes.get(&hash).map(String::as_str) != Some(address) {
            return false;
        }
        self.nodes.remove(&hash);
        if let Ok(idx) = self.hashes.binary_search(&hash) {
            self.hashes.remove(idx);
        }
        true
    }

    /// Owner of `key`: the successor of `ring_hash(key)`, wrapping to the
    /// smallest position. `None` only when the ring is empty.
    pub fn get_node(&self, key: &str) -> Option<&str> {
        if self.hashes.is_empty() {
            return None;
        }
        let key_hash = ring_hash(key);
        let idx = self.hashes.partition_point(|&h| h < key_hash);
        let owner = if idx == self.hashes.len() {
            self.hashes[0]
        } else {
            self.hashes[idx]
        };
        self.nodes.get(&owner).map(String::as_str)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.nodes.get(&ring_hash(address)).map(String::as_str) == Some(address)
    }

    /// Member addresses in ring order (ascending hash).
    pub fn nodes(&self) -> Vec<String> {
        self.hashes
            .iter()
            .filter_map(|hash| self.nodes.get(hash).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}
