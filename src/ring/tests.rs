//! Hash Ring Tests
//!
//! ## Test Scopes
//! - **Hashing**: SHA-256 prefix is stable and big-endian.
//! - **Membership**: add/remove keep the ring sorted, unique and consistent.
//! - **Lookup**: determinism, total coverage, successor rule and wrap-around.
//! - **Rebalancing bound**: a join only takes keys, it never shuffles them between old nodes.

#[cfg(test)]
mod tests {
    use crate::ring::{HashRing, ring_hash};
    use std::collections::HashSet;

    fn three_node_ring() -> HashRing {
        HashRing::with_nodes(["10.0.0.1:8090", "10.0.0.2:8090", "10.0.0.3:8090"])
    }

    // ============================================================
    // HASHING
    // ============================================================

    #[test]
    fn test_ring_hash_is_deterministic() {
        assert_eq!(ring_hash("node-a:9000"), ring_hash("node-a:9000"));
        assert_ne!(ring_hash("node-a:9000"), ring_hash("node-b:9000"));
    }

    #[test]
    fn test_ring_hash_uses_big_endian_digest_prefix() {
        // SHA-256("abc") = ba7816bf8f01cfea...
        assert_eq!(ring_hash("abc"), 0xba78_16bf_8f01_cfea);
    }

    // ============================================================
    // MEMBERSHIP
    // ============================================================

    #[test]
    fn test_empty_ring_has_no_owner() {
        let ring = HashRing::new();
        assert!(ring.is_empty());
        assert_eq!(ring.get_node("v1/seg.m4s"), None);
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut ring = HashRing::new();
        assert!(ring.add_node("localhost:8090"));
        assert!(!ring.add_node("localhost:8090"));

        assert_eq!(ring.len(), 1);
        assert_eq!(ring.nodes(), vec!["localhost:8090".to_string()]);
    }

    #[test]
    fn test_nodes_are_listed_in_hash_order() {
        let ring = three_node_ring();
        let nodes = ring.nodes();

        assert_eq!(nodes.len(), 3);
        let hashes: Vec<u64> = nodes.iter().map(|n| ring_hash(n)).collect();
        let mut sorted = hashes.clone();
        sorted.sort();
        assert_eq!(hashes, sorted, "Ring order must follow ascending hashes");
    }

    #[test]
    fn test_remove_node() {
        let mut ring = three_node_ring();

        assert!(ring.remove_node("10.0.0.2:8090"));
        assert!(!ring.contains("10.0.0.2:8090"));
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_remove_unknown_node_leaves_ring_unchanged() {
        let mut ring = three_node_ring();
        let before = ring.nodes();

        assert!(!ring.remove_node("10.0.0.9:8090"));
        assert_eq!(ring.nodes(), before);
    }

    // ============================================================
    // LOOKUP
    // ============================================================

    #[test]
    fn test_get_node_is_deterministic() {
        let ring = three_node_ring();

        for i in 0..200 {
            let key = format!("video-{}/segment_{}.m4s", i % 7, i);
            let first = ring.get_node(&key).map(str::to_string);
            let second = ring.get_node(&key).map(str::to_string);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_every_key_has_an_owner() {
        let ring = three_node_ring();
        let members: HashSet<String> = ring.nodes().into_iter().collect();

        for i in 0..5000 {
            let key = format!("v{}/chunk-{}.m4s", i, i * 31);
            let owner = ring.get_node(&key).expect("non-empty ring must own every key");
            assert!(members.contains(owner));
        }
    }

    #[test]
    fn test_owner_is_the_successor_position() {
        let ring = three_node_ring();
        let mut hashes: Vec<(u64, String)> =
            ring.nodes().into_iter().map(|n| (ring_hash(&n), n)).collect();
        hashes.sort();

        for i in 0..1000 {
            let key = format!("key-{}", i);
            let key_hash = ring_hash(&key);
            let expected = hashes
                .iter()
                .find(|(h, _)| *h >= key_hash)
                .unwrap_or(&hashes[0])
                .1
                .clone();
            assert_eq!(ring.get_node(&key), Some(expected.as_str()));
        }
    }

    #[test]
    fn test_keys_past_the_last_node_wrap_to_the_first() {
        let ring = three_node_ring();
        let nodes = ring.nodes();
        let first = nodes.first().unwrap().clone();
        let last_hash = ring_hash(nodes.last().unwrap());

        let key = (0..100_000)
            .map(|i| format!("wrap-{}", i))
            .find(|k| ring_hash(k) > last_hash)
            .expect("some key must hash past the largest node position");

        assert_eq!(ring.get_node(&key), Some(first.as_str()));
    }

    #[test]
    fn test_single_node_owns_everything() {
        let ring = HashRing::with_nodes(["only:1"]);
        for i in 0..100 {
            assert_eq!(ring.get_node(&format!("k{}", i)), Some("only:1"));
        }
    }

    #[test]
    fn test_remaining_nodes_cover_keyspace_after_removal() {
        let mut ring = three_node_ring();
        ring.remove_node("10.0.0.1:8090");

        for i in 0..2000 {
            let owner = ring.get_node(&format!("obj-{}", i)).unwrap();
            assert_ne!(owner, "10.0.0.1:8090");
        }
    }

    // ============================================================
    // REBALANCING BOUND
    // ============================================================

    #[test]
    fn test_join_only_moves_keys_to_the_new_node() {
        let before = three_node_ring();
        let mut after = before.clone();
        after.add_node("10.0.0.4:8090");

        let mut moved = 0;
        for i in 0..5000 {
            let key = format!("video-{}/init.mp4", i);
            let old_owner = before.get_node(&key).unwrap();
            let new_owner = after.get_node(&key).unwrap();
            if old_owner != new_owner {
                assert_eq!(new_owner, "10.0.0.4:8090");
                moved += 1;
            }
        }
        assert!(moved < 5000, "A join must not reshuffle the whole keyspace");
    }
}
