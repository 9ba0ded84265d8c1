//! Property-based tests for HashTable.
//!
//! These tests verify that HashTable satisfies the expected laws
//! and invariants using proptest.

mod common;

use common::{Collider, Identity};
use imhash::persistent::HashTable;
use proptest::prelude::*;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

fn entry_strategy(max_size: usize) -> impl Strategy<Value = Vec<(i32, i32)>> {
    prop::collection::vec((-500_i32..500, any::<i32>()), 0..max_size)
}

fn colliding_strategy(max_size: usize) -> impl Strategy<Value = Vec<(Collider, i32)>> {
    prop::collection::vec(
        ((0_u64..16), "[a-c]", any::<i32>())
            .prop_map(|(hash, name, value)| (Collider::new(hash, &name), value)),
        0..max_size,
    )
}

fn first_values<K: PartialEq + Clone, V: Clone>(entries: &[(K, V)]) -> Vec<(K, V)> {
    let mut firsts: Vec<(K, V)> = Vec::new();
    for (key, value) in entries {
        if !firsts.iter().any(|(seen, _)| seen == key) {
            firsts.push((key.clone(), value.clone()));
        }
    }
    firsts
}

// =============================================================================
// Size and Shape Laws
// =============================================================================

proptest! {
    /// Law: after N adds the table holds N pairs and traversal yields N pairs.
    #[test]
    fn prop_len_counts_every_add(entries in entry_strategy(300)) {
        let expected = entries.len();
        let table: HashTable<i32, i32> = entries.into_iter().collect();
        prop_assert_eq!(table.len(), expected);
        prop_assert_eq!(table.iter().count(), expected);
    }

    /// Law: the divisor is the smallest power of two (at least 2) holding every pair.
    #[test]
    fn prop_divisor_tracks_len(entries in entry_strategy(300)) {
        let table: HashTable<i32, i32> = entries.into_iter().collect();
        let expected = table.len().next_power_of_two().max(2);
        prop_assert_eq!(table.divisor(), expected);
        prop_assert_eq!(table.buckets().len(), expected);
    }

    /// Law: every pair sits in the bucket its hash selects; every bucket is a valid tree.
    #[test]
    fn prop_invariants_hold(entries in colliding_strategy(200)) {
        let table: HashTable<Collider, i32, Identity> = entries.into_iter().collect();
        prop_assert!(table.check_invariants().is_ok());
    }

    /// Law: within a bucket, traversal is non-decreasing in hash code.
    #[test]
    fn prop_bucket_traversal_non_decreasing(entries in colliding_strategy(200)) {
        let table: HashTable<Collider, i32, Identity> = entries.into_iter().collect();
        for bucket in table.buckets() {
            let hashes: Vec<u64> = bucket.keys().map(|key| key.hash).collect();
            prop_assert!(hashes.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }
}

// =============================================================================
// Get-Add Laws
// =============================================================================

proptest! {
    /// Law: every key maps to the first value added for it.
    #[test]
    fn prop_get_returns_first_added(entries in entry_strategy(200)) {
        let table: HashTable<i32, i32> = entries.iter().copied().collect();
        for (key, value) in first_values(&entries) {
            prop_assert_eq!(table.get(&key), Some(&value));
        }
    }

    /// Law: first-wins also holds for colliding keys.
    #[test]
    fn prop_get_returns_first_added_with_collisions(entries in colliding_strategy(100)) {
        let table: HashTable<Collider, i32, Identity> = entries.iter().cloned().collect();
        for (key, value) in first_values(&entries) {
            prop_assert_eq!(table.get(&key), Some(&value));
        }
    }

    /// Law: keys never added are absent.
    #[test]
    fn prop_absent_key_not_found(entries in entry_strategy(100), key in 500_i32..1_000) {
        let table: HashTable<i32, i32> = entries.into_iter().collect();
        prop_assert_eq!(table.get(&key), None);
    }

    /// Law: add leaves the original table unchanged, resize or not.
    #[test]
    fn prop_add_does_not_modify_original(entries in entry_strategy(100), key: i32, value: i32) {
        let table: HashTable<i32, i32> = entries.iter().copied().collect();
        let divisor = table.divisor();
        let before: Vec<(i32, i32)> = table.iter().map(|(key, value)| (*key, *value)).collect();

        let extended = table.add(key, value);

        let after: Vec<(i32, i32)> = table.iter().map(|(key, value)| (*key, *value)).collect();
        prop_assert_eq!(before, after);
        prop_assert_eq!(table.len(), entries.len());
        prop_assert_eq!(table.divisor(), divisor);
        prop_assert_eq!(extended.len(), entries.len() + 1);
    }

    /// Law: a lookup that succeeds before an add succeeds with the same value after it.
    #[test]
    fn prop_add_preserves_lookups(entries in entry_strategy(100), key: i32, value: i32) {
        let table: HashTable<i32, i32> = entries.iter().copied().collect();
        let extended = table.add(key, value);
        for (existing, _) in &entries {
            prop_assert_eq!(extended.get(existing), table.get(existing));
        }
    }
}
