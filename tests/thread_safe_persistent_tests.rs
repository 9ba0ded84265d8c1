//! Integration tests for sharing snapshots across threads.
//!
//! With the `arc` feature every table and tree is `Send + Sync`, so one
//! snapshot can be read from many threads while each thread derives its
//! own extensions.

#![cfg(feature = "arc")]

use imhash::persistent::{HashTable, HashTree};
use rstest::rstest;
use std::sync::Arc;
use std::thread;

// =============================================================================
// HashTable Integration Tests
// =============================================================================

#[rstest]
fn test_table_concurrent_reads() {
    let table: Arc<HashTable<u32, u32>> = Arc::new((0..1_000).map(|key| (key, key * 3)).collect());

    let handles: Vec<_> = (0..4)
        .map(|offset| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                for key in (offset..1_000).step_by(4) {
                    assert_eq!(table.get(&key), Some(&(key * 3)));
                }
                table.iter().count()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("Thread panicked"), 1_000);
    }
}

#[rstest]
fn test_table_divergent_adds_from_one_snapshot() {
    let original: Arc<HashTable<String, usize>> =
        Arc::new((0..10).map(|index| (format!("base-{index}"), index)).collect());

    let handles: Vec<_> = (0..4)
        .map(|thread_index| {
            let table = Arc::clone(&original);
            thread::spawn(move || {
                let mut extended = (*table).clone();
                for index in 0..50 {
                    extended = extended.add(format!("thread-{thread_index}-{index}"), index);
                }
                // The shared snapshot is unchanged
                assert_eq!(table.len(), 10);
                extended
            })
        })
        .collect();

    let results: Vec<HashTable<String, usize>> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Thread panicked"))
        .collect();

    for (thread_index, table) in results.iter().enumerate() {
        assert_eq!(table.len(), 60);
        assert_eq!(table.get("base-3"), Some(&3));
        assert_eq!(table.get(&format!("thread-{thread_index}-49")), Some(&49));
        let other = (thread_index + 1) % 4;
        assert_eq!(table.get(&format!("thread-{other}-0")), None);
        assert!(table.check_invariants().is_ok());
    }
    assert_eq!(original.len(), 10);
}

// =============================================================================
// HashTree Integration Tests
// =============================================================================

#[rstest]
fn test_tree_iterated_from_several_threads() {
    let tree: Arc<HashTree<u64, u64>> = Arc::new((0..500).map(|key| (key, key)).collect());
    let expected: Vec<(u64, u64)> = tree.iter().map(|(key, value)| (*key, *value)).collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tree = Arc::clone(&tree);
            thread::spawn(move || {
                tree.iter()
                    .map(|(key, value)| (*key, *value))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("Thread panicked"), expected);
    }
}

#[rstest]
fn test_snapshot_sent_to_another_thread() {
    let table = HashTable::new().add("sent", 1);
    let handle = thread::spawn(move || table.add("received", 2));
    let table = handle.join().expect("Thread panicked");

    assert_eq!(table.get("sent"), Some(&1));
    assert_eq!(table.get("received"), Some(&2));
}

// =============================================================================
// Parallel Iteration
// =============================================================================

#[cfg(feature = "rayon")]
#[rstest]
fn test_par_iter_matches_iter() {
    use rayon::prelude::*;

    let table: HashTable<u64, u64> = (0..10_000).map(|key| (key, key * 2)).collect();
    let parallel: u64 = table.par_iter().map(|(_, value)| *value).sum();
    let sequential: u64 = table.values().sum();
    assert_eq!(parallel, sequential);
    assert_eq!(table.par_iter().count(), table.len());
}
