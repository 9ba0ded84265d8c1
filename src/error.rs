//! Errors reported by the structural diagnostics.
//!
//! The persistent structures themselves never fail: every `add` and every
//! lookup is total. [`InvariantViolation`] is only produced by
//! [`HashTree::check_invariants`](crate::persistent::HashTree::check_invariants)
//! and [`HashTable::check_invariants`](crate::persistent::HashTable::check_invariants),
//! which walk a snapshot and verify the shape it is supposed to have.
//!
//! # Examples
//!
//! ```rust
//! use imhash::persistent::HashTable;
//!
//! let table: HashTable<i32, &str> = (0..100).map(|index| (index, "value")).collect();
//! assert!(table.check_invariants().is_ok());
//! ```

use thiserror::Error;

/// A broken structural invariant found while checking a snapshot.
///
/// Snapshots built only through `add` never produce one of these. They show
/// up when a key type breaks the `Hash`/`Eq` contract (for example a hash
/// that depends on interior mutability).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Sibling subtree heights differ by more than one.
    #[error("node {hash:#x} is unbalanced: left height {left_height}, right height {right_height}")]
    Unbalanced {
        /// Hash code of the offending node.
        hash: u64,
        /// Height of the left subtree.
        left_height: usize,
        /// Height of the right subtree.
        right_height: usize,
    },

    /// The cached height does not match the heights of the children.
    #[error("node {hash:#x} records height {recorded} but its children give {computed}")]
    HeightMismatch {
        /// Hash code of the offending node.
        hash: u64,
        /// Height stored in the node.
        recorded: usize,
        /// Height recomputed from the subtrees.
        computed: usize,
    },

    /// A node lies on the wrong side of an ancestor.
    #[error("node {hash:#x} lies outside the ancestor bound {bound:#x}")]
    OutOfOrder {
        /// Hash code of the ancestor whose ordering is violated.
        bound: u64,
        /// Hash code of the misplaced node.
        hash: u64,
    },

    /// A node's stored hash differs from the hash of its primary key.
    #[error("node stores hash {recorded:#x} but its key hashes to {computed:#x}")]
    HashMismatch {
        /// Hash code stored in the node.
        recorded: u64,
        /// Hash code recomputed from the key.
        computed: u64,
    },

    /// A collision-chain entry hashes differently from its node.
    #[error("collision chain of node {node_hash:#x} holds an entry hashing to {entry_hash:#x}")]
    ForeignDuplicate {
        /// Hash code of the node owning the chain.
        node_hash: u64,
        /// Hash code of the stray entry.
        entry_hash: u64,
    },

    /// The cached entry count disagrees with the entries actually reachable.
    #[error("recorded length {recorded} but {counted} entries are reachable")]
    LengthMismatch {
        /// Length stored in the structure.
        recorded: usize,
        /// Entries found by walking the structure.
        counted: usize,
    },

    /// The bucket array length is not a power of two.
    #[error("divisor {divisor} is not a power of two")]
    DivisorNotPowerOfTwo {
        /// The offending bucket count.
        divisor: usize,
    },

    /// An entry sits in a bucket its hash does not select.
    #[error("entry found in bucket {bucket} but its hash selects bucket {expected_bucket}")]
    MisplacedEntry {
        /// Bucket the entry was found in.
        bucket: usize,
        /// Bucket selected by `hash & (divisor - 1)`.
        expected_bucket: usize,
    },
}
