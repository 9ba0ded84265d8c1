//! Persistent (immutable) hash index structures.
//!
//! This module provides add-only data structures that use structural
//! sharing to minimize copying:
//!
//! - [`KeyValue`]: Immutable key-value pair
//! - [`AppendList`]: Persistent append-only list (collision chains)
//! - [`HashTree`]: Persistent AVL tree ordered by key hash code
//! - [`HashTable`]: Persistent hash table with [`HashTree`] buckets
//!
//! # Structural Sharing
//!
//! Every `add` creates a new version without copying the entire structure.
//! Previous versions stay valid and unchanged forever.
//!
//! # Examples
//!
//! ## `HashTree`
//!
//! ```rust
//! use imhash::persistent::HashTree;
//!
//! let tree = HashTree::new().add(3, "three").add(1, "one");
//! assert_eq!(tree.get(&1), Some(&"one"));
//!
//! // Structural sharing: the original tree is preserved
//! let extended = tree.add(2, "two");
//! assert_eq!(tree.len(), 2);     // Original unchanged
//! assert_eq!(extended.len(), 3); // New tree
//! ```
//!
//! ## `HashTable`
//!
//! ```rust
//! use imhash::persistent::HashTable;
//!
//! let table = HashTable::new()
//!     .add("one".to_string(), 1)
//!     .add("two".to_string(), 2);
//! assert_eq!(table.get("one"), Some(&1));
//!
//! // No overwrite: the first value added for a key wins
//! let repeated = table.add("one".to_string(), 100);
//! assert_eq!(repeated.get("one"), Some(&1));
//! assert_eq!(repeated.len(), 3);
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod append_list;
mod hash_table;
mod hash_tree;
mod hashing;
mod key_value;

pub use append_list::AppendList;
pub use hash_table::HashTable;
pub use hash_table::HashTableIterator;
pub use hash_tree::HashTree;
pub use hash_tree::HashTreeIterator;
pub use hashing::DefaultHashBuilder;
pub use key_value::KeyValue;

// =============================================================================
// Tests
// =============================================================================
