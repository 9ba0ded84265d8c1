//! # imhash
//!
//! A persistent, add-only hash index for Rust.
//!
//! ## Overview
//!
//! [`HashTable`](persistent::HashTable) is a hash table whose buckets are
//! AVL trees ordered by key hash code ([`HashTree`](persistent::HashTree)).
//! Every `add` returns a new, independent snapshot; all earlier snapshots
//! stay valid and unchanged. Unchanged buckets and subtrees are shared
//! between snapshots instead of copied.
//!
//! The structures are add-only: there is no removal and no overwrite.
//! Adding a key twice keeps both pairs; lookups return the first one.
//!
//! ## Feature Flags
//!
//! - `arc`: Use `Arc` instead of `Rc`, making snapshots `Send + Sync`
//! - `serde`: Serialization as a sequence of key-value pairs
//! - `rayon`: Parallel iteration over table buckets (implies `arc`)
//! - `fxhash`: `FxHasher` as the default hash function
//! - `ahash`: `AHasher` (fixed keys) as the default hash function
//! - `tracing`: Resize and collision events through `tracing` (default)
//! - `full`: Enable `serde`, `rayon` and `tracing`
//!
//! ## Example
//!
//! ```rust
//! use imhash::prelude::*;
//!
//! let empty: HashTable<&str, i32> = HashTable::new();
//! let table = empty.add("alpha", 1).add("beta", 2).add("gamma", 3);
//!
//! assert_eq!(table.get("beta"), Some(&2));
//! assert_eq!(table.len(), 3);
//! assert_eq!(table.divisor(), 4);
//! assert!(empty.is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types.
///
/// # Usage
///
/// ```rust
/// use imhash::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::InvariantViolation;
    pub use crate::persistent::*;
}

pub mod error;
pub mod persistent;
