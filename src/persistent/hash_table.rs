//! Persistent (immutable) hash table with hash-tree buckets.
//!
//! This module provides [`HashTable`], an add-only hash index whose buckets
//! are [`HashTree`]s.
//!
//! # Overview
//!
//! The table holds a power-of-two array of buckets (the *divisor*). A key
//! lives in bucket `hash(key) & (divisor - 1)`. The table starts with two
//! buckets and doubles when the number of pairs reaches the number of
//! buckets, so every bucket tree stays small.
//!
//! - O(divisor) `add` without resize: bucket handles are copied, one bucket
//!   tree gets a new path
//! - O(N) `add` on resize, amortized O(1) over a growth sequence since the
//!   divisor exactly doubles
//! - O(log c) get, where `c` is the size of the bucket
//! - O(1) len, `is_empty` and divisor
//!
//! # Examples
//!
//! ```rust
//! use imhash::persistent::HashTable;
//!
//! let table = HashTable::new()
//!     .add("one".to_string(), 1)
//!     .add("two".to_string(), 2)
//!     .add("three".to_string(), 3);
//!
//! assert_eq!(table.get("two"), Some(&2));
//! assert_eq!(table.divisor(), 4);
//!
//! // Structural sharing: the original table is preserved
//! let extended = table.add("four".to_string(), 4);
//! assert_eq!(table.len(), 3);
//! assert_eq!(extended.get("four"), Some(&4));
//! ```
//!
//! # Concurrency
//!
//! A table never changes once built. With the `arc` feature it is `Send +
//! Sync` and can be read from any number of threads. Two threads adding to
//! the same snapshot get two independent snapshots; publishing one of them
//! as "the current table" is up to the caller.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::iter::FromIterator;

use super::hashing::{DefaultHashBuilder, bucket_index, hash_of};
use super::{HashTree, HashTreeIterator, ReferenceCounter};
use crate::error::InvariantViolation;

// =============================================================================
// Constants
// =============================================================================

/// Bucket count of the empty table.
const INITIAL_DIVISOR: usize = 2;

// =============================================================================
// HashTable Definition
// =============================================================================

/// A persistent (immutable) add-only hash table.
///
/// Every [`add`](Self::add) returns a new table; the receiver is never
/// modified. Adding an existing key does not overwrite: the new pair is
/// stored behind the first one, `get` keeps returning the first value and
/// traversal yields both.
///
/// # Time Complexity
///
/// | Operation      | Complexity                   |
/// |----------------|------------------------------|
/// | `new`          | O(1)                         |
/// | `get`          | O(log c)                     |
/// | `add`          | O(divisor), O(N) on resize   |
/// | `len`          | O(1)                         |
/// | `divisor`      | O(1)                         |
///
/// # Examples
///
/// ```rust
/// use imhash::persistent::HashTable;
///
/// let empty: HashTable<&str, i32> = HashTable::new();
/// assert_eq!(empty.divisor(), 2);
///
/// let table = empty.add("key", 1).add("key", 2);
/// assert_eq!(table.get("key"), Some(&1));
/// assert_eq!(table.len(), 2);
/// ```
pub struct HashTable<K, V, S = DefaultHashBuilder> {
    /// Bucket trees; the slice length is the divisor.
    buckets: ReferenceCounter<[HashTree<K, V, S>]>,
    /// Number of pairs ever added, collision-chain entries included.
    length: usize,
}

impl<K, V> HashTable<K, V> {
    /// Creates a new empty table with two empty buckets, using
    /// [`DefaultHashBuilder`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use imhash::persistent::HashTable;
    ///
    /// let table: HashTable<String, i32> = HashTable::new();
    /// assert!(table.is_empty());
    /// assert_eq!(table.divisor(), 2);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::empty()
    }
}

impl<K, V, S> HashTable<K, V, S> {
    /// Creates a new empty table with two empty buckets, for any hash
    /// builder `S`.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            buckets: (0..INITIAL_DIVISOR).map(|_| HashTree::empty()).collect(),
            length: 0,
        }
    }

    /// Returns the number of pairs ever added, repeated keys included.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if nothing has been added.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the number of buckets; always a power of two.
    #[inline]
    #[must_use]
    pub fn divisor(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the bucket trees, indexed by `hash & (divisor - 1)`.
    #[inline]
    #[must_use]
    pub fn buckets(&self) -> &[HashTree<K, V, S>] {
        &self.buckets
    }

    /// Returns an iterator over all pairs: buckets in index order, each
    /// bucket in ascending hash order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use imhash::persistent::HashTable;
    ///
    /// let table: HashTable<i32, i32> = (1..=4).map(|index| (index, index)).collect();
    /// let sum: i32 = table.iter().map(|(_, value)| value).sum();
    /// assert_eq!(sum, 10);
    /// ```
    #[must_use]
    pub fn iter(&self) -> HashTableIterator<'_, K, V, S> {
        HashTableIterator {
            buckets: self.buckets.iter(),
            current: None,
            remaining: self.length,
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Returns the value first added for `key`.
    ///
    /// Hashes the key, selects bucket `hash & (divisor - 1)` and searches
    /// that bucket's tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use imhash::persistent::HashTable;
    ///
    /// let table = HashTable::new().add("hello".to_string(), 42);
    /// assert_eq!(table.get("hello"), Some(&42));
    /// assert_eq!(table.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = hash_of::<S, Q>(key);
        self.buckets[bucket_index(hash, self.divisor())].get_hashed(hash, key)
    }

    /// Returns `true` if `get` would find a value for `key`.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Verifies the divisor, every bucket tree, bucket placement and length.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let divisor = self.divisor();
        if !divisor.is_power_of_two() {
            return Err(InvariantViolation::DivisorNotPowerOfTwo { divisor });
        }

        let mut counted = 0;
        for (bucket, tree) in self.buckets.iter().enumerate() {
            tree.check_invariants()?;
            let mut entries = tree.iter();
            while let Some((hash, _, _)) = entries.next_hashed() {
                let expected_bucket = bucket_index(hash, divisor);
                if expected_bucket != bucket {
                    return Err(InvariantViolation::MisplacedEntry {
                        bucket,
                        expected_bucket,
                    });
                }
            }
            counted += tree.len();
        }

        if counted == self.length {
            Ok(())
        } else {
            Err(InvariantViolation::LengthMismatch {
                recorded: self.length,
                counted,
            })
        }
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone,
    S: BuildHasher + Default,
{
    /// Creates a table containing a single pair.
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::empty().add(key, value)
    }

    /// Adds a key-value pair, returning the new table.
    ///
    /// When the pair count has reached the divisor, the divisor doubles and
    /// every pair is re-added to a fresh bucket array before the new pair is
    /// placed. Otherwise the bucket handles are copied and only the selected
    /// bucket is replaced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use imhash::persistent::HashTable;
    ///
    /// let table = HashTable::new().add(1, "one").add(2, "two");
    /// assert_eq!(table.divisor(), 2);
    ///
    /// // The third add finds len == divisor and doubles first.
    /// let grown = table.add(3, "three");
    /// assert_eq!(grown.divisor(), 4);
    /// assert_eq!(table.divisor(), 2); // Original unchanged
    /// ```
    #[must_use]
    pub fn add(&self, key: K, value: V) -> Self {
        let hash = hash_of::<S, K>(&key);
        let divisor = self.divisor();

        let mut buckets = if self.length >= divisor {
            self.rehashed(divisor * 2)
        } else {
            self.buckets.to_vec()
        };

        let index = bucket_index(hash, buckets.len());
        buckets[index] = buckets[index].add_hashed(hash, key, value);

        Self {
            buckets: ReferenceCounter::from(buckets),
            length: self.length + 1,
        }
    }

    /// Re-adds every pair into a fresh array of `divisor` buckets.
    ///
    /// Pairs are replayed in traversal order, so for a repeated key the pair
    /// added first is re-added first and stays the one `get` returns.
    fn rehashed(&self, divisor: usize) -> Vec<HashTree<K, V, S>> {
        let mut buckets: Vec<HashTree<K, V, S>> = (0..divisor).map(|_| HashTree::empty()).collect();

        for bucket in self.buckets.iter() {
            let mut entries = bucket.iter();
            while let Some((hash, key, value)) = entries.next_hashed() {
                let index = bucket_index(hash, divisor);
                buckets[index] = buckets[index].add_hashed(hash, key.clone(), value.clone());
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            old_divisor = self.divisor(),
            new_divisor = divisor,
            rehashed = self.length,
            "hash table resized"
        );

        buckets
    }
}

#[cfg(feature = "rayon")]
impl<K, V, S> HashTable<K, V, S>
where
    K: Send + Sync,
    V: Send + Sync,
    S: Send + Sync,
{
    /// Returns a parallel iterator over all pairs, splitting work by bucket.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use imhash::persistent::HashTable;
    /// use rayon::prelude::*;
    ///
    /// let table: HashTable<u64, u64> = (0..1000).map(|index| (index, index)).collect();
    /// let sum: u64 = table.par_iter().map(|(_, value)| value).sum();
    /// assert_eq!(sum, 499_500);
    /// ```
    pub fn par_iter(&self) -> impl rayon::iter::ParallelIterator<Item = (&K, &V)> {
        use rayon::prelude::*;
        self.buckets.par_iter().flat_map_iter(HashTree::iter)
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over the pairs of a [`HashTable`].
pub struct HashTableIterator<'a, K, V, S> {
    buckets: std::slice::Iter<'a, HashTree<K, V, S>>,
    current: Option<HashTreeIterator<'a, K, V>>,
    remaining: usize,
}

impl<'a, K, V, S> Iterator for HashTableIterator<'a, K, V, S> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pair) = self.current.as_mut().and_then(Iterator::next) {
                self.remaining = self.remaining.saturating_sub(1);
                return Some(pair);
            }
            self.current = Some(self.buckets.next()?.iter());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, S> ExactSizeIterator for HashTableIterator<'_, K, V, S> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V, S> std::iter::FusedIterator for HashTableIterator<'_, K, V, S> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V, S> Clone for HashTable<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            buckets: ReferenceCounter::clone(&self.buckets),
            length: self.length,
        }
    }
}

impl<K, V, S> Default for HashTable<K, V, S> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashTable<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::empty();
        for (key, value) in iter {
            table = table.add(key, value);
        }
        table
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = HashTableIterator<'a, K, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashTable<K, V, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(HashTable<String, String>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(HashTree<String, String>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(HashTable<String, String>: Send, Sync);
#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(HashTree<String, String>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V, S> serde::Serialize for HashTable<K, V, S>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut sequence = serializer.serialize_seq(Some(self.len()))?;
        for pair in self {
            sequence.serialize_element(&pair)?;
        }
        sequence.end()
    }
}

#[cfg(feature = "serde")]
struct HashTableVisitor<K, V, S> {
    marker: std::marker::PhantomData<HashTable<K, V, S>>,
}

#[cfg(feature = "serde")]
impl<'de, K, V, S> serde::de::Visitor<'de> for HashTableVisitor<K, V, S>
where
    K: serde::Deserialize<'de> + Clone + Hash + Eq,
    V: serde::Deserialize<'de> + Clone,
    S: BuildHasher + Default,
{
    type Value = HashTable<K, V, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of key-value pairs")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut table = HashTable::empty();
        while let Some((key, value)) = access.next_element::<(K, V)>()? {
            table = table.add(key, value);
        }
        Ok(table)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, S> serde::Deserialize<'de> for HashTable<K, V, S>
where
    K: serde::Deserialize<'de> + Clone + Hash + Eq,
    V: serde::Deserialize<'de> + Clone,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(HashTableVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
