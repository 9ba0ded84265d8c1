//! Persistent (immutable) hash tree based on an AVL tree.
//!
//! This module provides [`HashTree`], an add-only map ordered by the hash
//! code of its keys. It is the bucket type of [`HashTable`](super::HashTable)
//! and is usable on its own.
//!
//! # Overview
//!
//! `HashTree` is a height-balanced binary search tree. Nodes are ordered by
//! the 64-bit hash of their key, not by the key itself, so keys only need
//! `Hash + Eq`. Keys whose hashes collide share one node: the first key is
//! the node's primary entry and every later one is appended to the node's
//! collision chain.
//!
//! - O(log N) get
//! - O(log N) add
//! - O(1) len, `is_empty` and height
//! - lazy ascending traversal
//!
//! All operations return new trees without modifying the original. An `add`
//! allocates only the nodes on the path from the root to the insertion point
//! (plus any rotated node); every other subtree is shared.
//!
//! # Examples
//!
//! ```rust
//! use imhash::persistent::HashTree;
//!
//! let tree = HashTree::new()
//!     .add("one", 1)
//!     .add("two", 2);
//!
//! assert_eq!(tree.get("one"), Some(&1));
//! assert_eq!(tree.get("three"), None);
//!
//! // Structural sharing: the original tree is preserved
//! let extended = tree.add("three", 3);
//! assert_eq!(tree.len(), 2);
//! assert_eq!(extended.get("three"), Some(&3));
//! ```
//!
//! # Adding an existing key
//!
//! The tree never overwrites. Adding a key that is already present appends
//! the new pair to the collision chain: `get` keeps returning the value that
//! was added first, while traversal yields every pair.
//!
//! ```rust
//! use imhash::persistent::HashTree;
//!
//! let tree = HashTree::new().add("key", 1).add("key", 2);
//!
//! assert_eq!(tree.get("key"), Some(&1));
//! assert_eq!(tree.len(), 2);
//! assert_eq!(tree.values().copied().collect::<Vec<_>>(), vec![1, 2]);
//! ```
//!
//! # Internal Structure
//!
//! Every node satisfies:
//! 1. `|height(left) - height(right)| <= 1`
//! 2. hashes in `left` are smaller and hashes in `right` are greater than
//!    the node's hash
//! 3. every collision-chain entry has the node's hash

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::iter::FromIterator;
use std::marker::PhantomData;

use smallvec::SmallVec;

use super::hashing::{DefaultHashBuilder, hash_of};
use super::{AppendList, KeyValue, ReferenceCounter};
use crate::error::InvariantViolation;

/// Inline capacity of the traversal stack. An AVL tree of height 32 holds
/// millions of nodes; deeper trees spill to the heap.
const TRAVERSAL_STACK_INLINE: usize = 32;

// =============================================================================
// Node Definition
// =============================================================================

type Link<K, V> = Option<ReferenceCounter<Node<K, V>>>;

/// Internal node structure for the AVL tree.
#[derive(Clone)]
struct Node<K, V> {
    hash: u64,
    key: K,
    value: V,
    /// Entries sharing `hash` that were added after the primary entry.
    duplicates: AppendList<KeyValue<K, V>>,
    height: usize,
    left: Link<K, V>,
    right: Link<K, V>,
}

/// Height of an optional subtree; the empty tree has height 0.
fn height<K, V>(node: Option<&ReferenceCounter<Node<K, V>>>) -> usize {
    node.map_or(0, |node| node.height)
}

/// Key comparison used by lookups: identity first, then equality.
fn keys_match<Q: Eq + ?Sized>(stored: &Q, key: &Q) -> bool {
    std::ptr::eq(stored, key) || stored == key
}

impl<K, V> Node<K, V> {
    /// Creates a node with no children and an empty collision chain.
    const fn leaf(hash: u64, key: K, value: V) -> Self {
        Self {
            hash,
            key,
            value,
            duplicates: AppendList::new(),
            height: 1,
            left: None,
            right: None,
        }
    }

    /// Finds the value stored for `key` in this node or its collision chain.
    fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        if keys_match(self.key.borrow(), key) {
            return Some(&self.value);
        }
        self.duplicates
            .iter()
            .find(|entry| keys_match(entry.key().borrow(), key))
            .map(KeyValue::value)
    }

    /// Number of pairs held by this node.
    fn entry_count(&self) -> usize {
        1 + self.duplicates.len()
    }
}

impl<K: Clone, V: Clone> Node<K, V> {
    /// Creates a copy of this node's entries with new children.
    ///
    /// The height is recomputed; no rebalancing happens.
    fn with_children(&self, left: Link<K, V>, right: Link<K, V>) -> Self {
        Self {
            hash: self.hash,
            key: self.key.clone(),
            value: self.value.clone(),
            duplicates: self.duplicates.clone(),
            height: 1 + height(left.as_ref()).max(height(right.as_ref())),
            left,
            right,
        }
    }

    /// Creates a copy of this node with `entry` appended to its collision chain.
    ///
    /// Shape and height are unchanged.
    fn with_duplicate(&self, entry: KeyValue<K, V>) -> Self {
        Self {
            hash: self.hash,
            key: self.key.clone(),
            value: self.value.clone(),
            duplicates: self.duplicates.append(entry),
            height: self.height,
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }

    /// Creates a copy of this node's entries with new children, rotating
    /// once or twice when the children heights differ by two.
    ///
    /// Children come from a single insertion into a balanced tree, so their
    /// heights never differ by more than two and one rotation (single or
    /// double) always restores the balance.
    fn balanced(&self, left: Link<K, V>, right: Link<K, V>) -> Self {
        match (left, right) {
            (left, Some(right)) if right.height > height(left.as_ref()) + 1 => {
                // Right-left case becomes right-right.
                let right = if height(right.left.as_ref()) > height(right.right.as_ref()) {
                    ReferenceCounter::new(Self::rotate_right(&right))
                } else {
                    right
                };
                let new_left = self.with_children(left, right.left.clone());
                right.with_children(Some(ReferenceCounter::new(new_left)), right.right.clone())
            }
            (Some(left), right) if left.height > height(right.as_ref()) + 1 => {
                // Left-right case becomes left-left.
                let left = if height(left.right.as_ref()) > height(left.left.as_ref()) {
                    ReferenceCounter::new(Self::rotate_left(&left))
                } else {
                    left
                };
                let new_right = self.with_children(left.right.clone(), right);
                left.with_children(left.left.clone(), Some(ReferenceCounter::new(new_right)))
            }
            (left, right) => self.with_children(left, right),
        }
    }

    /// Rotates the subtree to the right around the given node.
    fn rotate_right(node: &Self) -> Self {
        node.left.as_ref().map_or_else(
            || node.clone(),
            |left| {
                let new_right = node.with_children(left.right.clone(), node.right.clone());
                left.with_children(left.left.clone(), Some(ReferenceCounter::new(new_right)))
            },
        )
    }

    /// Rotates the subtree to the left around the given node.
    fn rotate_left(node: &Self) -> Self {
        node.right.as_ref().map_or_else(
            || node.clone(),
            |right| {
                let new_left = node.with_children(node.left.clone(), right.left.clone());
                right.with_children(Some(ReferenceCounter::new(new_left)), right.right.clone())
            },
        )
    }
}

// =============================================================================
// HashTree Definition
// =============================================================================

/// A persistent (immutable) add-only map ordered by key hash code.
///
/// `HashTree` is an AVL tree whose nodes are keyed by `hash(key)`. Keys with
/// equal hash codes share a node through its collision chain.
///
/// The hash function is the type parameter `S`; it must be deterministic
/// (see [`DefaultHashBuilder`]).
///
/// # Time Complexity
///
/// | Operation      | Complexity        |
/// |----------------|-------------------|
/// | `new`          | O(1)              |
/// | `get`          | O(log N + c)      |
/// | `add`          | O(log N + c)      |
/// | `len`          | O(1)              |
/// | `height`       | O(1)              |
/// | `iter`         | O(N), lazy        |
///
/// where `c` is the length of the collision chain at the key's hash.
///
/// # Examples
///
/// ```rust
/// use imhash::persistent::HashTree;
///
/// let tree: HashTree<i32, &str> = HashTree::new().add(1, "one");
/// assert_eq!(tree.get(&1), Some(&"one"));
/// assert_eq!(tree.height(), 1);
/// ```
pub struct HashTree<K, V, S = DefaultHashBuilder> {
    /// Root node; `None` is the empty tree.
    root: Link<K, V>,
    /// Number of pairs, collision-chain entries included.
    length: usize,
    hasher: PhantomData<S>,
}

impl<K, V> HashTree<K, V> {
    /// Creates a new empty tree using [`DefaultHashBuilder`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use imhash::persistent::HashTree;
    ///
    /// let tree: HashTree<String, i32> = HashTree::new();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.height(), 0);
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::empty()
    }
}

impl<K, V, S> HashTree<K, V, S> {
    /// Creates a new empty tree for any hash builder `S`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use imhash::persistent::HashTree;
    /// use std::collections::hash_map::DefaultHasher;
    /// use std::hash::BuildHasherDefault;
    ///
    /// let tree: HashTree<u8, u8, BuildHasherDefault<DefaultHasher>> = HashTree::empty();
    /// assert!(tree.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            root: None,
            length: 0,
            hasher: PhantomData,
        }
    }

    /// Returns the number of pairs in the tree, collision-chain entries included.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree is the empty tree.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the height of the tree: 0 when empty, else the number of
    /// nodes on the longest root-to-leaf path.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        height(self.root.as_ref())
    }

    /// Returns a lazy iterator over the pairs in ascending hash order.
    ///
    /// Pairs sharing a hash code appear together: the node's primary pair
    /// first, then its collision chain in insertion order. The iterator only
    /// borrows the tree, so it can be restarted at will and run from several
    /// threads at once (with the `arc` feature).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use imhash::persistent::HashTree;
    ///
    /// let tree: HashTree<i32, i32> = (0..10).map(|index| (index, index * 10)).collect();
    /// let total: i32 = tree.iter().map(|(_, value)| value).sum();
    /// assert_eq!(total, 450);
    /// ```
    #[must_use]
    pub fn iter(&self) -> HashTreeIterator<'_, K, V> {
        HashTreeIterator::new(self.root.as_deref(), self.length)
    }

    /// Returns an iterator over the keys in traversal order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values in traversal order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }
}

impl<K, V, S> HashTree<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Returns the value stored for `key`.
    ///
    /// The search descends by hash code only. At the node holding that hash
    /// the primary key is compared first, then the collision chain in
    /// insertion order; the first match wins.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use imhash::persistent::HashTree;
    ///
    /// let tree = HashTree::new().add("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(tree.get("hello"), Some(&42));
    /// assert_eq!(tree.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_hashed(hash_of::<S, Q>(key), key)
    }

    /// Lookup with a precomputed hash code.
    pub(crate) fn get_hashed<Q>(&self, hash: u64, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.find_node(hash).and_then(|node| node.find(key))
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

    /// Returns the collision chain of the node holding `hash(key)`.
    ///
    /// `None` means no node has that hash code; an empty chain means the
    /// node holds a single pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use imhash::persistent::HashTree;
    ///
    /// let tree = HashTree::new().add("key", 1).add("key", 2);
    /// let chain = tree.duplicates("key").unwrap();
    ///
    /// assert_eq!(chain.len(), 1);
    /// assert_eq!(chain[0].value(), &2);
    /// ```
    #[must_use]
    pub fn duplicates<Q>(&self, key: &Q) -> Option<&AppendList<KeyValue<K, V>>>
    where
        K: Borrow<Q>,
        Q: Hash + ?Sized,
    {
        self.find_node(hash_of::<S, Q>(key))
            .map(|node| &node.duplicates)
    }

    fn find_node(&self, hash: u64) -> Option<&Node<K, V>> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match hash.cmp(&node.hash) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    /// Verifies the AVL, ordering, hashing and length invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use imhash::persistent::HashTree;
    ///
    /// let tree: HashTree<u32, u32> = (0..1000).map(|index| (index, index)).collect();
    /// assert!(tree.check_invariants().is_ok());
    /// ```
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let (_, counted) = Self::check_node(self.root.as_deref(), None, None)?;
        if counted == self.length {
            Ok(())
        } else {
            Err(InvariantViolation::LengthMismatch {
                recorded: self.length,
                counted,
            })
        }
    }

    /// Checks one subtree against the exclusive hash bounds inherited from
    /// its ancestors. Returns `(height, entry_count)`.
    fn check_node(
        node: Option<&Node<K, V>>,
        lower: Option<u64>,
        upper: Option<u64>,
    ) -> Result<(usize, usize), InvariantViolation> {
        let Some(node) = node else {
            return Ok((0, 0));
        };

        if let Some(bound) = lower.filter(|&bound| node.hash <= bound) {
            return Err(InvariantViolation::OutOfOrder {
                bound,
                hash: node.hash,
            });
        }
        if let Some(bound) = upper.filter(|&bound| node.hash >= bound) {
            return Err(InvariantViolation::OutOfOrder {
                bound,
                hash: node.hash,
            });
        }

        let computed = hash_of::<S, K>(&node.key);
        if computed != node.hash {
            return Err(InvariantViolation::HashMismatch {
                recorded: node.hash,
                computed,
            });
        }
        if let Some(entry_hash) = node
            .duplicates
            .iter()
            .map(|entry| hash_of::<S, K>(entry.key()))
            .find(|&entry_hash| entry_hash != node.hash)
        {
            return Err(InvariantViolation::ForeignDuplicate {
                node_hash: node.hash,
                entry_hash,
            });
        }

        let (left_height, left_count) =
            Self::check_node(node.left.as_deref(), lower, Some(node.hash))?;
        let (right_height, right_count) =
            Self::check_node(node.right.as_deref(), Some(node.hash), upper)?;

        if left_height.abs_diff(right_height) > 1 {
            return Err(InvariantViolation::Unbalanced {
                hash: node.hash,
                left_height,
                right_height,
            });
        }
        let computed_height = 1 + left_height.max(right_height);
        if computed_height != node.height {
            return Err(InvariantViolation::HeightMismatch {
                hash: node.hash,
                recorded: node.height,
                computed: computed_height,
            });
        }

        Ok((
            computed_height,
            left_count + right_count + node.entry_count(),
        ))
    }
}

impl<K, V, S> HashTree<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone,
    S: BuildHasher + Default,
{
    /// Creates a tree containing a single pair.
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::empty().add(key, value)
    }

    /// Adds a key-value pair, returning the new tree.
    ///
    /// A key whose hash is not yet present becomes a new node. Otherwise the
    /// pair is appended to the collision chain of the node with that hash,
    /// even when the key equals the node's primary key; nothing is ever
    /// overwritten.
    ///
    /// # Complexity
    ///
    /// O(log N) time and allocations
    ///
    /// # Examples
    ///
    /// ```rust
    /// use imhash::persistent::HashTree;
    ///
    /// let tree1 = HashTree::new().add(1, "one");
    /// let tree2 = tree1.add(2, "two");
    ///
    /// assert_eq!(tree1.len(), 1); // Original unchanged
    /// assert_eq!(tree2.len(), 2); // New version
    /// ```
    #[must_use]
    pub fn add(&self, key: K, value: V) -> Self {
        let hash = hash_of::<S, K>(&key);
        self.add_hashed(hash, key, value)
    }

    /// Adds a pair whose hash code is already known.
    pub(crate) fn add_hashed(&self, hash: u64, key: K, value: V) -> Self {
        Self {
            root: Some(Self::insert_into_node(self.root.as_ref(), hash, key, value)),
            length: self.length + 1,
            hasher: PhantomData,
        }
    }

    /// Recursive helper for add; rebuilds the path to the insertion point.
    fn insert_into_node(
        node: Option<&ReferenceCounter<Node<K, V>>>,
        hash: u64,
        key: K,
        value: V,
    ) -> ReferenceCounter<Node<K, V>> {
        let Some(node_ref) = node else {
            return ReferenceCounter::new(Node::leaf(hash, key, value));
        };

        let new_node = match hash.cmp(&node_ref.hash) {
            Ordering::Less => {
                let new_left = Self::insert_into_node(node_ref.left.as_ref(), hash, key, value);
                node_ref.balanced(Some(new_left), node_ref.right.clone())
            }
            Ordering::Greater => {
                let new_right = Self::insert_into_node(node_ref.right.as_ref(), hash, key, value);
                node_ref.balanced(node_ref.left.clone(), Some(new_right))
            }
            Ordering::Equal => {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    hash,
                    chain_length = node_ref.duplicates.len() + 1,
                    "collision chain extended"
                );
                node_ref.with_duplicate(KeyValue::new(key, value))
            }
        };
        ReferenceCounter::new(new_node)
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// A lazy iterator over the pairs of a [`HashTree`] in ascending hash order.
pub struct HashTreeIterator<'a, K, V> {
    /// Ancestors whose own pairs and right subtrees are still pending.
    stack: SmallVec<[&'a Node<K, V>; TRAVERSAL_STACK_INLINE]>,
    /// Node whose collision chain is being emitted, with the next chain index.
    current: Option<(&'a Node<K, V>, usize)>,
    remaining: usize,
}

impl<'a, K, V> HashTreeIterator<'a, K, V> {
    fn new(root: Option<&'a Node<K, V>>, length: usize) -> Self {
        let mut iterator = Self {
            stack: SmallVec::new(),
            current: None,
            remaining: length,
        };
        iterator.push_left_spine(root);
        iterator
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(node_ref) = node {
            self.stack.push(node_ref);
            node = node_ref.left.as_deref();
        }
    }

    /// Advances the traversal, also yielding the hash code of the pair.
    pub(crate) fn next_hashed(&mut self) -> Option<(u64, &'a K, &'a V)> {
        if let Some((node, index)) = self.current {
            if let Some(entry) = node.duplicates.get(index) {
                self.current = Some((node, index + 1));
                self.remaining = self.remaining.saturating_sub(1);
                return Some((node.hash, entry.key(), entry.value()));
            }
            self.current = None;
            self.push_left_spine(node.right.as_deref());
        }

        let node = self.stack.pop()?;
        self.current = Some((node, 0));
        self.remaining = self.remaining.saturating_sub(1);
        Some((node.hash, &node.key, &node.value))
    }
}

impl<'a, K, V> Iterator for HashTreeIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.next_hashed().map(|(_, key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for HashTreeIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> std::iter::FusedIterator for HashTreeIterator<'_, K, V> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V, S> Clone for HashTree<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            length: self.length,
            hasher: PhantomData,
        }
    }
}

impl<K, V, S> Default for HashTree<K, V, S> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashTree<K, V, S>
where
    K: Clone + Hash + Eq,
    V: Clone,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |tree, (key, value)| tree.add(key, value))
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashTree<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = HashTreeIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashTree<K, V, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V, S> serde::Serialize for HashTree<K, V, S>
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
struct HashTreeVisitor<K, V, S> {
    marker: PhantomData<HashTree<K, V, S>>,
}

#[cfg(feature = "serde")]
impl<'de, K, V, S> serde::de::Visitor<'de> for HashTreeVisitor<K, V, S>
where
    K: serde::Deserialize<'de> + Clone + Hash + Eq,
    V: serde::Deserialize<'de> + Clone,
    S: BuildHasher + Default,
{
    type Value = HashTree<K, V, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of key-value pairs")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        // Sequential adds keep the first-added pair of a key as the primary.
        let mut tree = HashTree::empty();
        while let Some((key, value)) = access.next_element::<(K, V)>()? {
            tree = tree.add(key, value);
        }
        Ok(tree)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, S> serde::Deserialize<'de> for HashTree<K, V, S>
where
    K: serde::Deserialize<'de> + Clone + Hash + Eq,
    V: serde::Deserialize<'de> + Clone,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(HashTreeVisitor {
            marker: PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
