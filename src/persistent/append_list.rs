//! Persistent (immutable) append-only list.
//!
//! This module provides [`AppendList`], the container that holds the
//! collision chain of a [`HashTree`](super::HashTree) node.
//!
//! # Overview
//!
//! - O(1) empty construction (no allocation)
//! - O(n) `append`, copying element handles into a fresh shared slice
//! - O(1) indexed access
//! - O(1) `len` and `is_empty`
//!
//! Collision chains are expected to hold a handful of entries at most, so a
//! contiguous copy-on-append slice beats a linked structure: reads are the
//! hot path and stay a single indexed load.
//!
//! # Examples
//!
//! ```rust
//! use imhash::persistent::AppendList;
//!
//! let list = AppendList::new().append(1).append(2);
//! let extended = list.append(3);
//!
//! assert_eq!(list.len(), 2);     // Original unchanged
//! assert_eq!(extended.len(), 3); // New list
//! assert_eq!(extended.get(2), Some(&3));
//! ```

use std::fmt;
use std::iter::FromIterator;
use std::ops::Index;

use super::ReferenceCounter;

/// A persistent (immutable) append-only list.
///
/// Every [`append`](Self::append) returns a new list; the receiver keeps its
/// elements. The empty list owns no allocation.
///
/// # Time Complexity
///
/// | Operation  | Complexity |
/// |------------|------------|
/// | `new`      | O(1)       |
/// | `append`   | O(n)       |
/// | `get`      | O(1)       |
/// | `len`      | O(1)       |
#[derive(Clone)]
pub struct AppendList<T> {
    elements: Option<ReferenceCounter<[T]>>,
}

impl<T> AppendList<T> {
    /// Creates a new empty list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use imhash::persistent::AppendList;
    ///
    /// let list: AppendList<i32> = AppendList::new();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { elements: None }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns `true` if the list has no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.elements.is_none()
    }

    /// Returns a reference to the element at `index`, or `None` if out of bounds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use imhash::persistent::AppendList;
    ///
    /// let list = AppendList::new().append("a").append("b");
    /// assert_eq!(list.get(1), Some(&"b"));
    /// assert_eq!(list.get(2), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Returns the most recently appended element.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Returns the elements as a slice, in insertion order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.elements.as_deref().unwrap_or(&[])
    }

    /// Returns an iterator over the elements in insertion order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<T: Clone> AppendList<T> {
    /// Creates a list containing a single element.
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().append(element)
    }

    /// Returns a new list with `element` added at the end.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use imhash::persistent::AppendList;
    ///
    /// let first = AppendList::singleton(1);
    /// let second = first.append(2);
    ///
    /// assert_eq!(first.as_slice(), &[1]);
    /// assert_eq!(second.as_slice(), &[1, 2]);
    /// ```
    #[must_use]
    pub fn append(&self, element: T) -> Self {
        let elements: ReferenceCounter<[T]> = self
            .iter()
            .cloned()
            .chain(std::iter::once(element))
            .collect();
        Self {
            elements: Some(elements),
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for AppendList<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for AppendList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T> FromIterator<T> for AppendList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let elements: Vec<T> = iter.into_iter().collect();
        if elements.is_empty() {
            Self::new()
        } else {
            Self {
                elements: Some(ReferenceCounter::from(elements)),
            }
        }
    }
}

impl<'a, T> IntoIterator for &'a AppendList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for AppendList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for AppendList<T> {}

impl<T: fmt::Debug> fmt::Debug for AppendList<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for AppendList<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for AppendList<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Vec::<T>::deserialize(deserializer).map(Self::from_iter)
    }
}

// =============================================================================
// Tests
// =============================================================================
