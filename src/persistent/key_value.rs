//! Immutable key-value pair stored in collision chains.

/// An immutable `(key, value)` pair.
///
/// Created once when an entry is added and never changed afterwards.
///
/// # Examples
///
/// ```rust
/// use imhash::persistent::KeyValue;
///
/// let pair = KeyValue::new("answer", 42);
/// assert_eq!(pair.key(), &"answer");
/// assert_eq!(pair.value(), &42);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyValue<K, V> {
    key: K,
    value: V,
}

impl<K, V> KeyValue<K, V> {
    /// Creates a new pair.
    #[inline]
    #[must_use]
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Returns the key.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Consumes the pair, returning its parts.
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for KeyValue<K, V> {
    #[inline]
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}
