//! Hash code computation shared by [`HashTree`](super::HashTree) and
//! [`HashTable`](super::HashTable).
//!
//! Both structures take a `S: BuildHasher + Default` parameter and build a
//! fresh hasher for every key. The builder must be deterministic: two
//! snapshots of the same type have to agree on every hash code, otherwise a
//! lookup on one snapshot would descend a different path than the `add` that
//! built it. Randomly seeded builders such as
//! [`std::collections::hash_map::RandomState`] are therefore unsuitable.

use std::hash::{BuildHasher, BuildHasherDefault, Hash};

/// The hash builder used when none is specified.
///
/// - `fxhash` feature: `rustc_hash::FxHasher`
/// - `ahash` feature (without `fxhash`): `ahash::AHasher` with its fixed keys
/// - otherwise: `std::collections::hash_map::DefaultHasher`
#[cfg(feature = "fxhash")]
pub type DefaultHashBuilder = BuildHasherDefault<rustc_hash::FxHasher>;

/// The hash builder used when none is specified.
///
/// - `fxhash` feature: `rustc_hash::FxHasher`
/// - `ahash` feature (without `fxhash`): `ahash::AHasher` with its fixed keys
/// - otherwise: `std::collections::hash_map::DefaultHasher`
#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
pub type DefaultHashBuilder = BuildHasherDefault<ahash::AHasher>;

/// The hash builder used when none is specified.
///
/// - `fxhash` feature: `rustc_hash::FxHasher`
/// - `ahash` feature (without `fxhash`): `ahash::AHasher` with its fixed keys
/// - otherwise: `std::collections::hash_map::DefaultHasher`
#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
pub type DefaultHashBuilder = BuildHasherDefault<std::collections::hash_map::DefaultHasher>;

/// Computes the hash code of a key with a fresh hasher from `S`.
#[inline]
pub(crate) fn hash_of<S, Q>(key: &Q) -> u64
where
    S: BuildHasher + Default,
    Q: Hash + ?Sized,
{
    S::default().hash_one(key)
}

/// Selects the bucket for a hash code. `divisor` must be a power of two.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn bucket_index(hash: u64, divisor: usize) -> usize {
    (hash as usize) & (divisor - 1)
}
