//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::hash::{BuildHasherDefault, Hash, Hasher};

/// A hasher that returns the last `u64` written to it, so a test decides
/// exactly which hash code (and therefore which bucket and tree position)
/// a key gets.
#[derive(Default)]
pub struct IdentityHasher(u64);

impl Hasher for IdentityHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 = self.0.rotate_left(8) ^ u64::from(byte);
        }
    }

    fn write_u64(&mut self, value: u64) {
        self.0 = value;
    }
}

/// Hash builder for [`IdentityHasher`].
pub type Identity = BuildHasherDefault<IdentityHasher>;

/// A key whose hash code is chosen explicitly, for forcing collisions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collider {
    pub hash: u64,
    pub name: String,
}

impl Collider {
    pub fn new(hash: u64, name: &str) -> Self {
        Self {
            hash,
            name: name.to_string(),
        }
    }
}

impl Hash for Collider {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}
