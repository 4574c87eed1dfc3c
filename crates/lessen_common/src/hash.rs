//! Content hashing for stable, deterministic identifiers.

use std::fmt;

/// A 64-bit content hash computed with XXH3.
///
/// Used where a short stable fingerprint of a path or content is needed,
/// such as the fallback keyframe scope prefix for files whose name yields
/// no usable identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ContentHash(u64);

impl ContentHash {
    /// Computes the hash of a byte slice.
    pub fn of(data: &[u8]) -> Self {
        Self(xxhash_rust::xxh3::xxh3_64(data))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
