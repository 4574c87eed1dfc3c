//! Staleness gating for cache tiers.

use crate::entry::CacheEntry;
use crate::ContentCache;
use lessen_common::timestamps_match;
use std::time::SystemTime;

/// Wraps a cache tier with a freshness check captured at request start.
///
/// A hit whose `last_modified` is older than the source freshness
/// timestamp (by a full second or more, matching HTTP-date granularity)
/// is evicted from the wrapped tier and reported as a miss, so the caller
/// falls through to the next tier or regenerates.
pub struct FreshnessGate<C> {
    layer: C,
    freshness: SystemTime,
}

impl<C: ContentCache> FreshnessGate<C> {
    /// Wraps `layer`, comparing entries against `freshness`.
    pub fn new(layer: C, freshness: SystemTime) -> Self {
        Self { layer, freshness }
    }

    fn is_stale(&self, entry: &CacheEntry) -> bool {
        self.freshness > entry.last_modified
            && !timestamps_match(self.freshness, entry.last_modified)
    }
}

impl<C: ContentCache> ContentCache for FreshnessGate<C> {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        let entry = self.layer.get(key)?;
        if self.is_stale(&entry) {
            self.layer.remove(key);
            return None;
        }
        Some(entry)
    }

    fn put(&self, key: &str, entry: &CacheEntry) {
        self.layer.put(key, entry);
    }

    fn remove(&self, key: &str) {
        self.layer.remove(key);
    }
}
