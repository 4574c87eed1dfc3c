//! The in-process cache tier.

use crate::entry::CacheEntry;
use crate::ContentCache;
use std::collections::HashMap;
use std::sync::Mutex;

/// A process-wide in-memory cache tier.
///
/// A mutex-guarded map with last-writer-wins semantics; entries live
/// until evicted by the freshness gate or replaced by a regeneration.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    /// Creates an empty memory cache.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Returns `true` when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentCache for MemoryCache {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn put(&self, key: &str, entry: &CacheEntry) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), entry.clone());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}
