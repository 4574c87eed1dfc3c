//! Ordered composition of cache tiers.

use crate::entry::CacheEntry;
use crate::ContentCache;

/// Tries tiers in order on `get`, up-filling earlier tiers on a hit.
///
/// `put` and `remove` broadcast to every tier. The canonical composition
/// is memory first, disk second, each behind a
/// [`FreshnessGate`](crate::FreshnessGate).
pub struct LayeredCache {
    layers: Vec<Box<dyn ContentCache>>,
}

impl LayeredCache {
    /// Creates a layered cache over the given tiers, fastest first.
    pub fn new(layers: Vec<Box<dyn ContentCache>>) -> Self {
        Self { layers }
    }
}

impl ContentCache for LayeredCache {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        for (i, layer) in self.layers.iter().enumerate() {
            if let Some(entry) = layer.get(key) {
                for earlier in &self.layers[..i] {
                    earlier.put(key, &entry);
                }
                return Some(entry);
            }
        }
        None
    }

    fn put(&self, key: &str, entry: &CacheEntry) {
        for layer in &self.layers {
            layer.put(key, entry);
        }
    }

    fn remove(&self, key: &str) {
        for layer in &self.layers {
            layer.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCache;
    use std::sync::Arc;
    use std::time::{Duration, SystemTime};

    fn entry(content: &str) -> CacheEntry {
        CacheEntry {
            relative_path: "a.css".to_string(),
            last_modified: SystemTime::UNIX_EPOCH + Duration::from_secs(50),
            content: content.to_string(),
            build_elapsed: Duration::ZERO,
        }
    }

    fn two_tiers() -> (Arc<MemoryCache>, Arc<MemoryCache>, LayeredCache) {
        let first = Arc::new(MemoryCache::new());
        let second = Arc::new(MemoryCache::new());
        let layered = LayeredCache::new(vec![
            Box::new(Arc::clone(&first)),
            Box::new(Arc::clone(&second)),
        ]);
        (first, second, layered)
    }

    #[test]
    fn first_tier_hit_does_not_touch_second() {
        let (first, second, layered) = two_tiers();
        first.put("a.css", &entry("fast"));
        assert_eq!(layered.get("a.css").unwrap().content, "fast");
        assert!(second.get("a.css").is_none());
    }

    #[test]
    fn second_tier_hit_up_fills_first() {
        let (first, second, layered) = two_tiers();
        second.put("a.css", &entry("slow"));
        assert_eq!(layered.get("a.css").unwrap().content, "slow");
        assert_eq!(first.get("a.css").unwrap().content, "slow");
    }

    #[test]
    fn put_broadcasts_to_all_tiers() {
        let (first, second, layered) = two_tiers();
        layered.put("a.css", &entry("x"));
        assert!(first.get("a.css").is_some());
        assert!(second.get("a.css").is_some());
    }

    #[test]
    fn remove_broadcasts_to_all_tiers() {
        let (first, second, layered) = two_tiers();
        layered.put("a.css", &entry("x"));
        layered.remove("a.css");
        assert!(first.get("a.css").is_none());
        assert!(second.get("a.css").is_none());
    }

    #[test]
    fn miss_when_all_tiers_miss() {
        let (_, _, layered) = two_tiers();
        assert!(layered.get("a.css").is_none());
    }
}
