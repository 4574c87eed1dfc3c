//! The on-disk cache tier.

use crate::entry::CacheEntry;
use crate::error::CacheError;
use crate::ContentCache;
use lessen_diagnostics::{Diagnostic, DiagnosticSink};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What to do with a cache file that fails to parse.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InvalidCacheBehaviour {
    /// Delete the offending file and report a miss.
    Delete,
    /// Leave the file in place and report a miss.
    Ignore,
}

/// A cache tier storing one file per key under a cache directory.
///
/// Keys map to `<cache_dir>/<key>.cache`. Writes go through a temporary
/// sibling file and a rename, so a reader never observes a half-written
/// file under the target name. Failed writes are reported as warnings and
/// otherwise ignored; a request must never fail because its cache write
/// did.
pub struct DiskCache {
    cache_dir: PathBuf,
    invalid_behaviour: InvalidCacheBehaviour,
    sink: Arc<DiagnosticSink>,
}

impl DiskCache {
    /// Creates a disk cache rooted at `cache_dir`.
    pub fn new(
        cache_dir: impl Into<PathBuf>,
        invalid_behaviour: InvalidCacheBehaviour,
        sink: Arc<DiagnosticSink>,
    ) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            invalid_behaviour,
            sink,
        }
    }

    /// Resolves the cache file path for a key.
    ///
    /// Keys are relative stylesheet paths; anything absolute or escaping
    /// upward resolves to `None` and behaves as an uncacheable key.
    fn entry_path(&self, key: &str) -> Option<PathBuf> {
        let normalised = key.replace('\\', "/");
        let candidate = Path::new(&normalised);
        if candidate.is_absolute()
            || candidate
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return None;
        }
        Some(self.cache_dir.join(format!("{normalised}.cache")))
    }

    fn read_entry(&self, path: &Path) -> Result<CacheEntry, CacheError> {
        let text = std::fs::read_to_string(path).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        CacheEntry::from_disk_format(&text, path)
    }

    fn write_entry(&self, path: &Path, entry: &CacheEntry) -> Result<(), CacheError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CacheError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let tmp = path.with_extension("cache.tmp");
        std::fs::write(&tmp, entry.to_disk_format()).map_err(|e| CacheError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp, path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            CacheError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        })
    }
}

impl ContentCache for DiskCache {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        let path = self.entry_path(key)?;
        if !path.exists() {
            return None;
        }
        match self.read_entry(&path) {
            Ok(entry) => Some(entry),
            Err(e) => {
                if matches!(e, CacheError::InvalidFormat { .. })
                    && self.invalid_behaviour == InvalidCacheBehaviour::Delete
                {
                    let _ = std::fs::remove_file(&path);
                }
                self.sink
                    .emit(Diagnostic::warning(format!("cache read ignored: {e}")).with_origin(key));
                None
            }
        }
    }

    fn put(&self, key: &str, entry: &CacheEntry) {
        let Some(path) = self.entry_path(key) else {
            return;
        };
        if let Err(e) = self.write_entry(&path, entry) {
            self.sink
                .emit(Diagnostic::warning(format!("cache write failed: {e}")).with_origin(key));
        }
    }

    fn remove(&self, key: &str) {
        if let Some(path) = self.entry_path(key) {
            let _ = std::fs::remove_file(path);
        }
    }
}
