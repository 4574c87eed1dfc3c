//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur during cache operations.
///
/// Cache reads are fail-safe at the call sites: these errors are handled
/// inside the cache subsystem (miss, warning, or file deletion per the
/// invalid-content policy) and never fail a request.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing a cache file.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A cache file deviates from the expected on-disk format.
    #[error("invalid cache file format at {path}: {reason}")]
    InvalidFormat {
        /// The cache file path.
        path: PathBuf,
        /// Description of the deviation.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = CacheError::Io {
            path: PathBuf::from("styles/site.css.cache"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("cache I/O error"));
        assert!(msg.contains("site.css.cache"));
    }

    #[test]
    fn invalid_format_display() {
        let err = CacheError::InvalidFormat {
            path: PathBuf::from("bad.cache"),
            reason: "header does not open with /*".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("invalid cache file format"));
        assert!(msg.contains("header does not open"));
    }
}
