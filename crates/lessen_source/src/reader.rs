//! The leaf loader that reads stylesheets from disk.

use crate::contents::FileContents;
use crate::loader::{ContentLoader, LoadError};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Reads stylesheet text from a configured root directory.
///
/// The innermost stage of every pipeline. Relative paths are resolved
/// against the root; absolute paths and `..` components are rejected so a
/// request can never escape the served directory.
pub struct DiskFileReader {
    root: PathBuf,
}

impl DiskFileReader {
    /// Creates a reader serving files beneath `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, relative_path: &str) -> Result<PathBuf, LoadError> {
        let candidate = Path::new(relative_path);
        if candidate.is_absolute()
            || candidate
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(LoadError::BadInput);
        }
        Ok(self.root.join(candidate))
    }
}

impl ContentLoader for DiskFileReader {
    fn load(&self, relative_path: &str) -> Result<FileContents, LoadError> {
        if relative_path.trim().is_empty() {
            return Err(LoadError::BadInput);
        }
        let path = self.resolve(relative_path)?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LoadError::NotFound {
                    path: relative_path.to_string(),
                })
            }
            Err(e) => return Err(LoadError::Io { path, source: e }),
        };
        if content.is_empty() {
            return Err(LoadError::BadInput);
        }
        let last_modified = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        FileContents::new(relative_path, last_modified, content)
    }
}
