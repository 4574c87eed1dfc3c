//! The last-modified retriever that drives cache invalidation.

use crate::loader::LoadError;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Reports the most recent modification time of files in a folder.
///
/// Import flattening is restricted to the importing file's own folder, so
/// the newest modification date in that folder is a sound (and cheap)
/// freshness timestamp for everything a pipeline run can possibly read.
/// The logical path itself need not exist, which supports virtual
/// aggregate paths that are generated rather than read.
pub struct LastModifiedRetriever {
    root: PathBuf,
    extensions: Vec<String>,
}

impl LastModifiedRetriever {
    /// Creates a retriever over `root`, considering every file.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: Vec::new(),
        }
    }

    /// Restricts the retriever to files with the given extensions
    /// (compared case-insensitively, without the leading dot). An empty
    /// list means all files are considered.
    pub fn with_extensions(mut self, extensions: impl IntoIterator<Item = String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Returns the most recent modification time among matching files in
    /// the folder containing `relative_path`.
    ///
    /// Falls back to the folder's own modification time when no file
    /// matches the extension filter. Fails with [`LoadError::Io`] when the
    /// folder cannot be read.
    pub fn max_modified(&self, relative_path: &str) -> Result<SystemTime, LoadError> {
        if relative_path.trim().is_empty() {
            return Err(LoadError::BadInput);
        }
        let logical = self.root.join(relative_path);
        let folder = logical.parent().unwrap_or(&self.root).to_path_buf();

        let entries = std::fs::read_dir(&folder).map_err(|e| LoadError::Io {
            path: folder.clone(),
            source: e,
        })?;

        let mut newest: Option<SystemTime> = None;
        for entry in entries {
            let entry = entry.map_err(|e| LoadError::Io {
                path: folder.clone(),
                source: e,
            })?;
            let path = entry.path();
            if !path.is_file() || !self.matches(&path) {
                continue;
            }
            if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
                newest = Some(newest.map_or(modified, |n: SystemTime| n.max(modified)));
            }
        }

        match newest {
            Some(t) => Ok(t),
            None => std::fs::metadata(&folder)
                .and_then(|m| m.modified())
                .map_err(|e| LoadError::Io {
                    path: folder,
                    source: e,
                }),
        }
    }

    fn matches(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let e = e.to_ascii_lowercase();
                self.extensions.iter().any(|want| *want == e)
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reports_newest_file_in_folder() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.css"), "a{}").unwrap();
        fs::write(dir.path().join("b.css"), "b{}").unwrap();

        let retriever = LastModifiedRetriever::new(dir.path());
        let newest = retriever.max_modified("a.css").unwrap();

        let a = fs::metadata(dir.path().join("a.css"))
            .unwrap()
            .modified()
            .unwrap();
        let b = fs::metadata(dir.path().join("b.css"))
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(newest, a.max(b));
    }

    #[test]
    fn logical_path_need_not_exist() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("real.css"), "r{}").unwrap();

        let retriever = LastModifiedRetriever::new(dir.path());
        assert!(retriever.max_modified("virtual-aggregate.css").is_ok());
    }

    #[test]
    fn extension_filter_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("keep.CSS"), "k{}").unwrap();
        fs::write(dir.path().join("skip.txt"), "ignored").unwrap();

        let retriever =
            LastModifiedRetriever::new(dir.path()).with_extensions(["css".to_string()]);
        let newest = retriever.max_modified("keep.CSS").unwrap();
        let keep = fs::metadata(dir.path().join("keep.CSS"))
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(newest, keep);
    }

    #[test]
    fn no_matching_files_falls_back_to_folder_date() {
        let dir = tempfile::tempdir().unwrap();
        let retriever =
            LastModifiedRetriever::new(dir.path()).with_extensions(["css".to_string()]);
        assert!(retriever.max_modified("any.css").is_ok());
    }

    #[test]
    fn unreadable_folder_is_an_error() {
        let retriever = LastModifiedRetriever::new("/nonexistent-root-folder");
        assert!(matches!(
            retriever.max_modified("sub/x.css"),
            Err(LoadError::Io { .. })
        ));
    }
}
