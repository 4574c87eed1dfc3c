//! The immutable value that flows between pipeline stages.

use crate::loader::LoadError;
use std::time::SystemTime;

/// The contents of a stylesheet at a point in the pipeline.
///
/// Created by the leaf reader and re-created by every stage with
/// transformed `content` and possibly a later `last_modified` (a stage
/// that inlines other files takes the maximum across all of them).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileContents {
    /// The relative path this content was requested as.
    pub relative_path: String,
    /// The most recent modification time of any file that contributed.
    pub last_modified: SystemTime,
    /// The (possibly transformed) stylesheet text.
    pub content: String,
}

impl FileContents {
    /// Creates a new `FileContents`, rejecting an empty relative path.
    pub fn new(
        relative_path: impl Into<String>,
        last_modified: SystemTime,
        content: impl Into<String>,
    ) -> Result<Self, LoadError> {
        let relative_path = relative_path.into();
        if relative_path.trim().is_empty() {
            return Err(LoadError::BadInput);
        }
        Ok(Self {
            relative_path,
            last_modified,
            content: content.into(),
        })
    }

    /// Returns a copy of this value with different content.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            relative_path: self.relative_path.clone(),
            last_modified: self.last_modified,
            content: content.into(),
        }
    }

    /// Returns a copy with different content and a possibly later date.
    ///
    /// The resulting `last_modified` is the maximum of the current value
    /// and `other_date`, preserving the freshness-dominance invariant.
    pub fn with_content_and_date(
        &self,
        content: impl Into<String>,
        other_date: SystemTime,
    ) -> Self {
        Self {
            relative_path: self.relative_path.clone(),
            last_modified: self.last_modified.max(other_date),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_is_rejected() {
        assert!(matches!(
            FileContents::new("", SystemTime::now(), "a{}"),
            Err(LoadError::BadInput)
        ));
        assert!(matches!(
            FileContents::new("   ", SystemTime::now(), "a{}"),
            Err(LoadError::BadInput)
        ));
    }

    #[test]
    fn with_content_keeps_path_and_date() {
        let t = SystemTime::now();
        let original = FileContents::new("a.css", t, "a{}").unwrap();
        let next = original.with_content("b{}");
        assert_eq!(next.relative_path, "a.css");
        assert_eq!(next.last_modified, t);
        assert_eq!(next.content, "b{}");
    }

    #[test]
    fn with_content_and_date_takes_maximum() {
        let earlier = SystemTime::UNIX_EPOCH;
        let later = SystemTime::now();
        let original = FileContents::new("a.css", later, "a{}").unwrap();
        // An older contributor never lowers the date.
        assert_eq!(
            original.with_content_and_date("x", earlier).last_modified,
            later
        );

        let original = FileContents::new("a.css", earlier, "a{}").unwrap();
        assert_eq!(
            original.with_content_and_date("x", later).last_modified,
            later
        );
    }
}
