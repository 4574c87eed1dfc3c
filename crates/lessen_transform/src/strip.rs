//! Comment removal that preserves line counts.

use lessen_scan::{Scanner, SegmentKind};
use lessen_source::{ContentLoader, FileContents, LoadError};

/// Replaces every comment with just the line breaks it contained.
///
/// Keeping the `\r`/`\n` characters means the total line count of the
/// content is unchanged, which the marker inserter depends on for stable
/// line numbers. Unterminated `/* ...` at end of input is treated as a
/// comment to end-of-file. Idempotent after the first application.
pub fn strip_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for seg in Scanner::new(content) {
        match seg.kind {
            SegmentKind::Comment => {
                out.extend(seg.value.chars().filter(|c| matches!(c, '\r' | '\n')));
            }
            SegmentKind::Terminator => {}
            _ => out.push_str(seg.value),
        }
    }
    out
}

/// Pipeline stage applying [`strip_comments`] to an inner loader's output.
pub struct CommentStrippingLoader {
    inner: Box<dyn ContentLoader>,
}

impl CommentStrippingLoader {
    /// Wraps the given loader.
    pub fn new(inner: Box<dyn ContentLoader>) -> Self {
        Self { inner }
    }
}

impl ContentLoader for CommentStrippingLoader {
    fn load(&self, relative_path: &str) -> Result<FileContents, LoadError> {
        let file = self.inner.load(relative_path)?;
        let stripped = strip_comments(&file.content);
        Ok(file.with_content(stripped))
    }
}
