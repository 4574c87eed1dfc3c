//! Detection and renaming of a scope-restricting outer wrapper selector.

use lessen_scan::{Scanner, SegmentKind};
use lessen_source::{ContentLoader, FileContents, LoadError};

/// Replaces an outer wrapper tag (typically `html`) with a sentinel token.
///
/// A file counts as wrapped when its first significant segment is a
/// selector equal to `tag`, followed by `{`, followed by another selector
/// whose next significant segment is not a property colon (proving the
/// brace opened a nested rule set rather than a declaration list). When
/// any condition fails the content is returned unchanged.
///
/// The sentinel must itself be a valid selector token; it survives LESS
/// compilation and is stripped from the final selectors by the compile
/// adapter's path filter.
pub fn rename_wrapper(content: &str, tag: &str, sentinel: &str) -> String {
    let mut segments = Scanner::new(content).filter(|s| !s.is_insignificant());

    let first = match segments.next() {
        Some(s) if s.kind == SegmentKind::SelectorOrStyleProperty && s.value == tag => s,
        _ => return content.to_string(),
    };
    match segments.next() {
        Some(s) if s.kind == SegmentKind::OpenBrace => {}
        _ => return content.to_string(),
    }
    match segments.next() {
        Some(s) if s.kind == SegmentKind::SelectorOrStyleProperty => {}
        _ => return content.to_string(),
    }
    match segments.next() {
        Some(s) if s.kind != SegmentKind::StylePropertyColon => {}
        _ => return content.to_string(),
    }

    let mut out = String::with_capacity(content.len() + sentinel.len());
    out.push_str(&content[..first.index]);
    out.push_str(sentinel);
    out.push_str(&content[first.index + tag.len()..]);
    out
}

/// Pipeline stage applying [`rename_wrapper`] to an inner loader's output.
pub struct WrapperRenamingLoader {
    inner: Box<dyn ContentLoader>,
    tag: String,
    sentinel: String,
}

impl WrapperRenamingLoader {
    /// Wraps the given loader, renaming `tag` to `sentinel`.
    pub fn new(inner: Box<dyn ContentLoader>, tag: impl Into<String>, sentinel: impl Into<String>) -> Self {
        Self {
            inner,
            tag: tag.into(),
            sentinel: sentinel.into(),
        }
    }
}

impl ContentLoader for WrapperRenamingLoader {
    fn load(&self, relative_path: &str) -> Result<FileContents, LoadError> {
        let file = self.inner.load(relative_path)?;
        let renamed = rename_wrapper(&file.content, &self.tag, &self.sentinel);
        Ok(file.with_content(renamed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_file_is_renamed() {
        let input = "html\n{\n  div.Header\n  {\n    color: black;\n  }\n}\n";
        let got = rename_wrapper(input, "html", "scope-carrier");
        assert_eq!(
            got,
            "scope-carrier\n{\n  div.Header\n  {\n    color: black;\n  }\n}\n"
        );
    }

    #[test]
    fn leading_comment_and_whitespace_are_skipped() {
        let input = "/* banner */\n html { div { color: red; } }";
        let got = rename_wrapper(input, "html", "W");
        assert_eq!(got, "/* banner */\n W { div { color: red; } }");
    }

    #[test]
    fn plain_declaration_block_is_not_a_wrapper() {
        // `html { color: red; }` is a style block, not a scoping wrapper.
        let input = "html { color: red; }";
        assert_eq!(rename_wrapper(input, "html", "W"), input);
    }

    #[test]
    fn different_first_selector_is_unchanged() {
        let input = "body { div { color: red; } }";
        assert_eq!(rename_wrapper(input, "html", "W"), input);
    }

    #[test]
    fn selector_list_is_not_a_single_wrapper() {
        let input = "html,body { div { color: red; } }";
        assert_eq!(rename_wrapper(input, "html", "W"), input);
    }

    #[test]
    fn only_the_wrapper_occurrence_is_replaced() {
        let input = "html { html { color: red; } }";
        let got = rename_wrapper(input, "html", "W");
        assert_eq!(got, "W { html { color: red; } }");
    }

    #[test]
    fn empty_content_is_unchanged() {
        assert_eq!(rename_wrapper("", "html", "W"), "");
    }
}
