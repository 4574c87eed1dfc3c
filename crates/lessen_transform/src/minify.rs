//! Whitespace and punctuation minification.

use lessen_source::{ContentLoader, FileContents, LoadError};
use regex::Regex;
use std::sync::OnceLock;

fn comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"))
}

fn tag_before_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z]+#").expect("valid regex"))
}

fn line_return_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\r\n]+\s*").expect("valid regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn punctuation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*([:,;{}])\s*").expect("valid regex"))
}

fn zero_unit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"0 (px|pt|%|em)").expect("valid regex"))
}

/// Minifies CSS content with a fixed sequence of rewrites.
///
/// Strips comments (a `/**/` sentinel is appended first so an
/// unterminated trailing comment is removed too), drops redundant tag
/// names before id selectors, removes line breaks, collapses whitespace,
/// tightens punctuation, and normalises `0 px`-style values. The output
/// is regular enough that media headers with equal criteria end up
/// byte-equal, which the media-query grouper requires.
pub fn minify(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let with_sentinel = format!("{trimmed}/**/");
    let s = comment_re().replace_all(&with_sentinel, "");
    let s = tag_before_id_re().replace_all(&s, "#");
    let s = line_return_re().replace_all(&s, "");
    let s = whitespace_re().replace_all(&s, " ");
    let s = punctuation_re().replace_all(&s, "$1");
    let s = s.replace(";}", "}");
    zero_unit_re().replace_all(&s, "0$1").trim().to_string()
}

/// Pipeline stage applying [`minify`] to an inner loader's output.
pub struct MinifyingLoader {
    inner: Box<dyn ContentLoader>,
}

impl MinifyingLoader {
    /// Wraps the given loader.
    pub fn new(inner: Box<dyn ContentLoader>) -> Self {
        Self { inner }
    }
}

impl ContentLoader for MinifyingLoader {
    fn load(&self, relative_path: &str) -> Result<FileContents, LoadError> {
        let file = self.inner.load(relative_path)?;
        let minified = minify(&file.content);
        Ok(file.with_content(minified))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_and_unterminated_trailer_are_removed() {
        assert_eq!(minify("/* Test 1 */\r\np { color: blue; }\r\n/*"), "p{color:blue}");
    }

    #[test]
    fn empty_and_whitespace_only_input_minifies_to_empty() {
        assert_eq!(minify(""), "");
        assert_eq!(minify("   \r\n\t  "), "");
    }

    #[test]
    fn whitespace_collapses_and_punctuation_tightens() {
        assert_eq!(
            minify("div.Header ,  p {\r\n  color :  blue ;\r\n}"),
            "div.Header,p{color:blue}"
        );
    }

    #[test]
    fn tag_name_before_id_is_dropped() {
        assert_eq!(minify("div#header { x: 1; }"), "#header{x:1}");
    }

    #[test]
    fn trailing_semicolon_before_brace_is_dropped() {
        assert_eq!(minify("a{x:1;}"), "a{x:1}");
    }

    #[test]
    fn zero_with_detached_unit_is_joined() {
        assert_eq!(minify("a { margin: 0 px; top: 0 %; }"), "a{margin:0px;top:0%}");
    }

    #[test]
    fn media_headers_with_equal_criteria_become_byte_equal() {
        let a = minify("@media   screen {\n a { x: 1; } }");
        let b = minify("@media screen{a{x:1}}");
        assert!(a.starts_with("@media screen{"));
        assert!(b.starts_with("@media screen{"));
    }

    #[test]
    fn idempotent_on_minified_content() {
        let once = minify("/*c*/ a , b { margin : 0 px ; }");
        assert_eq!(minify(&once), once);
    }
}
