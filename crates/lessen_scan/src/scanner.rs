//! The scanning state machine.

use crate::segment::{Segment, SegmentKind};

/// Which comment syntax the scanner recognises.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flavor {
    /// Plain CSS: only `/* ... */` comments.
    Css,
    /// LESS: additionally `// ...` line comments.
    Less,
}

/// A lazy scanner over stylesheet text.
///
/// Produced segments cover the input exactly and in order. The scanner is
/// a single-pass byte cursor with bounded lookahead: a `:` is resolved as
/// a pseudo-class (merged into its selector token) when the next
/// significant structural character ahead is `{`, and as a
/// [`SegmentKind::StylePropertyColon`] otherwise.
pub struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    flavor: Flavor,
    /// Set after a property colon; cleared on `{`, `}`, and `;`.
    in_value: bool,
    done: bool,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner in LESS flavor, which every pipeline stage uses.
    pub fn new(src: &'a str) -> Self {
        Self::with_flavor(src, Flavor::Less)
    }

    /// Creates a scanner with an explicit comment flavor.
    pub fn with_flavor(src: &'a str, flavor: Flavor) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            flavor,
            in_value: false,
            done: false,
        }
    }

    fn peek_at(&self, offset: usize) -> u8 {
        let idx = self.pos + offset;
        if idx < self.bytes.len() {
            self.bytes[idx]
        } else {
            0
        }
    }

    fn segment(&self, start: usize, kind: SegmentKind) -> Segment<'a> {
        Segment {
            value: &self.src[start..self.pos],
            kind,
            index: start,
        }
    }

    fn at_block_comment(&self, pos: usize) -> bool {
        self.bytes.get(pos) == Some(&b'/') && self.bytes.get(pos + 1) == Some(&b'*')
    }

    fn at_line_comment(&self, pos: usize) -> bool {
        self.flavor == Flavor::Less
            && self.bytes.get(pos) == Some(&b'/')
            && self.bytes.get(pos + 1) == Some(&b'/')
    }

    fn scan_whitespace(&mut self) -> Segment<'a> {
        let start = self.pos;
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        self.segment(start, SegmentKind::Whitespace)
    }

    fn scan_block_comment(&mut self) -> Segment<'a> {
        let start = self.pos;
        self.pos += 2;
        loop {
            if self.pos >= self.bytes.len() {
                // Unterminated comment runs to end of input.
                break;
            }
            if self.bytes[self.pos] == b'*' && self.peek_at(1) == b'/' {
                self.pos += 2;
                break;
            }
            self.pos += 1;
        }
        self.segment(start, SegmentKind::Comment)
    }

    fn scan_line_comment(&mut self) -> Segment<'a> {
        let start = self.pos;
        self.pos += 2;
        while self.pos < self.bytes.len() && !matches!(self.bytes[self.pos], b'\r' | b'\n') {
            self.pos += 1;
        }
        self.segment(start, SegmentKind::Comment)
    }

    /// Advances past a quoted string starting at `self.pos`, honoring
    /// backslash escapes. An unterminated string runs to end of input.
    fn skip_string(&mut self) {
        let quote = self.bytes[self.pos];
        self.pos += 1;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            self.pos += 1;
            if b == b'\\' && self.pos < self.bytes.len() {
                self.pos += 1;
            } else if b == quote {
                break;
            }
        }
    }

    /// Decides whether the `:` at `pos` belongs to a selector.
    ///
    /// Scans forward (skipping strings and comments) for the next `{`,
    /// `}`, or `;`: a `{` means the colon sits in a selector or at-rule
    /// header; anything else means a property/value separator.
    fn colon_is_selector(&self, pos: usize) -> bool {
        let mut i = pos + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'{' => return true,
                b'}' | b';' => return false,
                b'"' | b'\'' => {
                    let quote = self.bytes[i];
                    i += 1;
                    while i < self.bytes.len() {
                        let b = self.bytes[i];
                        i += 1;
                        if b == b'\\' {
                            i += 1;
                        } else if b == quote {
                            break;
                        }
                    }
                }
                b'/' if self.bytes.get(i + 1) == Some(&b'*') => {
                    i += 2;
                    while i < self.bytes.len() {
                        if self.bytes[i] == b'*' && self.bytes.get(i + 1) == Some(&b'/') {
                            i += 2;
                            break;
                        }
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        }
        false
    }

    /// Classifies a non-value run by what follows it: a run preceding
    /// `;`, `}`, or end of input is a value (e.g. the string in
    /// `@import "x";`); everything else is a selector or property name.
    fn run_kind_from_following(&self) -> SegmentKind {
        let mut i = self.pos;
        while i < self.bytes.len() {
            let b = self.bytes[i];
            if b.is_ascii_whitespace() {
                i += 1;
                continue;
            }
            if self.at_block_comment(i) {
                i += 2;
                while i < self.bytes.len() {
                    if self.bytes[i] == b'*' && self.bytes.get(i + 1) == Some(&b'/') {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
                continue;
            }
            if self.at_line_comment(i) {
                while i < self.bytes.len() && !matches!(self.bytes[i], b'\r' | b'\n') {
                    i += 1;
                }
                continue;
            }
            return match b {
                b';' | b'}' => SegmentKind::Value,
                _ => SegmentKind::SelectorOrStyleProperty,
            };
        }
        SegmentKind::Value
    }

    fn scan_run(&mut self) -> Segment<'a> {
        let start = self.pos;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            match b {
                b'{' | b'}' | b';' => break,
                _ if b.is_ascii_whitespace() => break,
                b',' if self.in_value => break,
                b'/' if self.at_block_comment(self.pos) || self.at_line_comment(self.pos) => {
                    break
                }
                b'"' | b'\'' => self.skip_string(),
                b':' => {
                    if self.in_value || self.colon_is_selector(self.pos) {
                        self.pos += 1;
                    } else {
                        break;
                    }
                }
                _ => self.pos += 1,
            }
        }
        let kind = if self.in_value {
            SegmentKind::Value
        } else {
            self.run_kind_from_following()
        };
        self.segment(start, kind)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        if self.done {
            return None;
        }
        if self.pos >= self.bytes.len() {
            self.done = true;
            return Some(Segment {
                value: "",
                kind: SegmentKind::Terminator,
                index: self.bytes.len(),
            });
        }

        let b = self.bytes[self.pos];
        if b.is_ascii_whitespace() {
            return Some(self.scan_whitespace());
        }
        if self.at_block_comment(self.pos) {
            return Some(self.scan_block_comment());
        }
        if self.at_line_comment(self.pos) {
            return Some(self.scan_line_comment());
        }

        let start = self.pos;
        match b {
            b'{' => {
                self.pos += 1;
                self.in_value = false;
                Some(self.segment(start, SegmentKind::OpenBrace))
            }
            b'}' => {
                self.pos += 1;
                self.in_value = false;
                Some(self.segment(start, SegmentKind::CloseBrace))
            }
            b';' => {
                self.pos += 1;
                self.in_value = false;
                Some(self.segment(start, SegmentKind::SemiColon))
            }
            b':' if !self.in_value && !self.colon_is_selector(self.pos) => {
                self.pos += 1;
                self.in_value = true;
                Some(self.segment(start, SegmentKind::StylePropertyColon))
            }
            b',' if self.in_value => {
                self.pos += 1;
                Some(self.segment(start, SegmentKind::Value))
            }
            _ if b.is_ascii_control() => {
                self.pos += 1;
                Some(self.segment(start, SegmentKind::Other))
            }
            _ => Some(self.scan_run()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<(String, SegmentKind)> {
        Scanner::new(src)
            .filter(|s| s.kind != SegmentKind::Terminator)
            .map(|s| (s.value.to_string(), s.kind))
            .collect()
    }

    fn reassemble(src: &str) -> String {
        Scanner::new(src).map(|s| s.value).collect()
    }

    #[test]
    fn simple_rule() {
        use SegmentKind::*;
        let got = kinds("p { color: blue; }");
        let want = vec![
            ("p".to_string(), SelectorOrStyleProperty),
            (" ".to_string(), Whitespace),
            ("{".to_string(), OpenBrace),
            (" ".to_string(), Whitespace),
            ("color".to_string(), SelectorOrStyleProperty),
            (":".to_string(), StylePropertyColon),
            (" ".to_string(), Whitespace),
            ("blue".to_string(), Value),
            (";".to_string(), SemiColon),
            (" ".to_string(), Whitespace),
            ("}".to_string(), CloseBrace),
        ];
        assert_eq!(got, want);
    }

    #[test]
    fn pseudo_class_merges_into_selector() {
        let got = kinds("a:hover { color: red; }");
        assert_eq!(
            got[0],
            ("a:hover".to_string(), SegmentKind::SelectorOrStyleProperty)
        );
    }

    #[test]
    fn property_colon_after_whitespace() {
        let got = kinds("p { color : blue; }");
        assert!(got.contains(&(":".to_string(), SegmentKind::StylePropertyColon)));
    }

    #[test]
    fn value_runs_split_at_whitespace_and_commas() {
        use SegmentKind::*;
        let got: Vec<_> = kinds("p { animation: spin 2s, fade 1s; }")
            .into_iter()
            .filter(|(_, k)| *k == Value)
            .map(|(v, _)| v)
            .collect();
        assert_eq!(got, vec!["spin", "2s", ",", "fade", "1s"]);
    }

    #[test]
    fn block_comment_is_one_segment() {
        let got = kinds("/* hi\nthere */p{}");
        assert_eq!(got[0], ("/* hi\nthere */".to_string(), SegmentKind::Comment));
    }

    #[test]
    fn unterminated_comment_runs_to_eof() {
        let got = kinds("p{}/* trailing");
        assert_eq!(
            got.last().unwrap(),
            &("/* trailing".to_string(), SegmentKind::Comment)
        );
    }

    #[test]
    fn line_comment_excludes_newline() {
        let got = kinds("// note\np{}");
        assert_eq!(got[0], ("// note".to_string(), SegmentKind::Comment));
        assert_eq!(got[1], ("\n".to_string(), SegmentKind::Whitespace));
    }

    #[test]
    fn css_flavor_has_no_line_comments() {
        let segs: Vec<_> = Scanner::with_flavor("//x\n", Flavor::Css)
            .filter(|s| s.kind == SegmentKind::Comment)
            .collect();
        assert!(segs.is_empty());
    }

    #[test]
    fn strings_are_atomic() {
        let got = kinds("p { background: url(\"a;b{c}.png\"); }");
        assert!(got.contains(&(
            "url(\"a;b{c}.png\")".to_string(),
            SegmentKind::Value
        )));
    }

    #[test]
    fn at_rule_string_before_semicolon_is_value() {
        use SegmentKind::*;
        let got = kinds("@import \"x.css\";");
        assert_eq!(got[0], ("@import".to_string(), SelectorOrStyleProperty));
        assert_eq!(got[2], ("\"x.css\"".to_string(), Value));
    }

    #[test]
    fn media_query_colon_stays_in_header() {
        let got = kinds("@media (min-width:600px) { p { color: red; } }");
        assert_eq!(
            got[2],
            (
                "(min-width:600px)".to_string(),
                SegmentKind::SelectorOrStyleProperty
            )
        );
    }

    #[test]
    fn keyframes_header_tokens_are_selectors() {
        use SegmentKind::*;
        let got = kinds("div { @keyframes spin { } }");
        let sel: Vec<_> = got
            .iter()
            .filter(|(_, k)| *k == SelectorOrStyleProperty)
            .map(|(v, _)| v.clone())
            .collect();
        assert_eq!(sel, vec!["div", "@keyframes", "spin"]);
    }

    #[test]
    fn scan_is_lossless() {
        let inputs = [
            "p { color: blue; }",
            "html{div{a:hover{x:1}}}",
            "/* c */ body // line\n{ margin: 0 }",
            "@media screen and (min-width:10px){a{b:c}}",
            "broken { unterminated: \"string",
            "",
            "   \r\n\t ",
        ];
        for input in inputs {
            assert_eq!(reassemble(input), *input, "lossless scan of {input:?}");
        }
    }

    #[test]
    fn terminator_is_always_last() {
        let last = Scanner::new("p{}").last().unwrap();
        assert_eq!(last.kind, SegmentKind::Terminator);
        assert_eq!(last.index, 3);
        assert!(last.value.is_empty());

        let only = Scanner::new("").next().unwrap();
        assert_eq!(only.kind, SegmentKind::Terminator);
    }

    #[test]
    fn stray_control_byte_is_other() {
        let got = kinds("p{}\u{0}q{}");
        assert!(got.contains(&("\u{0}".to_string(), SegmentKind::Other)));
    }
}
