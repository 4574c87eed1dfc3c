//! Grouping of media-query blocks with identical criteria.

use lessen_source::{ContentLoader, FileContents, LoadError};

/// Reorders minified content so rules outside media queries come first,
/// followed by one block per distinct media header.
///
/// Headers are compared byte-for-byte, so the input must already be
/// minified (the minifier makes equal criteria byte-equal). Bodies are
/// concatenated in document order within each group, and groups appear in
/// the order their header was first seen. Idempotent.
pub fn group_media_queries(content: &str) -> String {
    let bytes = content.as_bytes();
    let mut outside = String::new();
    let mut groups: Vec<(String, String)> = Vec::new();

    let mut i = 0;
    let mut seg_start = 0;
    let mut depth = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => i = skip_string(bytes, i),
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            b'@' if depth == 0 && at_media(bytes, i) => {
                outside.push_str(&content[seg_start..i]);
                match parse_media_block(content, i) {
                    Some((header, body, end)) => {
                        match groups.iter_mut().find(|(h, _)| *h == header) {
                            Some((_, bodies)) => bodies.push_str(body),
                            None => groups.push((header.to_string(), body.to_string())),
                        }
                        i = end;
                        seg_start = end;
                    }
                    None => {
                        // No opening brace: emit the rest untouched.
                        outside.push_str(&content[i..]);
                        i = bytes.len();
                        seg_start = i;
                    }
                }
            }
            _ => i += 1,
        }
    }
    outside.push_str(&content[seg_start..]);

    let mut out = outside;
    for (header, bodies) in groups {
        out.push_str(&header);
        out.push('{');
        out.push_str(&bodies);
        out.push('}');
    }
    out
}

fn at_media(bytes: &[u8], i: usize) -> bool {
    bytes.len() - i >= 6
        && bytes[i..i + 6].eq_ignore_ascii_case(b"@media")
        && !bytes
            .get(i + 6)
            .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'-' || *b == b'_')
}

fn skip_string(bytes: &[u8], mut i: usize) -> usize {
    let quote = bytes[i];
    i += 1;
    while i < bytes.len() {
        let b = bytes[i];
        i += 1;
        if b == b'\\' && i < bytes.len() {
            i += 1;
        } else if b == quote {
            break;
        }
    }
    i
}

/// Splits one `@media ... { ... }` block starting at `start` into its
/// header (exclusive of `{`), body (exclusive of the outer braces), and
/// the index just past the closing brace.
fn parse_media_block(content: &str, start: usize) -> Option<(&str, &str, usize)> {
    let bytes = content.as_bytes();
    let mut i = start;
    while i < bytes.len() && bytes[i] != b'{' {
        i = match bytes[i] {
            b'"' | b'\'' => skip_string(bytes, i),
            _ => i + 1,
        };
    }
    if i >= bytes.len() {
        return None;
    }
    let header = &content[start..i];
    i += 1;
    let body_start = i;
    let mut depth = 1usize;
    while i < bytes.len() && depth > 0 {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'{' => depth += 1,
            b'}' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    let body_end = if depth == 0 { i - 1 } else { i };
    Some((header, &content[body_start..body_end], i))
}

/// Pipeline stage applying [`group_media_queries`] to an inner loader's
/// output.
pub struct MediaQueryGroupingLoader {
    inner: Box<dyn ContentLoader>,
}

impl MediaQueryGroupingLoader {
    /// Wraps the given loader.
    pub fn new(inner: Box<dyn ContentLoader>) -> Self {
        Self { inner }
    }
}

impl ContentLoader for MediaQueryGroupingLoader {
    fn load(&self, relative_path: &str) -> Result<FileContents, LoadError> {
        let file = self.inner.load(relative_path)?;
        let grouped = group_media_queries(&file.content);
        Ok(file.with_content(grouped))
    }
}
