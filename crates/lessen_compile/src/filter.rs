//! Post-compilation tidying of flattened selector paths.
//!
//! LESS flattening turns nested rules into full descendant paths, which
//! multiplies every injected marker into combinations it was never meant
//! to appear in (`#file_1 #file_3`, `#file_1>h2`, ...). The filter walks
//! the compiled CSS rule set by rule set and keeps each marker only at
//! its most specific position, strips the wrapper sentinel out of real
//! selector paths, and drops paths that end up empty.

use std::collections::HashSet;

/// A compound selector with the combinator that precedes it
/// (empty for the first compound of a path).
struct Compound {
    combinator: String,
    text: String,
}

enum PathClass {
    /// No marker anywhere: a real selector path.
    NoMarkers,
    /// The final compound is exactly a marker; the path collapses to it.
    MarkerFinal(String),
    /// A marker appears somewhere other than the final compound.
    MarkerMisplaced,
    /// A compound contains a marker as one of its elements without being
    /// exactly that marker.
    Polluted,
}

/// Filters compiled selector paths using the markers recorded during
/// insertion and the optional wrapper sentinel.
pub struct SelectorPathFilter {
    marker_ids: HashSet<String>,
    sentinel: Option<String>,
}

impl SelectorPathFilter {
    /// Creates a filter over the given recorded marker ids.
    pub fn new(
        marker_ids: impl IntoIterator<Item = String>,
        sentinel: Option<String>,
    ) -> Self {
        Self {
            marker_ids: marker_ids.into_iter().collect(),
            sentinel,
        }
    }

    /// Tidies compiled CSS.
    ///
    /// Rule sets lose the paths that flattening polluted with markers;
    /// a path whose final compound is a marker is collapsed to just that
    /// marker, at most once per marker across the whole output. Rule sets
    /// left without any selector are dropped entirely. `@media` and
    /// `@supports` bodies are tidied recursively; `@keyframes` and other
    /// at-rule bodies pass through untouched.
    pub fn tidy(&self, css: &str) -> String {
        let mut emitted = HashSet::new();
        self.tidy_block(css, &mut emitted)
    }

    fn tidy_block(&self, css: &str, emitted: &mut HashSet<String>) -> String {
        let bytes = css.as_bytes();
        let mut out = String::with_capacity(css.len());
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i].is_ascii_whitespace() {
                out.push(bytes[i] as char);
                i += 1;
                continue;
            }
            let header_start = i;
            let mut j = i;
            let mut stop: Option<(usize, u8)> = None;
            while j < bytes.len() {
                match bytes[j] {
                    b'"' | b'\'' => j = skip_string(bytes, j),
                    b'{' | b';' | b'}' => {
                        stop = Some((j, bytes[j]));
                        break;
                    }
                    _ => j += 1,
                }
            }
            let (at, b) = match stop {
                None => {
                    out.push_str(&css[header_start..]);
                    break;
                }
                Some(s) => s,
            };
            if b != b'{' {
                // At-rule statement (`@charset ...;`) or stray `}`.
                out.push_str(&css[header_start..=at]);
                i = at + 1;
                continue;
            }

            let header = &css[header_start..at];
            let (body, after) = matched_body(css, at);
            let lead = header.trim_start();
            if lead.starts_with('@') {
                let name = at_rule_name(lead);
                if name == "@media" || name == "@supports" {
                    let inner = self.tidy_block(body, emitted);
                    if !inner.trim().is_empty() {
                        out.push_str(header);
                        out.push('{');
                        out.push_str(&inner);
                        out.push('}');
                    }
                } else {
                    out.push_str(header);
                    out.push('{');
                    out.push_str(body);
                    out.push('}');
                }
            } else {
                let kept = self.filter_selector_list(header, emitted);
                if !kept.is_empty() {
                    out.push_str(&kept.join(","));
                    out.push('{');
                    out.push_str(body);
                    out.push('}');
                }
            }
            i = after;
        }
        out
    }

    fn filter_selector_list(&self, header: &str, emitted: &mut HashSet<String>) -> Vec<String> {
        let mut kept = Vec::new();
        for path in split_top_level_commas(header) {
            let path = path.trim();
            if path.is_empty() {
                continue;
            }
            match self.classify(path) {
                PathClass::Polluted | PathClass::MarkerMisplaced => {}
                PathClass::MarkerFinal(id) => {
                    if emitted.insert(id.clone()) {
                        kept.push(id);
                    }
                }
                PathClass::NoMarkers => match &self.sentinel {
                    None => kept.push(path.to_string()),
                    Some(sentinel) => {
                        if let Some(stripped) = strip_sentinel_path(path, sentinel) {
                            kept.push(stripped);
                        }
                    }
                },
            }
        }
        kept
    }

    fn classify(&self, path: &str) -> PathClass {
        let compounds = split_compounds(path);
        let mut marker_positions = Vec::new();
        for (idx, compound) in compounds.iter().enumerate() {
            if self.marker_ids.contains(&compound.text) {
                marker_positions.push(idx);
            } else if self.contains_marker_element(&compound.text) {
                return PathClass::Polluted;
            }
        }
        match marker_positions.as_slice() {
            [] => PathClass::NoMarkers,
            [only] if *only == compounds.len() - 1 => {
                PathClass::MarkerFinal(compounds[*only].text.clone())
            }
            _ => PathClass::MarkerMisplaced,
        }
    }

    /// A compound "contains" a marker when the marker appears as one of
    /// its elements: the occurrence must end at an element boundary, so
    /// `#f_1:hover` contains `#f_1` but `#f_12` does not.
    fn contains_marker_element(&self, compound: &str) -> bool {
        for id in &self.marker_ids {
            let mut from = 0;
            while let Some(offset) = compound[from..].find(id.as_str()) {
                let end = from + offset + id.len();
                match compound.as_bytes().get(end) {
                    None => return true,
                    Some(b'.' | b'#' | b':' | b'[' | b'(') => return true,
                    _ => from = from + offset + 1,
                }
            }
        }
        false
    }
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

/// Returns the body between the `{` at `open` and its matching `}`
/// (both exclusive), plus the index just past the close.
fn matched_body(css: &str, open: usize) -> (&str, usize) {
    let bytes = css.as_bytes();
    let mut i = open + 1;
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
    (&css[body_start..body_end], i)
}

/// Returns the lowercased at-rule name (`@media` from `@media screen`).
fn at_rule_name(header: &str) -> String {
    header
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '(')
        .collect::<String>()
        .to_ascii_lowercase()
}

fn split_top_level_commas(header: &str) -> Vec<&str> {
    let bytes = header.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&header[start..]);
    parts
}

/// Splits a path into compound selectors, keeping each compound's
/// preceding combinator (descendant whitespace, `>`, `+`, or `~`).
fn split_compounds(path: &str) -> Vec<Compound> {
    let mut compounds: Vec<Compound> = Vec::new();
    let mut current = String::new();
    let mut combinator = String::new();
    let mut pending = String::new();
    let mut depth = 0usize;

    let flush =
        |compounds: &mut Vec<Compound>, current: &mut String, combinator: &mut String| {
            if !current.is_empty() {
                compounds.push(Compound {
                    combinator: std::mem::take(combinator),
                    text: std::mem::take(current),
                });
            }
        };

    for c in path.chars() {
        match c {
            '(' | '[' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            _ if depth > 0 => current.push(c),
            c if c.is_whitespace() => {
                flush(&mut compounds, &mut current, &mut combinator);
                if pending.is_empty() {
                    pending = " ".to_string();
                }
            }
            '>' | '+' | '~' => {
                flush(&mut compounds, &mut current, &mut combinator);
                pending = c.to_string();
            }
            _ => {
                if current.is_empty() {
                    combinator = std::mem::take(&mut pending);
                }
                current.push(c);
            }
        }
    }
    flush(&mut compounds, &mut current, &mut combinator);
    compounds
}

/// Removes sentinel elements from each compound of a path, dropping
/// compounds (and their combinator) that become empty. Returns `None`
/// when the whole path is consumed.
fn strip_sentinel_path(path: &str, sentinel: &str) -> Option<String> {
    let compounds = split_compounds(path);
    let mut rebuilt: Vec<(String, String)> = Vec::new();
    for compound in compounds {
        let kept: String = split_compound_elements(&compound.text)
            .into_iter()
            .filter(|e| e != sentinel)
            .collect();
        if kept.is_empty() {
            continue;
        }
        rebuilt.push((compound.combinator, kept));
    }
    if rebuilt.is_empty() {
        return None;
    }
    let mut out = String::new();
    for (k, (combinator, text)) in rebuilt.into_iter().enumerate() {
        if k > 0 {
            out.push_str(if combinator.is_empty() { " " } else { &combinator });
        }
        out.push_str(&text);
    }
    Some(out)
}

/// Splits a compound selector into its simple-selector elements
/// (`a.x:hover` becomes `["a", ".x", ":hover"]`).
fn split_compound_elements(compound: &str) -> Vec<String> {
    let mut elements: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in compound.chars() {
        let boundary = depth == 0 && matches!(c, '.' | '#' | ':' | '[') && !current.is_empty();
        if boundary {
            elements.push(std::mem::take(&mut current));
        }
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        current.push(c);
    }
    if !current.is_empty() {
        elements.push(current);
    }
    elements
}
