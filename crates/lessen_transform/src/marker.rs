//! Source-location marker generation and insertion.
//!
//! Markers are synthetic selectors of the form `#<ident>_<line>` prepended
//! to declaration headers so that rules in minified output can be traced
//! back to the file and line they came from. The generator records every
//! id it hands out; the compile adapter later reads that record to tidy
//! the flattened selector paths.

use lessen_common::marker_ident;
use lessen_source::{ContentLoader, FileContents, LoadError};
use std::sync::Mutex;

/// Produces and records marker ids for one pipeline invocation.
///
/// Created fresh per request and shared between the marker inserter
/// (which records) and the compile adapter (which reads), so the record
/// is private to a single pipeline run.
pub struct MarkerIdGenerator {
    recorded: Mutex<Vec<String>>,
}

impl MarkerIdGenerator {
    /// Creates a generator with an empty record.
    pub fn new() -> Self {
        Self {
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// Returns `"<markerId>,"` for the given file and line, recording the
    /// id (without the trailing comma) for later retrieval.
    ///
    /// The trailing comma lets the inserter prepend the result directly to
    /// a selector list. Returns `None` when the filename yields no usable
    /// identifier, in which case nothing is recorded.
    pub fn generate(&self, relative_path: &str, line: usize) -> Option<String> {
        let ident = marker_ident(relative_path)?;
        let id = format!("#{ident}_{line}");
        let mut recorded = self.recorded.lock().unwrap();
        recorded.push(id.clone());
        Some(format!("{id},"))
    }

    /// Returns a snapshot of every marker id recorded so far, in order.
    pub fn recorded(&self) -> Vec<String> {
        self.recorded.lock().unwrap().clone()
    }
}

impl Default for MarkerIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Which declaration headers receive markers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MarkerInjection {
    /// Insert no markers at all.
    Off,
    /// Insert a marker before every declaration header.
    AllSelectors,
    /// Skip headers consisting entirely of bare element selectors
    /// (no `.`, `#`, `:`, `[`, or `>` in any comma-separated part).
    SkipBareElements,
    /// Skip only single bare element selectors (no comma, no `.#:[>`).
    SkipIsolatedBareElements,
}

impl MarkerInjection {
    /// Returns `true` when a marker should be inserted before the header
    /// with the given selector text.
    fn accepts(self, header: &str) -> bool {
        let header = header.trim();
        if header.is_empty() {
            return false;
        }
        match self {
            MarkerInjection::Off => false,
            MarkerInjection::AllSelectors => true,
            MarkerInjection::SkipBareElements => {
                !header.split(',').all(|part| is_bare_element(part))
            }
            MarkerInjection::SkipIsolatedBareElements => {
                header.contains(',') || !is_bare_element(header)
            }
        }
    }
}

/// A selector part is "bare" when it holds nothing more specific than
/// element type names.
fn is_bare_element(part: &str) -> bool {
    !part.contains(['.', '#', ':', '[', '>'])
}

/// Reverse-walk states: either in ordinary content, or inside the selector
/// list that precedes a `{` already passed.
enum WalkState {
    Standard,
    DeclarationHeader,
}

/// Inserts markers before declaration headers.
///
/// Line endings are normalised to `\n`, then the content is walked in
/// reverse. Hitting `{` opens a header region; the header then ends at
/// the preceding `}`, `;`, a further `{` (a nested LESS boundary, which
/// both emits a marker and continues into the enclosing header), or the
/// beginning of the file. Headers that turn out to be mixin calls or
/// at-rule headers (a `)` or `@` appears) get no marker. The marker line
/// is the line the header's last content sits on.
pub fn insert_markers(
    content: &str,
    relative_path: &str,
    generator: &MarkerIdGenerator,
    injection: MarkerInjection,
) -> String {
    if injection == MarkerInjection::Off || marker_ident(relative_path).is_none() {
        return content.to_string();
    }

    let normalised = content.replace("\r\n", "\n").replace('\r', "\n");
    let chars: Vec<char> = normalised.chars().collect();
    let total_lines = chars.iter().filter(|c| **c == '\n').count() + 1;

    // (char position, marker text); positions collected in reverse order.
    let mut insertions: Vec<(usize, String)> = Vec::new();
    let mut state = WalkState::Standard;
    let mut line = total_lines;
    let mut header: Vec<char> = Vec::new();
    let mut line_offset = 0usize;
    let mut content_seen = false;

    let emit = |insertions: &mut Vec<(usize, String)>,
                    header: &mut Vec<char>,
                    at: usize,
                    line: usize| {
        let text: String = header.iter().rev().collect();
        if injection.accepts(&text) {
            if let Some(marker) = generator.generate(relative_path, line) {
                insertions.push((at, marker));
            }
        }
        header.clear();
    };

    for i in (0..chars.len()).rev() {
        let c = chars[i];
        if c == '\n' {
            line -= 1;
        }
        match state {
            WalkState::Standard => {
                if c == '{' {
                    state = WalkState::DeclarationHeader;
                    header.clear();
                    line_offset = 0;
                    content_seen = false;
                }
            }
            WalkState::DeclarationHeader => match c {
                '}' | ';' => {
                    emit(&mut insertions, &mut header, i + 1, line + line_offset);
                    state = WalkState::Standard;
                }
                '{' => {
                    emit(&mut insertions, &mut header, i + 1, line + line_offset);
                    line_offset = 0;
                    content_seen = false;
                }
                ')' | '@' => {
                    header.clear();
                    state = WalkState::Standard;
                }
                _ => {
                    if c == '\n' && content_seen {
                        line_offset += 1;
                    }
                    if !c.is_whitespace() {
                        content_seen = true;
                    }
                    header.push(c);
                }
            },
        }
    }
    if matches!(state, WalkState::DeclarationHeader) {
        emit(&mut insertions, &mut header, 0, line + line_offset);
    }

    if insertions.is_empty() {
        return normalised;
    }

    // Apply in forward order; positions were collected back-to-front.
    let mut out = String::with_capacity(normalised.len() + insertions.len() * 16);
    let mut cursor = 0;
    for (at, marker) in insertions.into_iter().rev() {
        out.extend(chars[cursor..at].iter());
        out.push_str(&marker);
        cursor = at;
    }
    out.extend(chars[cursor..].iter());
    out
}

/// Pipeline stage applying [`insert_markers`] to an inner loader's output.
pub struct MarkerInsertingLoader {
    inner: Box<dyn ContentLoader>,
    generator: std::sync::Arc<MarkerIdGenerator>,
    injection: MarkerInjection,
}

impl MarkerInsertingLoader {
    /// Wraps the given loader, recording into `generator`.
    pub fn new(
        inner: Box<dyn ContentLoader>,
        generator: std::sync::Arc<MarkerIdGenerator>,
        injection: MarkerInjection,
    ) -> Self {
        Self {
            inner,
            generator,
            injection,
        }
    }
}

impl ContentLoader for MarkerInsertingLoader {
    fn load(&self, relative_path: &str) -> Result<FileContents, LoadError> {
        let file = self.inner.load(relative_path)?;
        let marked = insert_markers(
            &file.content,
            relative_path,
            &self.generator,
            self.injection,
        );
        Ok(file.with_content(marked))
    }
}
