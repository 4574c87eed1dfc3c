//! Per-file scoping of `@keyframes` names.
//!
//! When stylesheets are combined by import flattening, two files can both
//! declare `@keyframes fade` and silently fight over it. Keyframes that
//! are declared inside a nested block get renamed to a file-derived
//! prefix, along with every `animation` / `animation-name` reference to
//! them, so each file's animations stay private to it.

use lessen_common::scope_prefix;
use lessen_scan::{Scanner, Segment, SegmentKind};
use lessen_source::{ContentLoader, FileContents, LoadError};
use std::collections::HashMap;

/// Returns `true` for `@keyframes` and vendor-prefixed forms such as
/// `@-webkit-keyframes`.
fn is_keyframes_at_rule(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    lower == "@keyframes" || (lower.starts_with('@') && lower.ends_with("-keyframes"))
}

/// Returns `true` for property names whose values reference keyframes.
fn is_animation_property(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    lower == "animation"
        || lower == "animation-name"
        || lower.ends_with("-animation")
        || lower.ends_with("-animation-name")
}

/// Prefixes nested `@keyframes` names and the references to them.
///
/// Only declarations at brace depth ≥ 1 are renamed; a top-level
/// `@keyframes` is already global by intent and is left alone. Returns
/// the input unchanged when the file declares no nested keyframes.
pub fn scope_keyframes(content: &str, relative_path: &str) -> String {
    let segments: Vec<Segment<'_>> = Scanner::new(content).collect();

    // First pass: find nested @keyframes declarations and decide renames.
    let prefix = scope_prefix(relative_path);
    let mut renames: HashMap<String, String> = HashMap::new();
    let mut renamed_indices: Vec<usize> = Vec::new();
    let mut depth = 0usize;
    for (i, seg) in segments.iter().enumerate() {
        match seg.kind {
            SegmentKind::OpenBrace => depth += 1,
            SegmentKind::CloseBrace => depth = depth.saturating_sub(1),
            SegmentKind::SelectorOrStyleProperty
                if depth >= 1 && is_keyframes_at_rule(seg.value) =>
            {
                if let Some((j, name)) = segments
                    .iter()
                    .enumerate()
                    .skip(i + 1)
                    .find(|(_, s)| !s.is_insignificant())
                    .filter(|(_, s)| s.kind == SegmentKind::SelectorOrStyleProperty)
                    .map(|(j, s)| (j, s.value))
                {
                    renames
                        .entry(name.to_string())
                        .or_insert_with(|| format!("{prefix}_{name}"));
                    renamed_indices.push(j);
                }
            }
            _ => {}
        }
    }

    if renames.is_empty() {
        return content.to_string();
    }

    // Second pass: rewrite declarations and animation value references.
    let mut out = String::with_capacity(content.len() + renames.len() * prefix.len());
    let mut in_animation_value = false;
    for (i, seg) in segments.iter().enumerate() {
        if renamed_indices.contains(&i) {
            out.push_str(&renames[seg.value]);
            continue;
        }
        match seg.kind {
            SegmentKind::SelectorOrStyleProperty => {
                in_animation_value = is_animation_property(seg.value);
                out.push_str(seg.value);
            }
            SegmentKind::Value if in_animation_value => {
                match renames.get(seg.value) {
                    Some(scoped) => out.push_str(scoped),
                    None => out.push_str(seg.value),
                }
            }
            SegmentKind::SemiColon | SegmentKind::CloseBrace | SegmentKind::OpenBrace => {
                in_animation_value = false;
                out.push_str(seg.value);
            }
            _ => out.push_str(seg.value),
        }
    }
    out
}

/// Pipeline stage applying [`scope_keyframes`] to an inner loader's output.
pub struct KeyframeScopingLoader {
    inner: Box<dyn ContentLoader>,
}

impl KeyframeScopingLoader {
    /// Wraps the given loader.
    pub fn new(inner: Box<dyn ContentLoader>) -> Self {
        Self { inner }
    }
}

impl ContentLoader for KeyframeScopingLoader {
    fn load(&self, relative_path: &str) -> Result<FileContents, LoadError> {
        let file = self.inner.load(relative_path)?;
        let scoped = scope_keyframes(&file.content, relative_path);
        Ok(file.with_content(scoped))
    }
}
