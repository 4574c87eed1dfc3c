//! Segment values and their classification.

/// The classification of a [`Segment`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SegmentKind {
    /// A run of ASCII whitespace.
    Whitespace,
    /// A `/* ... */` comment, or a `// ...` line comment in LESS flavor.
    /// Line comments do not include their terminating line break.
    Comment,
    /// A selector, at-rule name, or style property name. Pseudo-class
    /// colons are merged into the token (`a:hover` is one segment).
    SelectorOrStyleProperty,
    /// The `:` separating a style property from its value.
    StylePropertyColon,
    /// A component of a property value. Value runs are split at
    /// whitespace and commas so each name in a list is its own segment.
    Value,
    /// An opening `{`.
    OpenBrace,
    /// A closing `}`.
    CloseBrace,
    /// A `;`.
    SemiColon,
    /// The zero-length end-of-input segment, always emitted last.
    Terminator,
    /// A byte no other rule claims (stray control characters).
    Other,
}

/// A classified slice of the scanned text.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Segment<'a> {
    /// The text of this segment, exactly as it appears in the source.
    pub value: &'a str,
    /// The classification of this segment.
    pub kind: SegmentKind,
    /// Byte offset of this segment in the scanned string.
    pub index: usize,
}

impl<'a> Segment<'a> {
    /// Returns `true` for whitespace and comment segments, which most
    /// consumers skip when looking for structure.
    pub fn is_insignificant(&self) -> bool {
        matches!(self.kind, SegmentKind::Whitespace | SegmentKind::Comment)
    }
}
