//! Recursive flattening of same-folder `@import` declarations.
//!
//! Imports are restricted to the folder of the importing file; that keeps
//! the freshness timestamp for a request equal to the newest file in one
//! directory, so cache invalidation never has to walk a tree. Each import
//! is replaced in place by the flattened content of its target, wrapped in
//! an `@media` block when the declaration carries a media condition.

use lessen_diagnostics::{Diagnostic, DiagnosticSink};
use lessen_source::{ContentLoader, FileContents, LoadError};
use std::sync::Arc;

/// How an import problem (cycle or unsupported target) is handled.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ImportPolicy {
    /// Fail the request with the corresponding [`LoadError`].
    Raise,
    /// Replace the declaration with empty content and log a warning.
    WarnAndEmpty,
}

/// A parsed `@import` declaration.
///
/// `filename` must not contain path separators; the flattener rejects such
/// imports before ever resolving them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportDeclaration {
    /// Byte range of the declaration's raw text, including a trailing `;`
    /// when present but never a terminating line break.
    pub start: usize,
    /// End of the raw text (exclusive).
    pub end: usize,
    /// The import target, exactly as written.
    pub filename: String,
    /// The media condition between the target and the terminator, if any.
    pub media: Option<String>,
}

/// Parses the ordered list of `@import` declarations in `content`.
///
/// Recognised shapes (spaces flexible, terminator `;`, `\r`, `\n`, or end
/// of input): `@import url("X") M`, `@import url('X') M`,
/// `@import url(X) M`, `@import "X" M`, `@import 'X' M`. Text that merely
/// resembles an import is left alone; the content is expected to be
/// comment-stripped before parsing.
pub fn parse_imports(content: &str) -> Vec<ImportDeclaration> {
    let bytes = content.as_bytes();
    let mut decls = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'@'
            || bytes.len() - i < 7
            || !bytes[i..i + 7].eq_ignore_ascii_case(b"@import")
        {
            i += 1;
            continue;
        }
        if i > 0 && is_ident_byte(bytes[i - 1]) {
            i += 1;
            continue;
        }
        if let Some(b) = bytes.get(i + 7) {
            if is_ident_byte(*b) {
                i += 1;
                continue;
            }
        }
        match parse_declaration_at(content, i) {
            Some(decl) => {
                i = decl.end;
                decls.push(decl);
            }
            None => i += 1,
        }
    }
    decls
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn parse_declaration_at(content: &str, start: usize) -> Option<ImportDeclaration> {
    let bytes = content.as_bytes();
    let mut j = start + 7;
    while matches!(bytes.get(j), Some(b' ' | b'\t')) {
        j += 1;
    }

    let filename = if bytes.len() - j >= 4 && bytes[j..j + 4].eq_ignore_ascii_case(b"url(") {
        j += 4;
        while matches!(bytes.get(j), Some(b' ' | b'\t')) {
            j += 1;
        }
        let filename = match bytes.get(j) {
            Some(q @ (b'"' | b'\'')) => {
                j += 1;
                let from = j;
                while j < bytes.len() && bytes[j] != *q {
                    j += 1;
                }
                let name = content[from..j].to_string();
                j += 1; // closing quote
                name
            }
            _ => {
                let from = j;
                while j < bytes.len() && bytes[j] != b')' && !matches!(bytes[j], b'\r' | b'\n') {
                    j += 1;
                }
                content[from..j].trim().to_string()
            }
        };
        while matches!(bytes.get(j), Some(b' ' | b'\t')) {
            j += 1;
        }
        if bytes.get(j) != Some(&b')') {
            return None;
        }
        j += 1;
        filename
    } else {
        match bytes.get(j) {
            Some(q @ (b'"' | b'\'')) => {
                j += 1;
                let from = j;
                while j < bytes.len() && bytes[j] != *q {
                    j += 1;
                }
                if j >= bytes.len() {
                    return None;
                }
                let name = content[from..j].to_string();
                j += 1;
                name
            }
            _ => return None,
        }
    };

    if filename.trim().is_empty() {
        return None;
    }

    let media_from = j;
    while j < bytes.len() && !matches!(bytes[j], b';' | b'\r' | b'\n') {
        j += 1;
    }
    let media_text = content[media_from..j].trim();
    let media = if media_text.is_empty() {
        None
    } else {
        Some(media_text.to_string())
    };
    let end = if bytes.get(j) == Some(&b';') { j + 1 } else { j };

    Some(ImportDeclaration {
        start,
        end,
        filename: filename.trim().to_string(),
        media,
    })
}

fn parent_folder(relative_path: &str) -> &str {
    match relative_path.rfind(['/', '\\']) {
        Some(idx) => &relative_path[..idx],
        None => "",
    }
}

fn normalise(relative_path: &str) -> String {
    relative_path.replace('\\', "/")
}

/// Pipeline stage that inlines `@import` declarations recursively.
///
/// Each imported file is loaded through the same inner chain as the
/// importing file, so wrapper renaming, comment stripping, markers, and
/// keyframe scoping have all been applied per file before its content is
/// spliced in. The resulting `last_modified` is the maximum across every
/// inlined file.
pub struct ImportFlatteningLoader {
    inner: Box<dyn ContentLoader>,
    on_circular: ImportPolicy,
    on_unsupported: ImportPolicy,
    sink: Arc<DiagnosticSink>,
}

impl ImportFlatteningLoader {
    /// Wraps the given loader with the given policies.
    pub fn new(
        inner: Box<dyn ContentLoader>,
        on_circular: ImportPolicy,
        on_unsupported: ImportPolicy,
        sink: Arc<DiagnosticSink>,
    ) -> Self {
        Self {
            inner,
            on_circular,
            on_unsupported,
            sink,
        }
    }

    fn flatten(&self, relative_path: &str, chain: &mut Vec<String>) -> Result<FileContents, LoadError> {
        chain.push(normalise(relative_path));
        let result = self.flatten_inner(relative_path, chain);
        chain.pop();
        result
    }

    fn flatten_inner(
        &self,
        relative_path: &str,
        chain: &mut Vec<String>,
    ) -> Result<FileContents, LoadError> {
        let file = self.inner.load(relative_path)?;
        let decls = parse_imports(&file.content);

        let folder = parent_folder(relative_path).to_string();
        let mut last_modified = file.last_modified;
        let mut out = String::with_capacity(file.content.len());
        let mut cursor = 0;

        for decl in &decls {
            out.push_str(&file.content[cursor..decl.start]);
            cursor = decl.end;

            if decl.filename.contains(['/', '\\']) {
                match self.on_unsupported {
                    ImportPolicy::Raise => {
                        return Err(LoadError::UnsupportedImport {
                            import: decl.filename.clone(),
                            file: relative_path.to_string(),
                        })
                    }
                    ImportPolicy::WarnAndEmpty => {
                        self.sink.emit(
                            Diagnostic::warning(format!(
                                "dropped unsupported import \"{}\"",
                                decl.filename
                            ))
                            .with_origin(relative_path),
                        );
                        continue;
                    }
                }
            }

            let child_path = if folder.is_empty() {
                decl.filename.clone()
            } else {
                format!("{folder}/{}", decl.filename)
            };
            let child_norm = normalise(&child_path);

            if chain.iter().any(|p| p.eq_ignore_ascii_case(&child_norm)) {
                match self.on_circular {
                    ImportPolicy::Raise => {
                        return Err(LoadError::CircularImport {
                            import: decl.filename.clone(),
                            chain: chain.join(" -> "),
                        })
                    }
                    ImportPolicy::WarnAndEmpty => {
                        self.sink.emit(
                            Diagnostic::warning(format!(
                                "dropped circular import of \"{}\"",
                                decl.filename
                            ))
                            .with_origin(relative_path),
                        );
                        continue;
                    }
                }
            }

            let child = self.flatten(&child_path, chain)?;
            last_modified = last_modified.max(child.last_modified);
            match &decl.media {
                Some(media) => {
                    out.push_str("@media ");
                    out.push_str(media);
                    out.push_str(" {");
                    out.push_str(&child.content);
                    out.push('}');
                }
                None => out.push_str(&child.content),
            }
        }
        out.push_str(&file.content[cursor..]);

        let trimmed = out.trim_end().to_string();
        FileContents::new(relative_path, last_modified, trimmed)
    }
}

impl ContentLoader for ImportFlatteningLoader {
    fn load(&self, relative_path: &str) -> Result<FileContents, LoadError> {
        self.flatten(relative_path, &mut Vec::new())
    }
}
