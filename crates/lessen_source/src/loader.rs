//! The uniform loading contract between pipeline stages.

use crate::contents::FileContents;
use std::path::PathBuf;

/// A stage in the stylesheet pipeline.
///
/// Every stage, from the leaf disk reader to the outermost media-query
/// grouper, exposes the same operation: given a relative path, produce the
/// (possibly transformed) contents of that stylesheet. Stages wrap an inner
/// loader and pass `last_modified` through, taking the maximum across any
/// additional files they pull in.
pub trait ContentLoader {
    /// Loads the stylesheet at `relative_path`.
    fn load(&self, relative_path: &str) -> Result<FileContents, LoadError>;
}

impl ContentLoader for Box<dyn ContentLoader> {
    fn load(&self, relative_path: &str) -> Result<FileContents, LoadError> {
        (**self).load(relative_path)
    }
}

/// Errors surfaced through the [`ContentLoader`] seam.
///
/// Each stage propagates errors from the stage beneath it unchanged unless
/// a lenient policy explicitly swallows them, in which case a warning
/// diagnostic is emitted instead.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The relative path was empty, or a source file had no content.
    #[error("relative path must identify a non-empty stylesheet")]
    BadInput,

    /// The requested source file does not exist.
    #[error("stylesheet not found: {path}")]
    NotFound {
        /// The relative path that was requested.
        path: String,
    },

    /// An `@import` specified a path component or URL.
    ///
    /// Imports are restricted to the folder of the importing file so that
    /// cache invalidation only has to watch a single directory.
    #[error("unsupported import \"{import}\" in {file}: imports must not contain a path")]
    UnsupportedImport {
        /// The offending import target.
        import: String,
        /// The file containing the import declaration.
        file: String,
    },

    /// An `@import` chain revisited a file.
    #[error("circular import of \"{import}\" (chain: {chain})")]
    CircularImport {
        /// The import target that closed the cycle.
        import: String,
        /// The import chain that led here, outermost first.
        chain: String,
    },

    /// The LESS engine reported a compilation failure.
    #[error("stylesheet compilation failed: {message}")]
    Compiler {
        /// The engine's error message.
        message: String,
    },

    /// A read or write failed on a source file.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A stage violated a pipeline invariant. Always fatal.
    #[error(transparent)]
    Internal(#[from] lessen_common::InternalError),
}
