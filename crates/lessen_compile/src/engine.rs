//! The seam to an external LESS-to-CSS engine.

/// An error reported by the LESS engine.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct EngineError {
    /// The engine's own description of the failure.
    pub message: String,
}

impl EngineError {
    /// Creates an engine error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An external LESS-to-CSS compiler in minifying mode.
///
/// Implementations must be callable from multiple request threads: either
/// inherently thread-safe or serialising internally behind a mutex,
/// whichever the wrapped engine's own contract requires.
pub trait LessEngine: Send + Sync {
    /// Compiles LESS source into flat, minified CSS.
    fn compile(&self, source: &str) -> Result<String, EngineError>;
}

/// An engine that returns its input unchanged.
///
/// The stand-in used when the served content is plain CSS, and the default
/// until an embedder wires a real engine into the pipeline. The rest of
/// the stage (marker tidying, sentinel stripping) still applies.
pub struct PassthroughEngine;

impl LessEngine for PassthroughEngine {
    fn compile(&self, source: &str) -> Result<String, EngineError> {
        Ok(source.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_returns_input() {
        let out = PassthroughEngine.compile("a{x:1}").unwrap();
        assert_eq!(out, "a{x:1}");
    }

    #[test]
    fn engine_error_display() {
        let err = EngineError::new("unexpected token at line 3");
        assert_eq!(format!("{err}"), "unexpected token at line 3");
    }
}
