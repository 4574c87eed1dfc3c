//! Internal-error type for pipeline invariant violations.

/// An internal pipeline error indicating a bug in Lessen, not a problem
/// with user input.
///
/// These should never occur during normal operation; a stage producing
/// one means a logic error that must be fixed rather than handled.
#[derive(Debug, thiserror::Error)]
#[error("internal pipeline error: {message}")]
pub struct InternalError {
    /// Description of the violated invariant.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let err = InternalError::new("stage produced empty output");
        assert_eq!(
            format!("{err}"),
            "internal pipeline error: stage produced empty output"
        );
    }
}
