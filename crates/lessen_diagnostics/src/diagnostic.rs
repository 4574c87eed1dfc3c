//! Diagnostic records attributing a message to a stylesheet.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single diagnostic message, optionally attributed to a source file.
///
/// Unlike compiler diagnostics there are no spans: pipeline stages work on
/// whole files, so the finest useful granularity is the relative path of
/// the stylesheet the message concerns.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The diagnostic message.
    pub message: String,
    /// Relative path of the stylesheet this diagnostic concerns, if any.
    pub origin: Option<String>,
}

impl Diagnostic {
    /// Creates a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            origin: None,
        }
    }

    /// Creates a note diagnostic.
    pub fn note(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Note,
            message: message.into(),
            origin: None,
        }
    }

    /// Creates an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            origin: None,
        }
    }

    /// Attributes this diagnostic to a stylesheet path.
    pub fn with_origin(mut self, relative_path: impl Into<String>) -> Self {
        self.origin = Some(relative_path.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.origin {
            Some(origin) => write!(f, "{}: {}: {}", self.severity, origin, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}
