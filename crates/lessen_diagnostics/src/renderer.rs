//! Rendering backends for human-readable and machine-readable output.

use crate::diagnostic::Diagnostic;
use std::fmt::Write;

/// Trait for rendering a batch of diagnostics into an output string.
pub trait DiagnosticRenderer {
    /// Renders the diagnostics into a formatted string.
    fn render(&self, diagnostics: &[Diagnostic]) -> String;
}

/// Renders diagnostics as one `severity: [origin:] message` line each.
pub struct TextRenderer;

impl DiagnosticRenderer for TextRenderer {
    fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for diag in diagnostics {
            let _ = writeln!(out, "{diag}");
        }
        out
    }
}

/// Renders diagnostics as a JSON array for machine consumption.
pub struct JsonRenderer;

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diagnostics: &[Diagnostic]) -> String {
        serde_json::to_string_pretty(diagnostics).unwrap_or_else(|_| "[]".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_renderer_one_line_per_diagnostic() {
        let diags = vec![
            Diagnostic::warning("unsupported import elided").with_origin("a.css"),
            Diagnostic::note("cache rebuilt"),
        ];
        let out = TextRenderer.render(&diags);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "warning: a.css: unsupported import elided");
        assert_eq!(lines[1], "note: cache rebuilt");
    }

    #[test]
    fn json_renderer_roundtrips() {
        let diags = vec![Diagnostic::error("boom").with_origin("x.less")];
        let out = JsonRenderer.render(&diags);
        let back: Vec<Diagnostic> = serde_json::from_str(&out).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].origin.as_deref(), Some("x.less"));
    }

    #[test]
    fn empty_batch_renders_empty() {
        assert!(TextRenderer.render(&[]).is_empty());
    }
}
