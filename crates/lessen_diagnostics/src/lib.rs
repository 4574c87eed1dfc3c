//! Diagnostics for the Lessen pipeline.
//!
//! Lenient pipeline policies turn hard errors (circular imports, compiler
//! failures, corrupt cache files) into warnings; this crate is where those
//! warnings accumulate. Stages emit into a shared [`DiagnosticSink`] and the
//! caller renders whatever was collected once the request completes.

#![warn(missing_docs)]

mod diagnostic;
mod renderer;
mod severity;
mod sink;

pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, JsonRenderer, TextRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
