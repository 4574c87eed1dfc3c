//! The pipeline stage that invokes the LESS engine and tidies its output.

use crate::engine::LessEngine;
use crate::filter::SelectorPathFilter;
use lessen_diagnostics::{Diagnostic, DiagnosticSink};
use lessen_source::{ContentLoader, FileContents, LoadError};
use lessen_transform::MarkerIdGenerator;
use std::sync::Arc;

/// How a LESS engine failure is handled.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CompilerErrorPolicy {
    /// Fail the request with [`LoadError::Compiler`].
    Raise,
    /// Log a warning and pass the uncompiled content through.
    WarnAndContinue,
}

/// Compiles the inner loader's output and filters the selector paths.
///
/// Holds the read capability on the marker generator that the inserter
/// stage records into: after compilation, every recorded marker id is
/// used to tidy the flattened selector paths, and the wrapper sentinel
/// (when configured) is stripped from the survivors.
pub struct CompilingLoader {
    inner: Box<dyn ContentLoader>,
    engine: Arc<dyn LessEngine>,
    generator: Arc<MarkerIdGenerator>,
    sentinel: Option<String>,
    on_error: CompilerErrorPolicy,
    sink: Arc<DiagnosticSink>,
}

impl CompilingLoader {
    /// Wraps the given loader.
    pub fn new(
        inner: Box<dyn ContentLoader>,
        engine: Arc<dyn LessEngine>,
        generator: Arc<MarkerIdGenerator>,
        sentinel: Option<String>,
        on_error: CompilerErrorPolicy,
        sink: Arc<DiagnosticSink>,
    ) -> Self {
        Self {
            inner,
            engine,
            generator,
            sentinel,
            on_error,
            sink,
        }
    }
}

impl ContentLoader for CompilingLoader {
    fn load(&self, relative_path: &str) -> Result<FileContents, LoadError> {
        let file = self.inner.load(relative_path)?;
        let compiled = match self.engine.compile(&file.content) {
            Ok(css) => css,
            Err(e) => match self.on_error {
                CompilerErrorPolicy::Raise => {
                    return Err(LoadError::Compiler {
                        message: e.to_string(),
                    })
                }
                CompilerErrorPolicy::WarnAndContinue => {
                    self.sink.emit(
                        Diagnostic::warning(format!("stylesheet compilation failed: {e}"))
                            .with_origin(relative_path),
                    );
                    file.content.clone()
                }
            },
        };
        let filter = SelectorPathFilter::new(self.generator.recorded(), self.sentinel.clone());
        Ok(file.with_content(filter.tidy(&compiled)))
    }
}
