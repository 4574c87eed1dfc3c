//! Construction of the stage chain for one pipeline invocation.

use crate::options::PipelineOptions;
use lessen_compile::{CompilingLoader, LessEngine};
use lessen_diagnostics::DiagnosticSink;
use lessen_source::{ContentLoader, DiskFileReader};
use lessen_transform::{
    CommentStrippingLoader, ImportFlatteningLoader, KeyframeScopingLoader, MarkerIdGenerator,
    MarkerInjection, MarkerInsertingLoader, MediaQueryGroupingLoader, MinifyingLoader,
    WrapperRenamingLoader,
};
use std::path::Path;
use std::sync::Arc;

/// Builds the loader chain for one request.
///
/// Wrapping from outermost to innermost: media-query grouper, minifier,
/// LESS compiler, import flattener, keyframe scoper, marker inserter,
/// comment stripper, wrapper renamer, disk reader. The ordering is load
/// bearing: markers need comments gone so line counts are stable, wrapper
/// renaming must precede marker insertion so a marker never occupies the
/// first-segment slot, and import flattening must see sentinels already
/// in place. The minifier runs before grouping so equal media criteria
/// are byte-equal.
///
/// The marker generator is created fresh per call: its record is private
/// to this one invocation, written by the inserter stage and read by the
/// compile stage.
pub fn build_chain(
    root: &Path,
    options: &PipelineOptions,
    engine: Arc<dyn LessEngine>,
    sink: Arc<DiagnosticSink>,
) -> Box<dyn ContentLoader> {
    let generator = Arc::new(MarkerIdGenerator::new());

    let mut chain: Box<dyn ContentLoader> = Box::new(DiskFileReader::new(root));

    if let (Some(tag), Some(sentinel)) = (&options.tag_to_remove, &options.sentinel) {
        chain = Box::new(WrapperRenamingLoader::new(chain, tag.clone(), sentinel.clone()));
    }

    chain = Box::new(CommentStrippingLoader::new(chain));

    if options.marker_injection != MarkerInjection::Off {
        chain = Box::new(MarkerInsertingLoader::new(
            chain,
            Arc::clone(&generator),
            options.marker_injection,
        ));
    }

    chain = Box::new(KeyframeScopingLoader::new(chain));

    chain = Box::new(ImportFlatteningLoader::new(
        chain,
        options.on_circular_import,
        options.on_unsupported_import,
        Arc::clone(&sink),
    ));

    chain = Box::new(CompilingLoader::new(
        chain,
        engine,
        generator,
        options.sentinel.clone(),
        options.on_compiler_error,
        sink,
    ));

    chain = Box::new(MinifyingLoader::new(chain));

    if options.group_media_queries {
        chain = Box::new(MediaQueryGroupingLoader::new(chain));
    }

    chain
}
