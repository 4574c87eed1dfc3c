//! LESS compilation seam and post-compilation selector tidying.
//!
//! The LESS-to-CSS engine itself is an external collaborator behind the
//! [`LessEngine`] trait. What lives here is the part the pipeline owns:
//! the adapter stage that invokes the engine, and the selector-path filter
//! that afterwards removes the noise LESS flattening makes of the injected
//! source-location markers and the wrapper sentinel.

#![warn(missing_docs)]

mod adapter;
mod engine;
mod filter;

pub use adapter::{CompilerErrorPolicy, CompilingLoader};
pub use engine::{EngineError, LessEngine, PassthroughEngine};
pub use filter::SelectorPathFilter;
