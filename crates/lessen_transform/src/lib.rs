//! Content transformers for the Lessen stylesheet pipeline.
//!
//! Each module is one stage: a pure transform over stylesheet text plus a
//! [`ContentLoader`](lessen_source::ContentLoader) wrapper that applies it
//! to whatever an inner loader produces. Stages are composed by
//! `lessen_pipeline` in a fixed order; each passes `last_modified` through,
//! taking the maximum where additional files are inlined.

#![warn(missing_docs)]

pub mod imports;
pub mod keyframes;
pub mod marker;
pub mod media;
pub mod minify;
pub mod strip;
pub mod wrapper;

pub use imports::{ImportFlatteningLoader, ImportPolicy};
pub use keyframes::KeyframeScopingLoader;
pub use marker::{MarkerIdGenerator, MarkerInjection, MarkerInsertingLoader};
pub use media::MediaQueryGroupingLoader;
pub use minify::MinifyingLoader;
pub use strip::CommentStrippingLoader;
pub use wrapper::WrapperRenamingLoader;
