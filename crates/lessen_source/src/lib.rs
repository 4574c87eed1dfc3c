//! Source file loading for the Lessen pipeline.
//!
//! Defines the [`ContentLoader`] contract every pipeline stage implements,
//! the [`FileContents`] value that flows between stages, the shared
//! [`LoadError`] taxonomy, the leaf disk reader, and the last-modified
//! retriever that drives cache invalidation.

#![warn(missing_docs)]

mod contents;
mod freshness;
mod loader;
mod reader;

pub use contents::FileContents;
pub use freshness::LastModifiedRetriever;
pub use loader::{ContentLoader, LoadError};
pub use reader::DiskFileReader;
