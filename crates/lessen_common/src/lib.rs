//! Shared primitives for the Lessen stylesheet pipeline.
//!
//! Small building blocks used by several crates: the filename-to-identifier
//! transform that marker ids and keyframe scope prefixes are derived from,
//! content hashing, timestamp comparison with HTTP-date tolerance, and the
//! internal-error type for invariant violations.

#![warn(missing_docs)]

mod hash;
mod ident;
mod result;
mod time;

pub use hash::ContentHash;
pub use ident::{marker_ident, scope_prefix};
pub use result::InternalError;
pub use time::{timestamps_match, SECOND};
