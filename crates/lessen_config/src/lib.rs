//! Configuration for the Lessen stylesheet pipeline.
//!
//! Projects are configured by a `lessen.toml` at the project root. This
//! crate owns the deserialized types, loading, and validation; mapping
//! onto runtime pipeline options lives with the pipeline itself.

#![warn(missing_docs)]

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{
    CacheSetting, CompilerErrorSetting, ImportPolicySetting, LessenConfig, MarkerSetting,
    PipelineSection, PoliciesSection, ServeSection,
};
