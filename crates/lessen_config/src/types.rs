//! Configuration types deserialized from `lessen.toml`.

use serde::Deserialize;

/// The top-level configuration parsed from `lessen.toml`.
#[derive(Debug, Deserialize)]
pub struct LessenConfig {
    /// Where stylesheets are served from and cached.
    pub serve: ServeSection,
    /// Transformation pipeline settings.
    #[serde(default)]
    pub pipeline: PipelineSection,
    /// Error-handling policies.
    #[serde(default)]
    pub policies: PoliciesSection,
}

/// Serving and caching locations.
#[derive(Debug, Deserialize)]
pub struct ServeSection {
    /// Directory stylesheets are read from, relative to the project root.
    pub root: String,
    /// Disk cache directory, relative to the project root.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
    /// Extensions considered by the freshness check; empty means all files.
    #[serde(default)]
    pub extensions: Vec<String>,
}

fn default_cache_dir() -> String {
    ".lessen-cache".to_string()
}

/// Settings for the transformation stages.
#[derive(Debug, Default, Deserialize)]
pub struct PipelineSection {
    /// Outer wrapper tag to replace with the sentinel (absent = off).
    #[serde(default)]
    pub tag_to_remove: Option<String>,
    /// Sentinel token substituted for the wrapper tag. Required when
    /// `tag_to_remove` is set; must itself be a valid selector token.
    #[serde(default)]
    pub sentinel: Option<String>,
    /// Which declaration headers receive source-location markers.
    #[serde(default)]
    pub marker_injection: MarkerSetting,
    /// Whether media-query blocks with equal criteria are coalesced.
    #[serde(default)]
    pub group_media_queries: bool,
}

/// Marker injection modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerSetting {
    /// No markers.
    Off,
    /// Markers on every declaration header.
    #[default]
    AllSelectors,
    /// Skip headers made up entirely of bare element selectors.
    SkipBareElements,
    /// Skip only single bare element selectors.
    SkipIsolatedBareElements,
}

/// Error-handling policies for recoverable pipeline problems.
#[derive(Debug, Default, Deserialize)]
pub struct PoliciesSection {
    /// Behaviour when an `@import` chain revisits a file.
    #[serde(default)]
    pub circular_import: ImportPolicySetting,
    /// Behaviour when an `@import` specifies a path or URL.
    #[serde(default)]
    pub unsupported_import: ImportPolicySetting,
    /// Behaviour when the LESS engine reports an error.
    #[serde(default)]
    pub compiler_error: CompilerErrorSetting,
    /// Behaviour when a disk cache file fails to parse.
    #[serde(default)]
    pub invalid_cache: CacheSetting,
}

/// Policy for import problems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportPolicySetting {
    /// Fail the request.
    #[default]
    Raise,
    /// Replace the declaration with empty content and warn.
    WarnAndEmpty,
}

/// Policy for compiler failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompilerErrorSetting {
    /// Fail the request.
    #[default]
    Raise,
    /// Pass the uncompiled content through and warn.
    WarnAndContinue,
}

/// Policy for unparseable disk cache files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheSetting {
    /// Delete the offending file.
    #[default]
    Delete,
    /// Leave the file in place.
    Ignore,
}
