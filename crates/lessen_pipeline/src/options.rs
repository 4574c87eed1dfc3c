//! Runtime options describing one pipeline composition.

use lessen_cache::InvalidCacheBehaviour;
use lessen_compile::CompilerErrorPolicy;
use lessen_config::{
    CacheSetting, CompilerErrorSetting, ImportPolicySetting, LessenConfig, MarkerSetting,
};
use lessen_transform::{ImportPolicy, MarkerInjection};

/// The switches and policies for one pipeline composition.
///
/// A single flat struct rather than per-stage configs; the two canonical
/// compositions are [`PipelineOptions::default`] and
/// [`PipelineOptions::enhanced`].
#[derive(Clone, Debug)]
pub struct PipelineOptions {
    /// Outer wrapper tag to rename, with its sentinel (`None` = off).
    pub tag_to_remove: Option<String>,
    /// Sentinel substituted for the wrapper tag.
    pub sentinel: Option<String>,
    /// Which declaration headers receive markers.
    pub marker_injection: MarkerInjection,
    /// Whether media-query blocks with equal criteria are coalesced.
    pub group_media_queries: bool,
    /// Behaviour on circular imports.
    pub on_circular_import: ImportPolicy,
    /// Behaviour on imports that specify a path or URL.
    pub on_unsupported_import: ImportPolicy,
    /// Behaviour on LESS engine failures.
    pub on_compiler_error: CompilerErrorPolicy,
    /// Behaviour on unparseable disk cache files.
    pub invalid_cache_behaviour: InvalidCacheBehaviour,
}

impl Default for PipelineOptions {
    /// The default composition: markers on every selector, no wrapper
    /// renaming, no media-query grouping, strict policies.
    fn default() -> Self {
        Self {
            tag_to_remove: None,
            sentinel: None,
            marker_injection: MarkerInjection::AllSelectors,
            group_media_queries: false,
            on_circular_import: ImportPolicy::Raise,
            on_unsupported_import: ImportPolicy::Raise,
            on_compiler_error: CompilerErrorPolicy::Raise,
            invalid_cache_behaviour: InvalidCacheBehaviour::Delete,
        }
    }
}

impl PipelineOptions {
    /// The enhanced composition: wrapper renaming, markers that skip bare
    /// element selectors, and media-query grouping.
    pub fn enhanced(tag: impl Into<String>, sentinel: impl Into<String>) -> Self {
        Self {
            tag_to_remove: Some(tag.into()),
            sentinel: Some(sentinel.into()),
            marker_injection: MarkerInjection::SkipBareElements,
            group_media_queries: true,
            ..Self::default()
        }
    }

    /// Maps a loaded configuration onto pipeline options.
    pub fn from_config(config: &LessenConfig) -> Self {
        Self {
            tag_to_remove: config.pipeline.tag_to_remove.clone(),
            sentinel: config.pipeline.sentinel.clone(),
            marker_injection: match config.pipeline.marker_injection {
                MarkerSetting::Off => MarkerInjection::Off,
                MarkerSetting::AllSelectors => MarkerInjection::AllSelectors,
                MarkerSetting::SkipBareElements => MarkerInjection::SkipBareElements,
                MarkerSetting::SkipIsolatedBareElements => {
                    MarkerInjection::SkipIsolatedBareElements
                }
            },
            group_media_queries: config.pipeline.group_media_queries,
            on_circular_import: import_policy(config.policies.circular_import),
            on_unsupported_import: import_policy(config.policies.unsupported_import),
            on_compiler_error: match config.policies.compiler_error {
                CompilerErrorSetting::Raise => CompilerErrorPolicy::Raise,
                CompilerErrorSetting::WarnAndContinue => CompilerErrorPolicy::WarnAndContinue,
            },
            invalid_cache_behaviour: match config.policies.invalid_cache {
                CacheSetting::Delete => InvalidCacheBehaviour::Delete,
                CacheSetting::Ignore => InvalidCacheBehaviour::Ignore,
            },
        }
    }
}

fn import_policy(setting: ImportPolicySetting) -> ImportPolicy {
    match setting {
        ImportPolicySetting::Raise => ImportPolicy::Raise,
        ImportPolicySetting::WarnAndEmpty => ImportPolicy::WarnAndEmpty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_composition() {
        let options = PipelineOptions::default();
        assert!(options.tag_to_remove.is_none());
        assert_eq!(options.marker_injection, MarkerInjection::AllSelectors);
        assert!(!options.group_media_queries);
        assert_eq!(options.on_circular_import, ImportPolicy::Raise);
    }

    #[test]
    fn enhanced_composition() {
        let options = PipelineOptions::enhanced("html", "scope-carrier");
        assert_eq!(options.tag_to_remove.as_deref(), Some("html"));
        assert_eq!(options.sentinel.as_deref(), Some("scope-carrier"));
        assert_eq!(options.marker_injection, MarkerInjection::SkipBareElements);
        assert!(options.group_media_queries);
    }

    #[test]
    fn config_mapping_carries_policies() {
        let config = lessen_config::load_config_from_str(
            r#"
[serve]
root = "styles"

[pipeline]
marker_injection = "skip-isolated-bare-elements"

[policies]
circular_import = "warn-and-empty"
invalid_cache = "ignore"
"#,
        )
        .unwrap();
        let options = PipelineOptions::from_config(&config);
        assert_eq!(
            options.marker_injection,
            MarkerInjection::SkipIsolatedBareElements
        );
        assert_eq!(options.on_circular_import, ImportPolicy::WarnAndEmpty);
        assert_eq!(
            options.invalid_cache_behaviour,
            InvalidCacheBehaviour::Ignore
        );
        assert_eq!(options.on_unsupported_import, ImportPolicy::Raise);
    }
}
