//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::LessenConfig;
use std::path::Path;

/// Loads and validates a `lessen.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<LessenConfig, ConfigError> {
    let config_path = project_dir.join("lessen.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `lessen.toml` from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<LessenConfig, ConfigError> {
    let config: LessenConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &LessenConfig) -> Result<(), ConfigError> {
    if config.serve.root.trim().is_empty() {
        return Err(ConfigError::MissingField("serve.root".to_string()));
    }
    if config.pipeline.tag_to_remove.is_some() {
        let sentinel = config
            .pipeline
            .sentinel
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField("pipeline.sentinel".to_string()))?;
        if sentinel.is_empty()
            || sentinel.contains(['{', '}', ',', ':'])
            || sentinel.chars().any(char::is_whitespace)
        {
            return Err(ConfigError::Validation(
                "pipeline.sentinel must be a single selector token".to_string(),
            ));
        }
    }
    Ok(())
}
