//! Project root and configuration resolution shared by the subcommands.

use lessen_config::{load_config, LessenConfig};
use std::path::{Path, PathBuf};

/// Walks up from `start` looking for the nearest directory containing
/// `lessen.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join("lessen.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find lessen.toml in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root from the `--config` flag or the current
/// directory, and loads its configuration.
pub fn resolve(config_flag: Option<&str>) -> Result<(PathBuf, LessenConfig), Box<dyn std::error::Error>> {
    let root = match config_flag {
        Some(path) => {
            let p = PathBuf::from(path);
            if p.is_file() {
                p.parent()
                    .map(|parent| parent.to_path_buf())
                    .unwrap_or_else(|| PathBuf::from("."))
            } else {
                p
            }
        }
        None => find_project_root(&std::env::current_dir()?)?,
    };
    let config = load_config(&root)?;
    Ok((root, config))
}
