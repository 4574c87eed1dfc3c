//! The `lessen clean` subcommand.

use crate::{project, Cli};

/// Deletes the configured disk cache directory.
pub fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let (root, config) = project::resolve(cli.config.as_deref())?;
    let cache_dir = root.join(&config.serve.cache_dir);
    if cache_dir.exists() {
        std::fs::remove_dir_all(&cache_dir)?;
    }
    if !cli.quiet {
        eprintln!("removed {}", cache_dir.display());
    }
    Ok(())
}
