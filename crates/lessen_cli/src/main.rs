//! Lessen CLI — one-shot stylesheet builds and cache maintenance.
//!
//! Provides `lessen build` to run the transformation pipeline against a
//! configured stylesheet root and `lessen clean` to drop the disk cache.

#![warn(missing_docs)]

mod build;
mod clean;
mod project;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Lessen — a caching LESS/CSS transformation pipeline.
#[derive(Parser, Debug)]
#[command(name = "lessen", version, about = "Lessen stylesheet pipeline")]
pub struct Cli {
    /// Suppress warnings and notes; only errors are printed.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print notes in addition to warnings.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `lessen.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Transform one stylesheet and print or write the result.
    Build(BuildArgs),
    /// Delete the disk cache directory.
    Clean,
}

/// Arguments for the `lessen build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Stylesheet path relative to the configured serve root.
    pub path: String,

    /// Write the result to a file instead of standard output.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Diagnostic output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// One human-readable line per diagnostic.
    Text,
    /// A JSON array for machine consumption.
    Json,
}

fn main() {
    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Build(args) => build::run(&cli, args),
        Command::Clean => clean::run(&cli),
    };
    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
