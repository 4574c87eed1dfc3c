//! The `lessen build` subcommand.

use crate::{project, BuildArgs, Cli, ReportFormat};
use lessen_diagnostics::{DiagnosticRenderer, JsonRenderer, Severity, TextRenderer};
use lessen_pipeline::{Outcome, Service};

/// Runs the pipeline once for the requested stylesheet.
pub fn run(cli: &Cli, args: &BuildArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (root, config) = project::resolve(cli.config.as_deref())?;
    let service = Service::from_config(&config, &root);

    let result = service.process(&args.path, None);
    report(cli, args.format, &service);
    let outcome = result?;

    let content = match outcome {
        Outcome::Success { content, .. } => content,
        // `build` never sends a conditional date, so this cannot happen;
        // treat it as empty output rather than panicking.
        Outcome::NotModified => String::new(),
    };

    match &args.output {
        Some(path) => std::fs::write(path, content)?,
        None => println!("{content}"),
    }
    Ok(())
}

fn report(cli: &Cli, format: ReportFormat, service: &Service) {
    if cli.quiet {
        return;
    }
    let diagnostics: Vec<_> = service
        .take_diagnostics()
        .into_iter()
        .filter(|d| d.severity >= Severity::Warning || cli.verbose)
        .collect();
    if diagnostics.is_empty() {
        return;
    }
    let rendered = match format {
        ReportFormat::Text => TextRenderer.render(&diagnostics),
        ReportFormat::Json => JsonRenderer.render(&diagnostics),
    };
    eprint!("{rendered}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(config: &str) -> Cli {
        Cli::parse_from(["lessen", "--config", config, "build", "x.css"])
    }

    #[test]
    fn builds_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lessen.toml"), "[serve]\nroot = \"styles\"\n").unwrap();
        std::fs::create_dir_all(dir.path().join("styles")).unwrap();
        std::fs::write(dir.path().join("styles/x.css"), "p { color: blue; }\n").unwrap();

        let out_path = dir.path().join("out.css");
        let config_path = dir.path().join("lessen.toml");
        let cli = Cli::parse_from([
            "lessen",
            "--config",
            config_path.to_str().unwrap(),
            "build",
            "x.css",
            "--output",
            out_path.to_str().unwrap(),
        ]);
        let args = match &cli.command {
            crate::Command::Build(args) => args,
            _ => unreachable!(),
        };
        run(&cli, args).unwrap();

        let written = std::fs::read_to_string(out_path).unwrap();
        assert_eq!(written, "#x.css_1,p{color:blue}");
    }

    #[test]
    fn missing_stylesheet_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lessen.toml"), "[serve]\nroot = \"styles\"\n").unwrap();
        std::fs::create_dir_all(dir.path().join("styles")).unwrap();
        std::fs::write(dir.path().join("styles/other.css"), "p { x: 1; }\n").unwrap();

        let config_path = dir.path().join("lessen.toml");
        let cli = cli(config_path.to_str().unwrap());
        let args = match &cli.command {
            crate::Command::Build(args) => args,
            _ => unreachable!(),
        };
        assert!(run(&cli, args).is_err());
    }
}
