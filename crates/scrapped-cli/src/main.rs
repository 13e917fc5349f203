use clap::Parser;
use std::path::Path;

use scrapped::cli::{Cli, OutputFormat};
use scrapped::logger::{init_logger, should_color};
use scrapped::reporter::{emit, report_json};
use scrapped::{BuildResult, FileConfig, ScrappedConfig, ScrappedError, analyze};

/// Load the explicit config file, or the default one from the context directory
fn load_file_config(cli: &Cli) -> Result<Option<FileConfig>, ScrappedError> {
    if let Some(config_path) = &cli.config {
        if !config_path.exists() {
            return Err(ScrappedError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }
        return FileConfig::load(config_path).map(Some);
    }

    let Some(path) = FileConfig::find_default(&cli.config_dir()) else {
        return Ok(None);
    };
    match FileConfig::load(&path) {
        Ok(config) => Ok(Some(config)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            Ok(None)
        }
    }
}

fn load_build_result(path: &Path) -> Result<BuildResult, ScrappedError> {
    if path.as_os_str() == "-" {
        BuildResult::from_reader(std::io::stdin().lock())
    } else {
        BuildResult::from_path(path)
    }
}

fn run(cli: &Cli) -> Result<i32, ScrappedError> {
    let config: ScrappedConfig = cli.merge(load_file_config(cli)?);
    let build = load_build_result(&cli.build_result)?;

    let findings = analyze(&config, &build)?;
    tracing::debug!(
        unused_files = findings.unused_files.len(),
        unused_exports = findings.unused_export_count(),
        "analysis finished"
    );

    match cli.format {
        OutputFormat::Text => emit(&config, &findings, should_color(cli.no_color))?,
        OutputFormat::Json => {
            // stdout carries the JSON document only
            emit(&ScrappedConfig { log: false, ..config.clone() }, &findings, false)?;
            report_json(&findings)?;
        }
    }

    Ok(findings.exit_code(config.fail_on_hint))
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.no_color);

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
