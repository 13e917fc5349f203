pub mod build;
pub mod cli;
pub mod collector;
pub mod compiled;
pub mod detect;
pub mod logger;
pub mod path;
pub mod reporter;
pub mod types;

pub use build::{BuildResult, BuildShape, ExportsGraph, ProvidedExports, UsedExports};
pub use detect::UnusedExportMap;
pub use reporter::{FINDINGS_EXIT_CODE, Findings};
pub use types::{
    DEFAULT_HTML_OUTPUT, DEFAULT_PATTERNS, ExportHtml, FileConfig, ScrappedConfig, ScrappedError,
};

use collector::Collector;
use compiled::compiled_files;
use detect::{find_unused_exports_in, find_unused_files};
use rustc_hash::FxHashSet;

/// Find project files and exports a finished build never used
///
/// # Arguments
/// * `config` - Configuration for the analysis
/// * `build` - The bundler's finished compilation
///
/// # Returns
/// * `Ok(Findings)` - Unused files and unused exports; empty when nothing was found
/// * `Err(ScrappedError)` - Invalid context directory or glob pattern
///
/// Nothing is printed or written; see [`reporter::emit`] for that.
///
/// # Example
/// ```no_run
/// use scrapped::{analyze, BuildResult, ScrappedConfig};
/// use std::path::PathBuf;
///
/// let config = ScrappedConfig {
///     patterns: vec!["src/**/*.js".to_string()],
///     context: PathBuf::from("."),
///     ..Default::default()
/// };
///
/// let build = BuildResult::from_path("build-result.json".as_ref()).unwrap();
/// let findings = analyze(&config, &build).unwrap();
/// println!("Found {} unused files", findings.unused_files.len());
/// ```
pub fn analyze(config: &ScrappedConfig, build: &BuildResult) -> Result<Findings, ScrappedError> {
    let collector = Collector::new(&config.context, &config.patterns, &config.exclude)?;
    let included_files = collector.collect();
    let compiled = compiled_files(build);

    let unused_files = if config.detect_unused_files {
        find_unused_files(&included_files, &compiled)
    } else {
        Vec::new()
    };

    let unused_exports = if config.detect_unused_export {
        let included: FxHashSet<String> = included_files.iter().cloned().collect();
        find_unused_exports_in(build, &included)
    } else {
        UnusedExportMap::default()
    };

    Ok(Findings::new(unused_files, unused_exports))
}

/// Analyze and run the enabled report sinks
pub fn run(
    config: &ScrappedConfig,
    build: &BuildResult,
    colored: bool,
) -> Result<Findings, ScrappedError> {
    let findings = analyze(config, build)?;
    reporter::emit(config, &findings, colored)?;
    Ok(findings)
}
