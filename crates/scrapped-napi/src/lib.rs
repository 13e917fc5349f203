use napi::bindgen_prelude::*;
use napi_derive::napi;
use scrapped::logger::should_color;
use scrapped::{BuildResult, ExportHtml, Findings, ScrappedConfig, run};
use std::path::PathBuf;

/// Options for analyzing a finished build
#[napi(object)]
pub struct AnalyzeOptions {
    /// Files considered part of the project (glob patterns)
    pub patterns: Option<Vec<String>>,

    /// Patterns subtracted from `patterns`
    pub exclude: Option<Vec<String>>,

    /// Directory patterns are resolved against (defaults to current directory)
    pub context: Option<String>,

    /// Set `shouldFail` when anything unused is found
    pub fail_on_hint: Option<bool>,

    pub detect_unused_files: Option<bool>,

    pub detect_unused_export: Option<bool>,

    /// `false` disables the HTML report, `true` writes it to `output`, a string is the report path
    pub export_html: Option<Either<bool, String>>,

    /// Report path used when `exportHtml` is `true` (defaults to ./scrappedCode.html)
    pub output: Option<String>,

    /// Print the findings to the console
    pub log: Option<bool>,
}

#[napi(object)]
pub struct UnusedExportEntry {
    pub file: String,
    pub exports: Vec<String>,
}

/// Findings of one analysis pass
#[napi(object)]
pub struct AnalyzeReport {
    pub unused_files: Vec<String>,

    pub unused_exports: Vec<UnusedExportEntry>,

    pub unused_export_count: u32,

    /// Whether the caller should exit with status 2
    pub should_fail: bool,
}

impl From<AnalyzeOptions> for ScrappedConfig {
    fn from(opts: AnalyzeOptions) -> Self {
        let defaults = ScrappedConfig::default();
        ScrappedConfig {
            patterns: opts.patterns.unwrap_or(defaults.patterns),
            exclude: opts.exclude.unwrap_or_default(),
            context: opts.context.map(PathBuf::from).unwrap_or(defaults.context),
            fail_on_hint: opts.fail_on_hint.unwrap_or(defaults.fail_on_hint),
            detect_unused_files: opts.detect_unused_files.unwrap_or(defaults.detect_unused_files),
            detect_unused_export: opts
                .detect_unused_export
                .unwrap_or(defaults.detect_unused_export),
            export_html: ExportHtml::resolve(
                opts.export_html.map(|value| match value {
                    Either::A(enabled) => ExportHtml::Enabled(enabled),
                    Either::B(path) => ExportHtml::Path(PathBuf::from(path)),
                }),
                opts.output.map(PathBuf::from),
            ),
            log: opts.log.unwrap_or(defaults.log),
        }
    }
}

fn to_report(findings: Findings, fail_on_hint: bool) -> AnalyzeReport {
    let should_fail = findings.should_fail(fail_on_hint);
    let unused_export_count = findings.unused_export_count() as u32;

    AnalyzeReport {
        unused_files: findings.unused_files,
        unused_exports: findings
            .unused_exports
            .into_iter()
            .map(|(file, exports)| UnusedExportEntry { file, exports })
            .collect(),
        unused_export_count,
        should_fail,
    }
}

fn analyze_build(options: AnalyzeOptions, build_result: &str) -> Result<AnalyzeReport> {
    let config: ScrappedConfig = options.into();
    let build =
        BuildResult::from_json(build_result).map_err(|e| Error::from_reason(e.to_string()))?;
    let findings = run(&config, &build, should_color(false))
        .map_err(|e| Error::from_reason(e.to_string()))?;

    Ok(to_report(findings, config.fail_on_hint))
}

/// Analyze a serialized build result (async)
///
/// @param options - Configuration options
/// @param buildResult - JSON produced by the bundler's after-emit hook
/// @returns Promise with the findings
#[napi]
pub async fn analyze(options: AnalyzeOptions, build_result: String) -> Result<AnalyzeReport> {
    // Run file system work in blocking thread pool
    tokio::task::spawn_blocking(move || analyze_build(options, &build_result))
        .await
        .map_err(|e| Error::from_reason(format!("Task panicked: {e}")))?
}

/// Analyze a serialized build result (sync)
///
/// @param options - Configuration options
/// @param buildResult - JSON produced by the bundler's after-emit hook
/// @returns The findings
#[napi]
pub fn analyze_sync(options: AnalyzeOptions, build_result: String) -> Result<AnalyzeReport> {
    analyze_build(options, &build_result)
}
