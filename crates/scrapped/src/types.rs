use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory segment holding third-party code; never analyzed
pub const VENDOR_DIR: &str = "node_modules";

/// Default report location, relative to the process working directory
pub const DEFAULT_HTML_OUTPUT: &str = "./scrappedCode.html";

pub const DEFAULT_PATTERNS: &[&str] = &["**/*.*"];

/// Config file names looked up in the context directory, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["scrapped.json", "scrapped.jsonc"];

/// Configuration for one analysis pass
#[derive(Debug, Clone)]
pub struct ScrappedConfig {
    /// Glob patterns for files considered part of the project
    pub patterns: Vec<String>,

    /// Glob patterns subtracted from `patterns`
    pub exclude: Vec<String>,

    /// Base directory patterns are resolved against
    pub context: PathBuf,

    /// Ask the caller to exit with status 2 when anything is found
    pub fail_on_hint: bool,

    pub detect_unused_files: bool,

    pub detect_unused_export: bool,

    /// Where to write the HTML report, `None` disables it
    pub export_html: Option<PathBuf>,

    /// Print the console report
    pub log: bool,
}

impl Default for ScrappedConfig {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect(),
            exclude: Vec::new(),
            context: PathBuf::from("."),
            fail_on_hint: false,
            detect_unused_files: true,
            detect_unused_export: true,
            export_html: Some(PathBuf::from(DEFAULT_HTML_OUTPUT)),
            log: false,
        }
    }
}

/// Error types for scrapped operations
#[derive(Error, Debug)]
pub enum ScrappedError {
    #[error("Invalid context directory {}: {source}", .path.display())]
    InvalidContext {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error("Invalid build result: {0}")]
    BuildResult(#[from] serde_json::Error),

    #[error("Failed to serialize findings: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),
}

impl ScrappedError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// `exportHtml` accepts either a toggle or a report path
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ExportHtml {
    Enabled(bool),
    Path(PathBuf),
}

impl ExportHtml {
    /// Report path for an `exportHtml` setting: `false` disables the report,
    /// `true` or unset falls back to `output`, then the default location
    pub fn resolve(setting: Option<Self>, output: Option<PathBuf>) -> Option<PathBuf> {
        match setting {
            Some(Self::Enabled(false)) => None,
            Some(Self::Path(path)) => Some(path),
            Some(Self::Enabled(true)) | None => {
                Some(output.unwrap_or_else(|| PathBuf::from(DEFAULT_HTML_OUTPUT)))
            }
        }
    }
}

/// Config file structure for scrapped.json / scrapped.jsonc
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    /// An explicit empty list is kept and matches nothing
    pub patterns: Option<Vec<String>>,

    #[serde(default)]
    pub exclude: Vec<String>,

    pub context: Option<PathBuf>,

    pub fail_on_hint: Option<bool>,

    pub detect_unused_files: Option<bool>,

    pub detect_unused_export: Option<bool>,

    pub export_html: Option<ExportHtml>,

    /// Report path used when `exportHtml` is `true`
    pub output: Option<PathBuf>,

    pub log: Option<bool>,
}

impl FileConfig {
    /// Parse a config file, stripping `//` and `/* */` comments first
    pub fn load(path: &Path) -> Result<Self, ScrappedError> {
        let mut content =
            std::fs::read_to_string(path).map_err(|e| ScrappedError::io(path, e))?;
        json_strip_comments::strip(&mut content)
            .map_err(|e| ScrappedError::Config(format!("{}: {e}", path.display())))?;
        let config = serde_json::from_str(&content)
            .map_err(|e| ScrappedError::Config(format!("{}: {e}", path.display())))?;
        Ok(config)
    }

    /// Find the default config file in a directory
    pub fn find_default(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES.iter().map(|name| dir.join(name)).find(|path| path.is_file())
    }

    /// Layer this file over the built-in defaults
    pub fn into_config(self) -> ScrappedConfig {
        let defaults = ScrappedConfig::default();

        ScrappedConfig {
            patterns: self.patterns.unwrap_or(defaults.patterns),
            exclude: self.exclude,
            context: self.context.unwrap_or(defaults.context),
            fail_on_hint: self.fail_on_hint.unwrap_or(defaults.fail_on_hint),
            detect_unused_files: self.detect_unused_files.unwrap_or(defaults.detect_unused_files),
            detect_unused_export: self
                .detect_unused_export
                .unwrap_or(defaults.detect_unused_export),
            export_html: ExportHtml::resolve(self.export_html, self.output),
            log: self.log.unwrap_or(defaults.log),
        }
    }
}
