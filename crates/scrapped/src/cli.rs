use crate::types::{FileConfig, ScrappedConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scrapped")]
#[command(about = "Find project files and exports a bundler build never used")]
pub struct Cli {
    /// Build result JSON exported by the bundler, or `-` to read stdin
    pub build_result: PathBuf,

    /// Path to config file (scrapped.json or scrapped.jsonc)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Files considered part of the project (glob patterns) [default: **/*.*]
    #[arg(short = 'p', long = "pattern")]
    pub patterns: Vec<String>,

    /// Patterns subtracted from the project files
    #[arg(short = 'x', long)]
    pub exclude: Vec<String>,

    /// Directory patterns are resolved against [default: .]
    #[arg(short = 'C', long)]
    pub context: Option<PathBuf>,

    /// Exit with status 2 when anything unused is found
    #[arg(long, overrides_with = "no_fail_on_hint")]
    pub fail_on_hint: bool,

    /// Exit with status 0 even when something unused is found
    #[arg(long, overrides_with = "fail_on_hint")]
    pub no_fail_on_hint: bool,

    /// Skip unused file detection
    #[arg(long)]
    pub no_unused_files: bool,

    /// Skip unused export detection
    #[arg(long)]
    pub no_unused_export: bool,

    /// Write the HTML report to this path [default: ./scrappedCode.html]
    #[arg(long, value_name = "PATH", conflicts_with = "no_html")]
    pub html: Option<PathBuf>,

    /// Do not write the HTML report
    #[arg(long)]
    pub no_html: bool,

    /// Print the findings to the console
    #[arg(long, overrides_with = "no_log")]
    pub log: bool,

    /// Do not print the findings to the console
    #[arg(long, overrides_with = "log")]
    pub no_log: bool,

    /// Output format for the console report
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug diagnostics on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    /// Directory searched for a default config file
    pub fn config_dir(&self) -> PathBuf {
        self.context.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Merge config: CLI args override file config, which overrides defaults
    pub fn merge(&self, file_config: Option<FileConfig>) -> ScrappedConfig {
        let mut config = file_config.map(FileConfig::into_config).unwrap_or_default();

        if !self.patterns.is_empty() {
            config.patterns = self.patterns.clone();
        }
        if !self.exclude.is_empty() {
            config.exclude = self.exclude.clone();
        }
        if let Some(context) = &self.context {
            config.context = context.clone();
        }
        if self.fail_on_hint {
            config.fail_on_hint = true;
        } else if self.no_fail_on_hint {
            config.fail_on_hint = false;
        }
        if self.no_unused_files {
            config.detect_unused_files = false;
        }
        if self.no_unused_export {
            config.detect_unused_export = false;
        }
        if self.no_html {
            config.export_html = None;
        } else if let Some(html) = &self.html {
            config.export_html = Some(html.clone());
        }
        if self.log {
            config.log = true;
        } else if self.no_log {
            config.log = false;
        }

        config
    }
}
