use crate::detect::UnusedExportMap;
use crate::types::{ScrappedConfig, ScrappedError};
use owo_colors::{OwoColorize, Style};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Exit status requested when findings exist and failing on them is enabled
pub const FINDINGS_EXIT_CODE: i32 = 2;

const CAUTION: &str = "Please be careful if you want to remove them (¬º-°)¬.";

/// Result of one analysis pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Findings {
    pub unused_files: Vec<String>,
    pub unused_exports: UnusedExportMap,
}

impl Findings {
    pub fn new(unused_files: Vec<String>, unused_exports: UnusedExportMap) -> Self {
        Self { unused_files, unused_exports }
    }

    pub fn is_empty(&self) -> bool {
        self.unused_files.is_empty() && self.unused_exports.is_empty()
    }

    /// Total number of unused export names across all files
    pub fn unused_export_count(&self) -> usize {
        self.unused_exports.values().map(Vec::len).sum()
    }

    pub fn should_fail(&self, fail_on_hint: bool) -> bool {
        fail_on_hint && !self.is_empty()
    }

    pub fn exit_code(&self, fail_on_hint: bool) -> i32 {
        if self.should_fail(fail_on_hint) {
            FINDINGS_EXIT_CODE
        } else {
            0
        }
    }
}

struct Palette {
    colored: bool,
}

impl Palette {
    fn paint(&self, text: &str, style: Style) -> String {
        if self.colored {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn header(&self, text: &str) -> String {
        self.paint(text, Style::new().yellow().bold())
    }

    fn item(&self, text: &str) -> String {
        self.paint(text, Style::new().yellow())
    }

    fn caution(&self) -> String {
        self.paint(CAUTION, Style::new().red().bold())
    }
}

/// Console text for unused files; empty when there are none
pub fn render_unused_files(unused_files: &[String], colored: bool) -> String {
    if unused_files.is_empty() {
        return String::new();
    }
    let palette = Palette { colored };

    let mut out = format!(
        "\n{} {}",
        palette.header("Warning:"),
        palette.item(&format!("There are {} unused files:", unused_files.len()))
    );
    for (index, file) in unused_files.iter().enumerate() {
        let _ = write!(out, "\n{}. {}", index + 1, palette.item(file));
    }
    let _ = writeln!(out, "\n{}", palette.caution());
    out
}

/// Console text for unused exports; empty when there are none
pub fn render_unused_exports(unused_exports: &UnusedExportMap, colored: bool) -> String {
    if unused_exports.is_empty() {
        return String::new();
    }
    let palette = Palette { colored };
    let total: usize = unused_exports.values().map(Vec::len).sum();

    let mut out = format!(
        "\n{} {}",
        palette.header("Warning:"),
        palette.item(&format!(
            "There are {total} unused exports in {} files:",
            unused_exports.len()
        ))
    );
    for (index, (file, exports)) in unused_exports.iter().enumerate() {
        let _ = write!(
            out,
            "\n{}. {}\n    >>>  {}",
            index + 1,
            palette.item(file),
            palette.item(&exports.join(",  "))
        );
    }
    let _ = writeln!(out, "\n{}", palette.caution());
    out
}

pub fn report_text(findings: &Findings, colored: bool) {
    print!("{}", render_unused_files(&findings.unused_files, colored));
    print!("{}", render_unused_exports(&findings.unused_exports, colored));
}

pub fn report_json(findings: &Findings) -> Result<(), ScrappedError> {
    let json = serde_json::to_string_pretty(findings).map_err(ScrappedError::Serialize)?;
    println!("{json}");
    Ok(())
}

const HTML_STYLE: &str = r#"
    h3 {
      font-weight: 400;
      color: #1f2f3d;
      margin-left: 15px;
    }
    ul {
      list-style: none;
      padding: 0;
    }
    .file li {
      height: 50px;
      line-height: 50px;
      margin: 10px;
      background: #e8f3fe;
      padding: 0 8px;
      color: #7dbcfc;
    }
    .card {
      box-shadow: 0 2px 12px 0 rgba(0, 0, 0, .1);
      border-radius: 4px;
      border: 1px solid #ebeef5;
      margin-bottom: 8px;
    }
    .card__header {
      padding: 18px 20px;
      border-bottom: 1px solid #ebeef5;
      box-sizing: border-box;
    }
    .card__body {
      font-size: 14px;
      padding: 20px;
      border-radius: 4px;
      border: 1px solid #ebeef5;
      overflow: hidden;
      color: #303133;
    }
    .card__body > div {
      margin-bottom: 18px;
    }
"#;

/// Static HTML report. Paths and export names are inserted verbatim.
pub fn render_html(findings: &Findings) -> String {
    let files: String = findings
        .unused_files
        .iter()
        .enumerate()
        .map(|(index, file)| format!("<li>({index}): <span>{file}</span></li>"))
        .collect();

    let cards: String = findings
        .unused_exports
        .iter()
        .map(|(file, exports)| {
            let names: String =
                exports.iter().map(|name| format!("<div>{name}</div>")).collect();
            format!(
                "<li class=\"card\"><div class=\"card__header\">{file}</div>\n      \
                 <div class=\"card__body\">\n      {names}\n      </div>\n    </li>"
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Unused code report</title>
  <style>{HTML_STYLE}  </style>
</head>
<body>
<h3>Unused files in project: {count}</h3>
<ul class="file">
  {files}
</ul>
<h3>Unused exports in project</h3>
<ul class="code">
  {cards}
</ul>
</body>
</html>
"#,
        count = findings.unused_files.len(),
    )
}

/// Write the HTML report, replacing any previous one
pub fn write_html(findings: &Findings, path: &Path) -> Result<(), ScrappedError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ScrappedError::io(parent, e))?;
    }
    std::fs::write(path, render_html(findings)).map_err(|e| ScrappedError::io(path, e))?;
    tracing::debug!(path = %path.display(), "wrote html report");
    Ok(())
}

/// Run the report sinks the configuration enables
pub fn emit(config: &ScrappedConfig, findings: &Findings, colored: bool) -> Result<(), ScrappedError> {
    if config.log {
        report_text(findings, colored);
    }
    if let Some(path) = &config.export_html {
        write_html(findings, path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn findings() -> Findings {
        let mut unused_exports = UnusedExportMap::default();
        unused_exports.insert("/proj/a.js".to_string(), vec!["b".to_string(), "c".to_string()]);
        unused_exports.insert("/proj/d.js".to_string(), vec!["e".to_string()]);
        Findings::new(vec!["/proj/x.js".to_string(), "/proj/y.css".to_string()], unused_exports)
    }

    #[test]
    fn test_exit_code_policy() {
        let empty = Findings::default();
        assert_eq!(empty.exit_code(true), 0);
        assert_eq!(empty.exit_code(false), 0);

        let found = findings();
        assert_eq!(found.exit_code(true), FINDINGS_EXIT_CODE);
        assert_eq!(found.exit_code(false), 0);

        let only_exports = Findings::new(Vec::new(), findings().unused_exports);
        assert!(only_exports.should_fail(true));
    }

    #[test]
    fn test_unused_export_count() {
        assert_eq!(findings().unused_export_count(), 3);
        assert_eq!(Findings::default().unused_export_count(), 0);
    }

    #[test]
    fn test_render_unused_files() {
        let text = render_unused_files(&findings().unused_files, false);
        assert_eq!(
            text,
            format!("\nWarning: There are 2 unused files:\n1. /proj/x.js\n2. /proj/y.css\n{CAUTION}\n")
        );
        assert!(render_unused_files(&[], false).is_empty());
    }

    #[test]
    fn test_render_unused_exports() {
        let text = render_unused_exports(&findings().unused_exports, false);
        assert!(text.contains("There are 3 unused exports in 2 files:"));
        assert!(text.contains("\n1. /proj/a.js\n    >>>  b,  c"));
        assert!(text.contains("\n2. /proj/d.js\n    >>>  e"));
        assert!(text.ends_with(&format!("{CAUTION}\n")));
        assert!(render_unused_exports(&UnusedExportMap::default(), false).is_empty());
    }

    #[test]
    fn test_colored_output_contains_ansi() {
        let text = render_unused_files(&findings().unused_files, true);
        assert!(text.contains("\u{1b}["));
        assert!(text.contains("/proj/x.js"));
    }

    #[test]
    fn test_render_html() {
        let html = render_html(&findings());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h3>Unused files in project: 2</h3>"));
        assert!(html.contains("<li>(0): <span>/proj/x.js</span></li>"));
        assert!(html.contains("<li>(1): <span>/proj/y.css</span></li>"));
        assert!(html.contains("<div class=\"card__header\">/proj/a.js</div>"));
        assert!(html.contains("<div>b</div><div>c</div>"));
        assert_eq!(html.matches("class=\"card\"").count(), 2);
    }

    #[test]
    fn test_write_html_replaces_previous_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports/scrappedCode.html");

        write_html(&findings(), &path).unwrap();
        write_html(&Findings::default(), &path).unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("Unused files in project: 0"));
        assert!(!html.contains("/proj/x.js"));
    }

    #[test]
    fn test_emit_writes_html_only_when_enabled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.html");

        let enabled = ScrappedConfig { export_html: Some(path.clone()), ..Default::default() };
        emit(&enabled, &findings(), false).unwrap();
        assert!(path.is_file());

        std::fs::remove_file(&path).unwrap();
        let disabled = ScrappedConfig { export_html: None, ..Default::default() };
        emit(&disabled, &findings(), false).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_write_html_failure_is_io_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("taken");
        std::fs::write(&blocker, "").unwrap();

        let result = write_html(&findings(), &blocker.join("report.html"));
        assert!(matches!(result, Err(ScrappedError::Io { .. })));
    }

    #[test]
    fn test_findings_json_shape() {
        let json = serde_json::to_value(findings()).unwrap();
        assert_eq!(json["unusedFiles"][1], "/proj/y.css");
        assert_eq!(json["unusedExports"]["/proj/a.js"][0], "b");
    }
}
