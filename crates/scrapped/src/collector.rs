use crate::path::{is_vendored, resolve_pattern, to_unix_path};
use crate::types::{ScrappedError, VENDOR_DIR};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// Precompiled glob matchers for efficient file matching
struct CompiledMatchers {
    include: GlobSet,
    exclude: GlobSet,
}

impl CompiledMatchers {
    fn new(include_patterns: &[&str], exclude_patterns: &[&str]) -> Result<Self, ScrappedError> {
        Ok(Self {
            include: compile_globset(include_patterns)?,
            exclude: compile_globset(exclude_patterns)?,
        })
    }
}

/// Compile a list of glob patterns into a GlobSet.
///
/// `/` is a literal separator: `*` stays inside one directory, `**` spans many.
fn compile_globset(patterns: &[&str]) -> Result<GlobSet, ScrappedError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(GlobBuilder::new(pattern).literal_separator(true).build()?);
    }
    Ok(builder.build()?)
}

/// Resolve include and exclude patterns against the context.
///
/// Exclude patterns come back negated (`!` prefix) after the includes.
pub fn resolve_patterns(context: &Path, patterns: &[String], exclude: &[String]) -> Vec<String> {
    patterns
        .iter()
        .map(|pattern| match pattern.strip_prefix('!') {
            Some(negated) => format!("!{}", resolve_pattern(context, negated)),
            None => resolve_pattern(context, pattern),
        })
        .chain(exclude.iter().map(|pattern| format!("!{}", resolve_pattern(context, pattern))))
        .collect()
}

/// The directory a pattern can match under (its segments up to the first glob)
/// and how deep below it a match can sit.
///
/// A pattern without any glob names a single file, so its parent is used.
/// The depth is unbounded once a `**` segment follows the base.
fn glob_base(pattern: &str) -> (PathBuf, Option<usize>) {
    let segments: Vec<&str> = pattern.split('/').collect();
    let static_len = segments
        .iter()
        .position(|segment| segment.contains(GLOB_META))
        .unwrap_or(segments.len().saturating_sub(1));

    let rest = &segments[static_len..];
    let max_depth = if rest.iter().any(|segment| segment.contains("**")) {
        None
    } else {
        Some(rest.len())
    };

    let base = segments[..static_len].join("/");
    let base = if base.is_empty() { PathBuf::from("/") } else { PathBuf::from(base) };
    (base, max_depth)
}

/// Absolute, existing context directory
fn absolute_context(context: &Path) -> Result<PathBuf, ScrappedError> {
    let invalid = |source| ScrappedError::InvalidContext { path: context.to_path_buf(), source };

    let absolute = if context.is_absolute() {
        context.to_path_buf()
    } else {
        std::env::current_dir().map_err(invalid)?.join(context)
    };

    let metadata = std::fs::metadata(&absolute).map_err(invalid)?;
    if !metadata.is_dir() {
        return Err(invalid(std::io::Error::other("not a directory")));
    }
    Ok(absolute)
}

/// Expands the project's glob patterns into candidate files
pub struct Collector {
    /// Walk roots with their depth limit, `None` for unbounded
    roots: Vec<(PathBuf, Option<usize>)>,
    matchers: CompiledMatchers,
}

impl Collector {
    pub fn new(
        context: &Path,
        patterns: &[String],
        exclude: &[String],
    ) -> Result<Self, ScrappedError> {
        let context = absolute_context(context)?;
        let resolved = resolve_patterns(&context, patterns, exclude);

        let (negated, positive): (Vec<&str>, Vec<&str>) =
            resolved.iter().map(String::as_str).partition(|p| p.starts_with('!'));
        let negated: Vec<&str> = negated.into_iter().map(|p| &p[1..]).collect();

        let mut roots: Vec<(PathBuf, Option<usize>)> = Vec::new();
        for pattern in &positive {
            let (base, depth) = glob_base(pattern);
            match roots.iter_mut().find(|(root, _)| *root == base) {
                Some((_, known)) => {
                    *known = match (*known, depth) {
                        (Some(a), Some(b)) => Some(a.max(b)),
                        _ => None,
                    }
                }
                None => roots.push((base, depth)),
            }
        }

        tracing::debug!(
            context = %context.display(),
            include = ?positive,
            exclude = ?negated,
            "resolved glob patterns"
        );

        Ok(Self { roots, matchers: CompiledMatchers::new(&positive, &negated)? })
    }

    /// Collect matching files as canonical paths, in first-found order
    pub fn collect(&self) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut files = Vec::new();

        for (root, max_depth) in &self.roots {
            if !root.is_dir() {
                tracing::debug!(root = %root.display(), "glob base does not exist, skipping");
                continue;
            }

            // Directories matching an exclude are not read at all
            let exclude = self.matchers.exclude.clone();
            let mut walker_builder = WalkBuilder::new(root);
            walker_builder
                .standard_filters(false)
                .hidden(true)
                .max_depth(*max_depth)
                .sort_by_file_name(|a, b| a.cmp(b))
                .filter_entry(move |entry| {
                    if entry.file_name() == VENDOR_DIR {
                        return false;
                    }
                    let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                    !(is_dir && exclude.is_match(to_unix_path(&entry.path().to_string_lossy())))
                });

            for entry in walker_builder.build().flatten() {
                if !entry.file_type().is_some_and(|t| t.is_file()) {
                    continue;
                }

                let path = to_unix_path(&entry.path().to_string_lossy());
                if is_vendored(&path) {
                    continue;
                }

                if !self.matchers.include.is_match(&path) || self.matchers.exclude.is_match(&path)
                {
                    continue;
                }

                if seen.insert(path.clone()) {
                    files.push(path);
                }
            }
        }

        tracing::debug!(count = files.len(), "collected candidate files");
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::Builder;

    fn project() -> tempfile::TempDir {
        let dir = Builder::new().prefix("scrapped-collector").tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/components")).unwrap();
        fs::create_dir_all(root.join("node_modules/lib")).unwrap();
        fs::write(root.join("src/index.js"), "").unwrap();
        fs::write(root.join("src/util.js"), "").unwrap();
        fs::write(root.join("src/util.test.js"), "").unwrap();
        fs::write(root.join("src/components/button.jsx"), "").unwrap();
        fs::write(root.join("src/.hidden.js"), "").unwrap();
        fs::write(root.join("node_modules/lib/index.js"), "").unwrap();
        fs::write(root.join("README"), "").unwrap();
        dir
    }

    fn relative(dir: &Path, files: &[String]) -> Vec<String> {
        let prefix = format!("{}/", to_unix_path(&dir.to_string_lossy()));
        files.iter().map(|f| f.strip_prefix(&prefix).unwrap_or(f).to_string()).collect()
    }

    #[test]
    fn test_default_pattern_skips_vendored_hidden_and_extensionless() {
        let dir = project();
        let collector = Collector::new(dir.path(), &["**/*.*".to_string()], &[]).unwrap();
        let files = relative(dir.path(), &collector.collect());

        assert_eq!(
            files,
            vec!["src/components/button.jsx", "src/index.js", "src/util.js", "src/util.test.js"]
        );
    }

    #[test]
    fn test_exclude_subtracts_from_includes() {
        let dir = project();
        let collector = Collector::new(
            dir.path(),
            &["src/**/*.js".to_string()],
            &["src/**/*.test.js".to_string()],
        )
        .unwrap();
        let files = relative(dir.path(), &collector.collect());

        assert_eq!(files, vec!["src/index.js", "src/util.js"]);
    }

    #[test]
    fn test_star_does_not_cross_directories() {
        let dir = project();
        let collector = Collector::new(dir.path(), &["src/*.{js,jsx}".to_string()], &[]).unwrap();
        let files = relative(dir.path(), &collector.collect());

        assert!(!files.iter().any(|f| f.contains("components")));
        assert!(files.contains(&"src/index.js".to_string()));
    }

    #[test]
    fn test_overlapping_patterns_yield_each_file_once() {
        let dir = project();
        let collector = Collector::new(
            dir.path(),
            &["src/**/*.js".to_string(), "src/index.js".to_string()],
            &[],
        )
        .unwrap();
        let files = collector.collect();
        let unique: FxHashSet<_> = files.iter().collect();

        assert_eq!(files.len(), unique.len());
    }

    #[test]
    fn test_missing_context_is_error() {
        let dir = project();
        let result = Collector::new(&dir.path().join("nope"), &["**/*".to_string()], &[]);
        assert!(matches!(result, Err(ScrappedError::InvalidContext { .. })));
    }

    #[test]
    fn test_malformed_pattern_is_error() {
        let dir = project();
        let result = Collector::new(dir.path(), &["src/[.js".to_string()], &[]);
        assert!(matches!(result, Err(ScrappedError::Pattern(_))));
    }

    #[test]
    fn test_resolve_patterns_negates_excludes() {
        let patterns = resolve_patterns(
            Path::new("/proj"),
            &["src/**/*.js".to_string()],
            &["src/legacy/**".to_string()],
        );
        assert_eq!(patterns, vec!["/proj/src/**/*.js", "!/proj/src/legacy/**"]);
    }

    #[test]
    fn test_directory_exclude_prunes_its_contents() {
        let dir = project();
        fs::create_dir_all(dir.path().join("src/legacy/deep")).unwrap();
        fs::write(dir.path().join("src/legacy/old.js"), "").unwrap();
        fs::write(dir.path().join("src/legacy/deep/older.js"), "").unwrap();

        let collector =
            Collector::new(dir.path(), &["src/**/*.js".to_string()], &["src/legacy".to_string()])
                .unwrap();
        let files = relative(dir.path(), &collector.collect());

        assert!(!files.iter().any(|f| f.starts_with("src/legacy")));
        assert_eq!(files, vec!["src/index.js", "src/util.js", "src/util.test.js"]);
    }

    #[test]
    fn test_directory_exclude_with_globstar_prefix() {
        let dir = project();
        let collector =
            Collector::new(dir.path(), &["**/*.*".to_string()], &["**/components".to_string()])
                .unwrap();
        let files = relative(dir.path(), &collector.collect());

        assert_eq!(files, vec!["src/index.js", "src/util.js", "src/util.test.js"]);
    }

    #[test]
    fn test_single_level_pattern_stays_at_its_base() {
        let dir = project();
        fs::write(dir.path().join("top.js"), "").unwrap();

        let collector = Collector::new(dir.path(), &["*.js".to_string()], &[]).unwrap();
        let files = relative(dir.path(), &collector.collect());

        assert_eq!(files, vec!["top.js"]);
    }

    #[test]
    fn test_shared_root_keeps_widest_depth() {
        let dir = project();
        let collector = Collector::new(
            dir.path(),
            &["src/*.js".to_string(), "src/**/*.jsx".to_string()],
            &[],
        )
        .unwrap();
        let files = relative(dir.path(), &collector.collect());

        assert_eq!(
            files,
            vec!["src/components/button.jsx", "src/index.js", "src/util.js", "src/util.test.js"]
        );
    }

    #[test]
    fn test_glob_base() {
        assert_eq!(glob_base("/proj/src/**/*.js"), (PathBuf::from("/proj/src"), None));
        assert_eq!(glob_base("/proj/src/index.js"), (PathBuf::from("/proj/src"), Some(1)));
        assert_eq!(glob_base("/proj/*/lib/*.js"), (PathBuf::from("/proj"), Some(3)));
        assert_eq!(glob_base("/**/*.js"), (PathBuf::from("/"), None));
    }
}
