use crate::types::VENDOR_DIR;
use path_clean::PathClean;
use std::path::Path;

/// Convert a platform path to the slash-delimited form used as a key everywhere.
///
/// Every run of backslashes collapses into a single `/`.
pub fn to_unix_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut in_run = false;
    for ch in path.chars() {
        if ch == '\\' {
            if !in_run {
                out.push('/');
            }
            in_run = true;
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out
}

/// Whether a canonical path lies under a vendored-dependency directory
pub fn is_vendored(path: &str) -> bool {
    path.split('/').any(|segment| segment == VENDOR_DIR)
}

/// Resolve a glob pattern against the context directory.
///
/// Absolute patterns are kept as is; `.` and `..` segments are folded lexically.
pub fn resolve_pattern(context: &Path, pattern: &str) -> String {
    let pattern = to_unix_path(pattern);
    let resolved = context.join(pattern).clean();
    to_unix_path(&resolved.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backslash_runs_collapse() {
        assert_eq!(to_unix_path(r"C:\\proj\src\\\a.js"), "C:/proj/src/a.js");
        assert_eq!(to_unix_path("/proj/src/a.js"), "/proj/src/a.js");
        assert_eq!(to_unix_path(""), "");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for input in [r"a\\b\c", r"\\server\share\x.ts", "plain/path", r"mixed\/sep"] {
            let once = to_unix_path(input);
            assert_eq!(to_unix_path(&once), once);
        }
    }

    #[test]
    fn test_is_vendored_matches_whole_segment() {
        assert!(is_vendored("/proj/node_modules/lodash/index.js"));
        assert!(is_vendored("node_modules/a.js"));
        assert!(!is_vendored("/proj/src/node_modules_shim.js"));
        assert!(!is_vendored("/proj/src/a.js"));
    }

    #[test]
    fn test_resolve_pattern_against_context() {
        let context = Path::new("/proj/app");
        assert_eq!(resolve_pattern(context, "src/**/*.js"), "/proj/app/src/**/*.js");
        assert_eq!(resolve_pattern(context, "./src/*.ts"), "/proj/app/src/*.ts");
        assert_eq!(resolve_pattern(context, "../shared/**/*.*"), "/proj/shared/**/*.*");
        assert_eq!(resolve_pattern(context, "/abs/**/*.js"), "/abs/**/*.js");
    }
}
