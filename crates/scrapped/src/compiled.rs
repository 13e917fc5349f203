use crate::build::BuildResult;
use crate::path::{is_vendored, to_unix_path};
use path_clean::PathClean;
use rustc_hash::FxHashSet;
use std::path::Path;

/// Every file the build consulted or emitted, as canonical paths.
///
/// Union of the build's file dependencies and its emitted assets joined onto the
/// resolved output directory. Vendored paths are left out.
pub fn compiled_files(build: &BuildResult) -> FxHashSet<String> {
    let output = build.output();
    let output_path = output.resolved_output_path();

    let emitted = output.assets.iter().map(|asset| match output_path.as_deref() {
        Some(dir) => Path::new(dir).join(&asset.name).clean().to_string_lossy().into_owned(),
        None => asset.name.clone(),
    });

    let files: FxHashSet<String> = output
        .file_dependencies
        .iter()
        .cloned()
        .chain(emitted)
        .filter(|file| !file.is_empty())
        .map(|file| to_unix_path(&file))
        .filter(|file| !is_vendored(file))
        .collect();

    tracing::debug!(
        dependencies = output.file_dependencies.len(),
        assets = output.assets.len(),
        compiled = files.len(),
        "collected compiled resources"
    );
    files
}
