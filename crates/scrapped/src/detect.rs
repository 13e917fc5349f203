use crate::build::{BuildResult, ExportsGraph, ProvidedExports, UsedExports};
use crate::path::{is_vendored, to_unix_path};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// Module path to its provided exports that nothing uses, in discovery order
pub type UnusedExportMap = IndexMap<String, Vec<String>>;

/// Candidates the build never touched, in candidate order
pub fn find_unused_files(candidates: &[String], compiled: &FxHashSet<String>) -> Vec<String> {
    candidates.iter().filter(|file| !compiled.contains(*file)).cloned().collect()
}

/// Unused exports of every compiled module that is also a project file.
///
/// A module appearing in several chunks keeps the first position it was found
/// at and the result of the last chunk that reported anything for it.
pub fn find_unused_exports<G: ExportsGraph>(
    graph: &G,
    included: &FxHashSet<String>,
) -> UnusedExportMap {
    let mut unused_exports = UnusedExportMap::default();

    for chunk in graph.chunks() {
        for module in graph.modules_of(chunk) {
            if let Some((path, exports)) = unused_exports_of(graph, chunk, module, included) {
                unused_exports.insert(path, exports);
            }
        }
    }

    tracing::debug!(files = unused_exports.len(), "detected unused exports");
    unused_exports
}

/// Dispatch on the build shape
pub fn find_unused_exports_in(build: &BuildResult, included: &FxHashSet<String>) -> UnusedExportMap {
    match build {
        BuildResult::Legacy(graph) => find_unused_exports(graph, included),
        BuildResult::Current(graph) => find_unused_exports(graph, included),
    }
}

fn unused_exports_of<G: ExportsGraph>(
    graph: &G,
    chunk: &G::Chunk,
    module: &G::Module,
    included: &FxHashSet<String>,
) -> Option<(String, Vec<String>)> {
    let path = to_unix_path(graph.resource(module)?);
    if is_vendored(&path) || !included.contains(&path) {
        return None;
    }

    let ProvidedExports::Names(provided) = graph.provided_exports(module) else {
        return None;
    };

    let unused = match graph.used_exports(module, chunk) {
        UsedExports::All => return None,
        UsedExports::NoneUsed => provided,
        UsedExports::Names(used) => {
            provided.into_iter().filter(|name| !used.contains(name)).collect()
        }
    };

    (!unused.is_empty()).then_some((path, unused))
}
