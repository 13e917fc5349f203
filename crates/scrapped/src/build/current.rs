use super::{BuildOutput, ChunkId, ExportsGraph, ExportsValue, ProvidedExports, UsedExports};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Build result carrying a chunk graph with a separate module graph
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentBuild {
    #[serde(flatten)]
    pub output: BuildOutput,

    #[serde(default)]
    pub chunks: Vec<CurrentChunk>,

    pub chunk_graph: ChunkGraph,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentChunk {
    pub id: Option<ChunkId>,

    /// Runtime(s) the chunk is loaded in
    pub runtime: Option<RuntimeSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RuntimeSpec {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkGraph {
    /// Chunk id to the ids of the modules it contains
    #[serde(default)]
    pub chunk_modules: FxHashMap<String, Vec<String>>,

    /// Module id to module
    #[serde(default)]
    pub module_graph: FxHashMap<String, CurrentModule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentModule {
    pub resource: Option<String>,

    pub provided_exports: Option<ExportsValue>,

    pub used_exports: Option<RuntimeUsage>,
}

/// Export usage, either shared by every runtime or recorded per runtime
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RuntimeUsage {
    Shared(ExportsValue),
    PerRuntime(IndexMap<String, Option<ExportsValue>>),
}

impl ExportsGraph for CurrentBuild {
    type Chunk = CurrentChunk;
    type Module = CurrentModule;

    fn chunks(&self) -> &[CurrentChunk] {
        &self.chunks
    }

    fn modules_of<'a>(&'a self, chunk: &'a CurrentChunk) -> Vec<&'a CurrentModule> {
        let Some(id) = chunk.id.as_ref() else {
            return Vec::new();
        };
        let Some(module_ids) = self.chunk_graph.chunk_modules.get(&id.to_string()) else {
            return Vec::new();
        };

        module_ids
            .iter()
            .filter_map(|module_id| {
                let module = self.chunk_graph.module_graph.get(module_id);
                if module.is_none() {
                    tracing::warn!(chunk = %id, module = %module_id, "chunk references unknown module");
                }
                module
            })
            .collect()
    }

    fn resource<'a>(&self, module: &'a CurrentModule) -> Option<&'a str> {
        module.resource.as_deref()
    }

    fn provided_exports(&self, module: &CurrentModule) -> ProvidedExports {
        ProvidedExports::from_value(module.provided_exports.as_ref())
    }

    fn used_exports(&self, module: &CurrentModule, chunk: &CurrentChunk) -> UsedExports {
        let per_runtime = match module.used_exports.as_ref() {
            None => return UsedExports::NoneUsed,
            Some(RuntimeUsage::Shared(value)) => return UsedExports::from_value(Some(value)),
            Some(RuntimeUsage::PerRuntime(per_runtime)) => per_runtime,
        };

        let lookup = |runtime: &str| {
            UsedExports::from_value(per_runtime.get(runtime).and_then(Option::as_ref))
        };

        match chunk.runtime.as_ref() {
            Some(RuntimeSpec::Single(runtime)) => lookup(runtime),
            Some(RuntimeSpec::Multiple(runtimes)) => {
                UsedExports::merge(runtimes.iter().map(|runtime| lookup(runtime)))
            }
            None => UsedExports::merge(
                per_runtime.values().map(|value| UsedExports::from_value(value.as_ref())),
            ),
        }
    }
}
