use super::{BuildOutput, ChunkId, ExportsGraph, ExportsValue, ProvidedExports, UsedExports};
use serde::Deserialize;

/// Build result where every chunk inlines its modules and their export metadata
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyBuild {
    #[serde(flatten)]
    pub output: BuildOutput,

    #[serde(default)]
    pub chunks: Vec<LegacyChunk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyChunk {
    pub id: Option<ChunkId>,

    #[serde(default)]
    pub modules: Vec<LegacyModule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyModule {
    pub resource: Option<String>,

    pub provided_exports: Option<ExportsValue>,

    pub build_meta: Option<BuildMeta>,

    pub used_exports: Option<ExportsValue>,
}

/// Parser-level metadata; older builds only record provided exports here
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildMeta {
    pub provided_exports: Option<ExportsValue>,
}

impl ExportsGraph for LegacyBuild {
    type Chunk = LegacyChunk;
    type Module = LegacyModule;

    fn chunks(&self) -> &[LegacyChunk] {
        &self.chunks
    }

    fn modules_of<'a>(&'a self, chunk: &'a LegacyChunk) -> Vec<&'a LegacyModule> {
        chunk.modules.iter().collect()
    }

    fn resource<'a>(&self, module: &'a LegacyModule) -> Option<&'a str> {
        module.resource.as_deref()
    }

    fn provided_exports(&self, module: &LegacyModule) -> ProvidedExports {
        let declared = match module.provided_exports.as_ref() {
            Some(ExportsValue::Flag(false)) | None => {
                module.build_meta.as_ref().and_then(|meta| meta.provided_exports.as_ref())
            }
            declared => declared,
        };
        ProvidedExports::from_value(declared)
    }

    fn used_exports(&self, module: &LegacyModule, _chunk: &LegacyChunk) -> UsedExports {
        UsedExports::from_value(module.used_exports.as_ref())
    }
}
