//! Model of a finished bundler compilation.
//!
//! The bundler hands over its compilation as JSON in one of two shapes. The
//! legacy shape inlines export metadata on every module of every chunk; the
//! current shape carries a `chunkGraph` with a separate module graph and
//! per-runtime usage. Both implement [`ExportsGraph`] so detection code never
//! looks at the raw shape.

mod current;
mod legacy;

pub use current::{ChunkGraph, CurrentBuild, CurrentChunk, CurrentModule, RuntimeSpec, RuntimeUsage};
pub use legacy::{BuildMeta, LegacyBuild, LegacyChunk, LegacyModule};

use crate::types::ScrappedError;
use serde::Deserialize;
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Key whose presence marks the current build shape
const GRAPH_HANDLE: &str = "chunkGraph";

/// Raw export metadata as the bundler serializes it: `true`, `false` or a name list.
///
/// `null` / absent is modelled as `Option::None` at the field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ExportsValue {
    Flag(bool),
    Names(Vec<String>),
}

/// Symbols a module declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvidedExports {
    /// Unknown or dynamic export set; the module cannot be judged
    All,
    Names(Vec<String>),
}

impl ProvidedExports {
    pub fn from_value(value: Option<&ExportsValue>) -> Self {
        match value {
            Some(ExportsValue::Names(names)) => Self::Names(names.clone()),
            Some(ExportsValue::Flag(_)) | None => Self::All,
        }
    }
}

/// Symbols consumers of a module actually reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsedExports {
    /// Every export may be used (namespace access, side effects, unknown)
    All,
    NoneUsed,
    Names(Vec<String>),
}

impl UsedExports {
    pub fn from_value(value: Option<&ExportsValue>) -> Self {
        match value {
            Some(ExportsValue::Flag(true)) => Self::All,
            Some(ExportsValue::Flag(false)) | None => Self::NoneUsed,
            Some(ExportsValue::Names(names)) => Self::Names(names.clone()),
        }
    }

    /// Combine usage across runtimes: any `All` wins, names are unioned in first-seen order
    pub fn merge(values: impl IntoIterator<Item = UsedExports>) -> Self {
        let mut names: Vec<String> = Vec::new();
        for value in values {
            match value {
                Self::All => return Self::All,
                Self::NoneUsed => {}
                Self::Names(list) => {
                    for name in list {
                        if !names.contains(&name) {
                            names.push(name);
                        }
                    }
                }
            }
        }

        if names.is_empty() {
            Self::NoneUsed
        } else {
            Self::Names(names)
        }
    }
}

/// Chunk ids are numeric in production builds and named in development builds
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum ChunkId {
    Number(u64),
    Name(String),
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// An emitted output file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Asset {
    pub name: String,
}

/// Fields both build shapes share
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOutput {
    pub hash: Option<String>,

    /// Output directory, possibly templated with `[hash]` / `[fullhash]`
    pub output_path: Option<String>,

    /// Every file the compiler consulted
    #[serde(default)]
    pub file_dependencies: Vec<String>,

    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl BuildOutput {
    /// Output directory with hash placeholders substituted
    pub fn resolved_output_path(&self) -> Option<String> {
        let path = self.output_path.as_deref()?;
        Some(match self.hash.as_deref() {
            Some(hash) => path.replace("[fullhash]", hash).replace("[hash]", hash),
            None => path.to_string(),
        })
    }
}

/// Shape-agnostic view over chunks, modules and their export metadata
pub trait ExportsGraph {
    type Chunk;
    type Module;

    fn chunks(&self) -> &[Self::Chunk];

    fn modules_of<'a>(&'a self, chunk: &'a Self::Chunk) -> Vec<&'a Self::Module>;

    /// Source file the module was built from, if any
    fn resource<'a>(&self, module: &'a Self::Module) -> Option<&'a str>;

    fn provided_exports(&self, module: &Self::Module) -> ProvidedExports;

    fn used_exports(&self, module: &Self::Module, chunk: &Self::Chunk) -> UsedExports;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildShape {
    Legacy,
    Current,
}

/// A finished compilation in either shape
#[derive(Debug, Clone)]
pub enum BuildResult {
    Legacy(LegacyBuild),
    Current(CurrentBuild),
}

impl BuildResult {
    /// Parse a build result, picking the shape by the graph handle's presence
    pub fn from_json(content: &str) -> Result<Self, ScrappedError> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let build = if value.get(GRAPH_HANDLE).is_some() {
            Self::Current(serde_json::from_value(value)?)
        } else {
            Self::Legacy(serde_json::from_value(value)?)
        };

        tracing::debug!(shape = ?build.shape(), "parsed build result");
        Ok(build)
    }

    pub fn from_path(path: &Path) -> Result<Self, ScrappedError> {
        let content = std::fs::read_to_string(path).map_err(|e| ScrappedError::io(path, e))?;
        Self::from_json(&content)
    }

    pub fn from_reader(mut reader: impl Read) -> Result<Self, ScrappedError> {
        let mut content = String::new();
        reader.read_to_string(&mut content).map_err(|e| ScrappedError::io("<stdin>", e))?;
        Self::from_json(&content)
    }

    pub fn shape(&self) -> BuildShape {
        match self {
            Self::Legacy(_) => BuildShape::Legacy,
            Self::Current(_) => BuildShape::Current,
        }
    }

    pub fn output(&self) -> &BuildOutput {
        match self {
            Self::Legacy(build) => &build.output,
            Self::Current(build) => &build.output,
        }
    }
}
