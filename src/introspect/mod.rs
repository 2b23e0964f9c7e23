//! Declaration introspection
//!
//! An [`Introspector`] turns one input file into the plain [`Declaration`]
//! records the synthesizer consumes. Two adapters ship with descgen: Go
//! source parsed with tree-sitter, and YAML/JSON declaration manifests.

pub mod go;
pub mod manifest;

use async_trait::async_trait;
use descgen_generator::TypeKind;
use descgen_synth::Declaration;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::config::Source;

pub use go::GoIntrospector;
pub use manifest::ManifestIntrospector;

/// Errors raised while introspecting a file
#[derive(Error, Debug)]
pub enum IntrospectError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parser error: {0}")]
    Parser(String),

    #[error("Invalid manifest {path:?}: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("No introspector supports {0:?}")]
    Unsupported(PathBuf),
}

/// A recoverable problem found while parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 1-based line number
    pub line: usize,
    pub message: String,
}

/// Everything extracted from one input file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Introspection {
    /// Package the declarations belong to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Declarations in source order
    #[serde(default)]
    pub declarations: Vec<Declaration>,

    /// Type parameter count per generic declaration
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub type_params: HashMap<String, usize>,

    /// Kind of each declaration that is not a plain defined type
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub kinds: HashMap<String, TypeKind>,

    /// Syntax problems the parser recovered from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Introspection {
    pub fn type_param_count(&self, declaration: &str) -> usize {
        self.type_params.get(declaration).copied().unwrap_or(0)
    }

    pub fn type_kind(&self, declaration: &str) -> TypeKind {
        self.kinds.get(declaration).copied().unwrap_or_default()
    }
}

/// Source of declarations for one kind of input file
#[async_trait]
pub trait Introspector: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether this introspector understands the file
    fn supports(&self, path: &Path) -> bool;

    /// Introspect in-memory content; `path` is only used for messages
    fn introspect_source(&self, content: &str, path: &Path)
        -> Result<Introspection, IntrospectError>;

    /// Read and introspect a file on the current thread
    fn introspect_file(&self, path: &Path) -> Result<Introspection, IntrospectError> {
        let content = std::fs::read_to_string(path).map_err(|source| IntrospectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.introspect_source(&content, path)
    }

    /// Read and introspect a file
    async fn introspect(&self, path: &Path) -> Result<Introspection, IntrospectError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| IntrospectError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        self.introspect_source(&content, path)
    }
}

/// Introspector for a configured source
pub fn for_source(source: &Source) -> Arc<dyn Introspector> {
    match source {
        Source::Go(go) => Arc::new(GoIntrospector::new(go.alias_tag.clone())),
        Source::Manifest(_) => Arc::new(ManifestIntrospector),
    }
}

/// Introspector for a standalone file, chosen by extension
pub fn for_path(path: &Path, alias_tag: &str) -> Result<Arc<dyn Introspector>, IntrospectError> {
    let candidates: [Arc<dyn Introspector>; 2] = [
        Arc::new(GoIntrospector::new(alias_tag)),
        Arc::new(ManifestIntrospector),
    ];

    candidates
        .into_iter()
        .find(|introspector| introspector.supports(path))
        .ok_or_else(|| IntrospectError::Unsupported(path.to_path_buf()))
}
