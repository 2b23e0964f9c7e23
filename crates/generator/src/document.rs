//! Synthesized descriptions grouped by input file

use descgen_synth::DescriptionNode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How a declared type is defined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// A defined type, such as a struct or a named scalar
    #[default]
    Defined,

    /// An interface type
    Interface,

    /// An alias for another type (`type A = B`)
    Alias,

    /// A defined type whose underlying type is a pointer
    Pointer,
}

impl TypeKind {
    /// Whether the type can be the receiver of a method declared next to it
    pub fn accepts_methods(&self) -> bool {
        matches!(self, TypeKind::Defined)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeKind::Defined => "defined",
            TypeKind::Interface => "interface",
            TypeKind::Alias => "alias",
            TypeKind::Pointer => "pointer",
        };
        f.write_str(name)
    }
}

/// A declaration together with its synthesized description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescribedDeclaration {
    /// Declaration name
    pub name: String,

    /// Synthesized description, absent when nothing could be derived
    pub description: Option<DescriptionNode>,

    /// Number of type parameters the declaration takes
    #[serde(default)]
    pub type_params: usize,

    #[serde(default)]
    pub kind: TypeKind,
}

impl DescribedDeclaration {
    pub fn new(name: impl Into<String>, description: Option<DescriptionNode>) -> Self {
        Self {
            name: name.into(),
            description,
            type_params: 0,
            kind: TypeKind::Defined,
        }
    }
}

/// Descriptions synthesized from one input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionDocument {
    /// Input file, relative to the source root
    pub source: PathBuf,

    /// Package the declarations belong to, when the source language has one
    pub package: Option<String>,

    /// Declarations in source order
    pub declarations: Vec<DescribedDeclaration>,
}

impl DescriptionDocument {
    pub fn new(source: impl Into<PathBuf>, package: Option<String>) -> Self {
        Self {
            source: source.into(),
            package,
            declarations: Vec::new(),
        }
    }

    /// Declarations that have a description, in source order
    pub fn described(&self) -> impl Iterator<Item = (&DescribedDeclaration, &DescriptionNode)> {
        self.declarations
            .iter()
            .filter_map(|d| d.description.as_ref().map(|node| (d, node)))
    }

    pub fn described_count(&self) -> usize {
        self.described().count()
    }
}
