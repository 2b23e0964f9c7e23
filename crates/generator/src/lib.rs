//! Rendering and writing of synthesized description artifacts

pub mod config;
pub mod document;
pub mod generator;
pub mod golang;
pub mod jsonnet;
pub mod render;
pub mod result;

pub use config::{Organization, OutputConfig, OutputFormat};
pub use document::{DescribedDeclaration, DescriptionDocument, TypeKind};
pub use generator::{DescriptionGenerator, GeneratedFile};
pub use result::{GenerationResult, GenerationStatistics, SourceResult};
