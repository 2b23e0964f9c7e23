//! Go source introspection using tree-sitter
//!
//! Every `type` spec becomes a declaration. Struct fields are stored
//! members (embedded fields are named after their type), and methods that
//! take no arguments and return one value are computed members. The alias
//! table comes from the struct tag key configured for the source (`json` by
//! default).

mod comments;
mod parser;
pub mod tags;

#[cfg(test)]
mod tests;

use std::path::Path;
use tracing::debug;

use super::{IntrospectError, Introspection, Introspector};

/// Introspector for `.go` files
#[derive(Debug, Clone)]
pub struct GoIntrospector {
    alias_tag: String,
}

impl GoIntrospector {
    pub fn new(alias_tag: impl Into<String>) -> Self {
        Self {
            alias_tag: alias_tag.into(),
        }
    }

    /// Struct tag key that supplies external member names
    pub fn alias_tag(&self) -> &str {
        &self.alias_tag
    }
}

impl Default for GoIntrospector {
    fn default() -> Self {
        Self::new("json")
    }
}

impl Introspector for GoIntrospector {
    fn name(&self) -> &'static str {
        "go"
    }

    fn supports(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "go")
    }

    fn introspect_source(
        &self,
        content: &str,
        path: &Path,
    ) -> Result<Introspection, IntrospectError> {
        let introspection = parser::parse(content, &self.alias_tag)?;
        debug!(
            "Found {} declarations in {:?}",
            introspection.declarations.len(),
            path
        );
        Ok(introspection)
    }
}
