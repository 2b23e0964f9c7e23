//! Source configuration definitions

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::expand_path;

/// Source types that can be processed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Source {
    /// Go source files
    Go(GoSource),

    /// Declaration manifest in YAML or JSON
    Manifest(ManifestSource),
}

impl Source {
    /// Get the name of the source
    pub fn name(&self) -> &str {
        match self {
            Source::Go(go) => &go.name,
            Source::Manifest(manifest) => &manifest.name,
        }
    }

    pub fn source_type(&self) -> &str {
        match self {
            Source::Go(_) => "go",
            Source::Manifest(_) => "manifest",
        }
    }

    /// Path as written in the configuration
    pub fn path(&self) -> &PathBuf {
        match self {
            Source::Go(go) => &go.path,
            Source::Manifest(manifest) => &manifest.path,
        }
    }

    /// Path with `~` and environment variables expanded
    pub fn resolved_path(&self) -> Result<PathBuf> {
        expand_path(self.path())
    }

    /// Validate the source configuration
    pub fn validate(&self) -> Result<()> {
        match self {
            Source::Go(go) => go.validate(),
            Source::Manifest(manifest) => manifest.validate(),
        }
    }
}

fn default_include_patterns() -> Vec<String> {
    vec!["**/*.go".to_string()]
}

fn default_exclude_patterns() -> Vec<String> {
    vec!["**/*_test.go".to_string()]
}

fn default_alias_tag() -> String {
    "json".to_string()
}

/// Go source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoSource {
    /// Name of the source
    pub name: String,

    /// Go file or directory to scan
    pub path: PathBuf,

    /// File patterns to include (e.g., ["**/*.go"])
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    /// File patterns to exclude (e.g., ["**/*_test.go", "vendor/**"])
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Struct tag key that supplies external member names
    #[serde(default = "default_alias_tag")]
    pub alias_tag: String,
}

impl GoSource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            include_patterns: default_include_patterns(),
            exclude_patterns: default_exclude_patterns(),
            alias_tag: default_alias_tag(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(anyhow!("Go source name cannot be empty"));
        }

        if self.path.as_os_str().is_empty() {
            return Err(anyhow!("Go source path cannot be empty"));
        }

        if self.include_patterns.is_empty() {
            return Err(anyhow!("Go source must have at least one include pattern"));
        }

        for pattern in self.include_patterns.iter().chain(&self.exclude_patterns) {
            glob::Pattern::new(pattern)
                .map_err(|e| anyhow!("Invalid pattern {:?} in source {}: {}", pattern, self.name, e))?;
        }

        if self.alias_tag.is_empty() || self.alias_tag.contains([' ', ':', '"']) {
            return Err(anyhow!("Invalid struct tag key: {:?}", self.alias_tag));
        }

        Ok(())
    }
}

/// Declaration manifest source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestSource {
    /// Name of the source
    pub name: String,

    /// Manifest file (.yaml, .yml or .json)
    pub path: PathBuf,
}

impl ManifestSource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(anyhow!("Manifest source name cannot be empty"));
        }

        let extension = self
            .path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        match extension.as_deref() {
            Some("yaml" | "yml" | "json") => Ok(()),
            _ => Err(anyhow!(
                "Manifest {:?} must be a .yaml, .yml or .json file",
                self.path
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_source_defaults() {
        let source: Source = serde_yaml::from_str("type: go\nname: models\npath: ./pkg\n").unwrap();

        let Source::Go(go) = source else {
            panic!("expected a Go source");
        };
        assert_eq!(go.include_patterns, vec!["**/*.go"]);
        assert_eq!(go.exclude_patterns, vec!["**/*_test.go"]);
        assert_eq!(go.alias_tag, "json");
        assert!(go.validate().is_ok());
    }

    #[test]
    fn test_go_source_validation() {
        let mut source = GoSource::new("models", "./pkg");
        source.include_patterns.clear();
        assert!(source.validate().is_err());

        let mut source = GoSource::new("models", "./pkg");
        source.exclude_patterns.push("[".to_string());
        assert!(source.validate().is_err());

        let mut source = GoSource::new("models", "./pkg");
        source.alias_tag = "json:".to_string();
        assert!(source.validate().is_err());

        assert!(GoSource::new("", "./pkg").validate().is_err());
    }

    #[test]
    fn test_manifest_source_validation() {
        assert!(ManifestSource::new("m", "decls.yaml").validate().is_ok());
        assert!(ManifestSource::new("m", "decls.JSON").validate().is_ok());
        assert!(ManifestSource::new("m", "decls.toml").validate().is_err());
        assert!(ManifestSource::new("", "decls.yaml").validate().is_err());
    }
}
