//! Configuration types for the generator

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base path for generated files
    pub base_path: PathBuf,

    /// Artifact format
    #[serde(default)]
    pub format: OutputFormat,

    /// Organization strategy for output files
    #[serde(default)]
    pub organization: Organization,

    /// File name stem for generated artifacts
    #[serde(default = "default_file_stem")]
    pub file_stem: String,
}

fn default_file_stem() -> String {
    "descriptions".to_string()
}

impl OutputConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base_path.to_string_lossy().is_empty() {
            return Err(anyhow!("Base path cannot be empty"));
        }

        if self.file_stem.is_empty() || self.file_stem.contains(['/', '\\']) {
            return Err(anyhow!("Invalid output file stem: {:?}", self.file_stem));
        }

        if self.format == OutputFormat::Go && self.organization != Organization::PerSource {
            return Err(anyhow!(
                "Go output must use per_source organization so each file lands in its package"
            ));
        }

        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./generated"),
            format: OutputFormat::default(),
            organization: Organization::default(),
            file_stem: default_file_stem(),
        }
    }
}

/// Artifact format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,

    /// YAML document
    Yaml,

    /// Jsonnet object literal
    Jsonnet,

    /// Go source with a `Descriptions()` accessor per type
    Go,
}

impl OutputFormat {
    /// File extension for the format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Jsonnet => "libsonnet",
            OutputFormat::Go => "go",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Jsonnet => "jsonnet",
            OutputFormat::Go => "go",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "jsonnet" | "libsonnet" => Ok(OutputFormat::Jsonnet),
            "go" => Ok(OutputFormat::Go),
            other => Err(anyhow!("Unknown output format: {}", other)),
        }
    }
}

/// Organization strategy for output files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Organization {
    /// One artifact per configured source
    #[default]
    Combined,

    /// One artifact per input file, mirroring the source layout
    PerSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(OutputConfig::default().validate().is_ok());
    }

    #[test]
    fn test_go_requires_per_source() {
        let mut config = OutputConfig {
            format: OutputFormat::Go,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.organization = Organization::PerSource;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("yml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!(
            "jsonnet".parse::<OutputFormat>().unwrap(),
            OutputFormat::Jsonnet
        );
        assert!("toml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_config_yaml_defaults() {
        let config: OutputConfig = serde_yaml::from_str("base_path: ./out\n").unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.organization, Organization::Combined);
        assert_eq!(config.file_stem, "descriptions");
    }
}
