//! Main configuration structure and implementation

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{GenerationConfig, Source};
use descgen_generator::OutputConfig;
use descgen_synth::SynthesisOptions;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// List of sources to process
    pub sources: Vec<Source>,

    /// Description synthesis settings
    #[serde(default)]
    pub synthesis: SynthesisOptions,

    /// Output configuration
    pub output: OutputConfig,

    /// Generation settings
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.version != "1.0" {
            return Err(anyhow!(
                "Unsupported configuration version: {}",
                self.version
            ));
        }

        if self.sources.is_empty() {
            return Err(anyhow!("At least one source must be configured"));
        }

        // Validate each source
        for source in &self.sources {
            source.validate()?;
        }

        for (i, source) in self.sources.iter().enumerate() {
            if self.sources[..i].iter().any(|s| s.name() == source.name()) {
                return Err(anyhow!("Duplicate source name: {}", source.name()));
            }
        }

        if matches!(self.synthesis.root_key.as_deref(), Some(key) if key.trim().is_empty()) {
            return Err(anyhow!("synthesis.root_key cannot be empty when set"));
        }

        // Validate output configuration
        self.output.validate()?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            sources: Vec::new(),
            synthesis: SynthesisOptions::default(),
            output: OutputConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}
