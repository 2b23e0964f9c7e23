//! Lockfile structure and persistence

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::types::{FileChecksum, SourceEntry};

/// Lockfile structure for tracking generation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lockfile {
    /// Lockfile version
    pub version: String,

    /// Last update timestamp
    pub generated_at: DateTime<Utc>,

    /// Tool version used
    pub tool_version: String,

    /// Per-source state, keyed by source name
    pub sources: BTreeMap<String, SourceEntry>,
}

impl Lockfile {
    /// Create an empty lockfile for the given tool version
    pub fn new(tool_version: impl Into<String>) -> Self {
        Self {
            version: "1.0".to_string(),
            generated_at: Utc::now(),
            tool_version: tool_version.into(),
            sources: BTreeMap::new(),
        }
    }

    /// Load lockfile from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow!("Lockfile does not exist: {:?}", path));
        }

        let content = std::fs::read_to_string(path)?;
        let lockfile: Lockfile = serde_yaml::from_str(&content)?;
        Ok(lockfile)
    }

    /// Save lockfile to disk
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Record the state of a source after a run by `tool_version`
    pub fn record_source(
        &mut self,
        tool_version: &str,
        source_name: impl Into<String>,
        mut entry: SourceEntry,
    ) {
        entry.tool_version = tool_version.to_string();
        self.sources.insert(source_name.into(), entry);
        self.generated_at = Utc::now();
        self.tool_version = tool_version.to_string();
    }

    /// Whether a source can be skipped
    ///
    /// True only when the source was recorded by `tool_version`, the
    /// settings fingerprint and the exact set of input checksums match the
    /// recorded run, and every recorded output is still intact.
    pub fn source_up_to_date(
        &self,
        tool_version: &str,
        source_name: &str,
        fingerprint: &str,
        inputs: &BTreeMap<PathBuf, FileChecksum>,
    ) -> bool {
        let Some(entry) = self.sources.get(source_name) else {
            return false;
        };

        if entry.tool_version != tool_version {
            debug!(
                "Source {} was generated by tool version {}",
                source_name, entry.tool_version
            );
            return false;
        }

        if entry.fingerprint != fingerprint {
            debug!("Settings changed for source {}", source_name);
            return false;
        }

        if entry.inputs != *inputs {
            let changed = self.changed_inputs(source_name, inputs);
            debug!("Inputs changed for source {}: {:?}", source_name, changed);
            return false;
        }

        entry.outputs_intact()
    }

    /// Inputs that were added, removed or modified since the recorded run
    pub fn changed_inputs(
        &self,
        source_name: &str,
        inputs: &BTreeMap<PathBuf, FileChecksum>,
    ) -> Vec<PathBuf> {
        let Some(entry) = self.sources.get(source_name) else {
            return inputs.keys().cloned().collect();
        };

        let paths: BTreeSet<&PathBuf> = entry.inputs.keys().chain(inputs.keys()).collect();
        paths
            .into_iter()
            .filter(|path| entry.inputs.get(*path) != inputs.get(*path))
            .cloned()
            .collect()
    }
}
