//! Lockfile manager for handling lockfile operations

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::lockfile::Lockfile;
use crate::types::{FileChecksum, SourceEntry};

/// Lockfile manager for handling lockfile operations
///
/// `tool_version` is the version of the program doing the generation;
/// entries written by any other version are never up to date.
pub struct LockfileManager {
    lockfile_path: PathBuf,
    tool_version: String,
}

impl LockfileManager {
    /// Create a new lockfile manager
    pub fn new(lockfile_path: PathBuf, tool_version: impl Into<String>) -> Self {
        Self {
            lockfile_path,
            tool_version: tool_version.into(),
        }
    }

    /// Lockfile path next to a configuration file
    pub fn for_config(config_path: &Path, tool_version: impl Into<String>) -> Self {
        let dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::new(dir.join(Self::default_path()), tool_version)
    }

    /// Load or create lockfile
    pub fn load_or_create(&self) -> Result<Lockfile> {
        if self.lockfile_path.exists() {
            Lockfile::from_file(&self.lockfile_path)
        } else {
            Ok(Lockfile::new(self.tool_version.as_str()))
        }
    }

    pub fn tool_version(&self) -> &str {
        &self.tool_version
    }

    /// Get the lockfile path
    pub fn path(&self) -> &PathBuf {
        &self.lockfile_path
    }

    /// Save lockfile
    pub fn save(&self, lockfile: &Lockfile) -> Result<()> {
        lockfile.save_to_file(&self.lockfile_path)
    }

    /// Check whether a source can be skipped
    pub fn is_up_to_date(
        &self,
        source_name: &str,
        fingerprint: &str,
        inputs: &BTreeMap<PathBuf, FileChecksum>,
    ) -> Result<bool> {
        if !self.lockfile_path.exists() {
            return Ok(false);
        }

        let lockfile = Lockfile::from_file(&self.lockfile_path)?;
        Ok(lockfile.source_up_to_date(&self.tool_version, source_name, fingerprint, inputs))
    }

    /// Record a finished source and persist the lockfile
    pub fn record(&self, source_name: &str, entry: SourceEntry) -> Result<()> {
        let mut lockfile = self.load_or_create()?;
        lockfile.record_source(&self.tool_version, source_name, entry);
        self.save(&lockfile)
    }

    /// Get the default lockfile path
    pub fn default_path() -> PathBuf {
        PathBuf::from(".descgen.lock")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_then_up_to_date() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".descgen.lock");
        let manager = LockfileManager::new(path.clone(), "0.1.0");
        let inputs = BTreeMap::from([(PathBuf::from("a.go"), FileChecksum::from_content(b"a"))]);

        assert!(!manager.is_up_to_date("models", "fp", &inputs).unwrap());

        manager
            .record(
                "models",
                SourceEntry::new("fp".to_string(), inputs.clone(), BTreeMap::new()),
            )
            .unwrap();

        assert!(manager.is_up_to_date("models", "fp", &inputs).unwrap());

        let upgraded = LockfileManager::new(path, "0.2.0");
        assert!(!upgraded.is_up_to_date("models", "fp", &inputs).unwrap());
    }

    #[test]
    fn test_for_config() {
        let manager = LockfileManager::for_config(Path::new("project/descgen.yaml"), "0.1.0");
        assert_eq!(manager.path(), &PathBuf::from("project/.descgen.lock"));

        let manager = LockfileManager::for_config(Path::new("descgen.yaml"), "0.1.0");
        assert_eq!(manager.path(), &PathBuf::from("./.descgen.lock"));
    }
}
