//! Lockfile types and data structures

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File checksum information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChecksum {
    /// SHA256 checksum
    pub sha256: String,

    /// File size in bytes
    pub size: u64,
}

impl FileChecksum {
    /// Checksum of a file on disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read(path)?;
        Ok(Self::from_content(&content))
    }

    /// Checksum of in-memory content
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self {
            sha256: hex::encode(hasher.finalize()),
            size: content.len() as u64,
        }
    }

    /// Whether the file at `path` still has this checksum
    pub fn matches_file(&self, path: &Path) -> bool {
        match Self::from_file(path) {
            Ok(current) => current == *self,
            Err(_) => false,
        }
    }
}

/// Recorded state of one source after a successful run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Hash of the settings that shaped the output
    pub fingerprint: String,

    /// Input files and their checksums
    pub inputs: BTreeMap<PathBuf, FileChecksum>,

    /// Generated files and their checksums
    pub outputs: BTreeMap<PathBuf, FileChecksum>,

    /// When the outputs were written
    pub generated_at: DateTime<Utc>,

    /// Version of the tool that wrote the outputs
    #[serde(default)]
    pub tool_version: String,
}

impl SourceEntry {
    pub fn new(
        fingerprint: String,
        inputs: BTreeMap<PathBuf, FileChecksum>,
        outputs: BTreeMap<PathBuf, FileChecksum>,
    ) -> Self {
        Self {
            fingerprint,
            inputs,
            outputs,
            generated_at: Utc::now(),
            tool_version: String::new(),
        }
    }

    /// Whether every recorded output is still on disk unchanged
    pub fn outputs_intact(&self) -> bool {
        self.outputs
            .iter()
            .all(|(path, checksum)| checksum.matches_file(path))
    }
}

/// Calculate SHA256 hash of a string
pub fn hash_string(content: &str) -> String {
    FileChecksum::from_content(content.as_bytes()).sha256
}
