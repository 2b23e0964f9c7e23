//! Artifact planning and writing

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{Organization, OutputConfig};
use crate::document::DescriptionDocument;
use crate::render::render;

/// A rendered artifact that has not been written yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
}

pub struct DescriptionGenerator {
    output_config: OutputConfig,
}

impl DescriptionGenerator {
    pub fn new(output_config: OutputConfig) -> Self {
        Self { output_config }
    }

    pub fn output_config(&self) -> &OutputConfig {
        &self.output_config
    }

    /// Output directory for a source
    pub fn source_output_path(&self, source_name: &str) -> PathBuf {
        self.output_config
            .base_path
            .join(sanitize_filename(source_name))
    }

    /// Render the artifacts for one source without touching the filesystem
    pub fn plan(
        &self,
        source_name: &str,
        documents: &[DescriptionDocument],
    ) -> Result<Vec<GeneratedFile>> {
        let output_path = self.source_output_path(source_name);
        let format = self.output_config.format;
        let file_name = format!("{}.{}", self.output_config.file_stem, format.extension());

        match self.output_config.organization {
            Organization::Combined => Ok(vec![GeneratedFile {
                path: output_path.join(file_name),
                content: render(format, documents)?,
            }]),
            Organization::PerSource => {
                let mut files = Vec::new();

                for document in documents {
                    if document.described_count() == 0 {
                        debug!("Nothing described in {:?}, no artifact", document.source);
                        continue;
                    }

                    files.push(GeneratedFile {
                        path: output_path.join(self.per_source_path(&document.source)),
                        content: render(format, std::slice::from_ref(document))?,
                    });
                }

                Ok(files)
            }
        }
    }

    /// Artifact path for an input file, relative to the source output directory
    ///
    /// `models/pet.go` becomes `models/pet_descriptions.<ext>`.
    fn per_source_path(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "source".to_string());
        let file_name = format!(
            "{}_{}.{}",
            sanitize_filename(&stem),
            self.output_config.file_stem,
            self.output_config.format.extension()
        );

        match source.parent() {
            Some(parent) => parent.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Write planned artifacts to disk
    pub async fn write(&self, files: &[GeneratedFile]) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for file in files {
            if let Some(parent) = file.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&file.path, &file.content)?;
            info!("Generated description file: {:?}", file.path);
            written.push(file.path.clone());
        }

        Ok(written)
    }
}

/// Convert a string to a valid filename
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::document::DescribedDeclaration;
    use descgen_synth::DescriptionNode;
    use tempfile::TempDir;

    fn documents() -> Vec<DescriptionDocument> {
        let mut pet = DescriptionDocument::new("models/pet.go", Some("models".to_string()));
        pet.declarations.push(DescribedDeclaration::new(
            "Pet",
            Some(DescriptionNode::text("A pet")),
        ));

        let mut empty = DescriptionDocument::new("models/empty.go", Some("models".to_string()));
        empty
            .declarations
            .push(DescribedDeclaration::new("Empty", None));

        vec![pet, empty]
    }

    #[test]
    fn test_plan_combined() {
        let generator = DescriptionGenerator::new(OutputConfig {
            base_path: PathBuf::from("out"),
            ..Default::default()
        });

        let files = generator.plan("my models", &documents()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, PathBuf::from("out/my_models/descriptions.json"));
    }

    #[test]
    fn test_plan_per_source_skips_undescribed() {
        let generator = DescriptionGenerator::new(OutputConfig {
            base_path: PathBuf::from("out"),
            format: OutputFormat::Go,
            organization: Organization::PerSource,
            ..Default::default()
        });

        let files = generator.plan("models", &documents()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(
            files[0].path,
            PathBuf::from("out/models/models/pet_descriptions.go")
        );
        assert!(files[0].content.contains("package models"));
    }

    #[tokio::test]
    async fn test_write_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let generator = DescriptionGenerator::new(OutputConfig {
            base_path: temp_dir.path().to_path_buf(),
            format: OutputFormat::Yaml,
            organization: Organization::PerSource,
            ..Default::default()
        });

        let files = generator.plan("src", &documents()).unwrap();
        let written = generator.write(&files).await.unwrap();

        assert_eq!(written.len(), 1);
        let content = std::fs::read_to_string(&written[0]).unwrap();
        assert!(content.contains("Pet: A pet"));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("test.yaml"), "test.yaml");
        assert_eq!(sanitize_filename("test file.yaml"), "test_file.yaml");
    }
}
