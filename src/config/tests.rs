//! Configuration tests

use super::*;
use descgen_generator::{Organization, OutputFormat};
use tempfile::NamedTempFile;

fn config_with_source() -> Config {
    let mut config = Config::default();
    config.sources.push(Source::Go(GoSource::new("models", "./pkg/models")));
    config
}

#[test]
fn test_config_serialization() {
    let config = config_with_source();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(config.version, parsed.version);
    assert_eq!(parsed.sources.len(), 1);
    assert_eq!(parsed.synthesis, config.synthesis);
}

#[test]
fn test_config_from_file() {
    let config = config_with_source();

    let temp_file = NamedTempFile::new().unwrap();
    config.save_to_file(temp_file.path()).unwrap();

    let loaded = Config::from_file(temp_file.path()).unwrap();
    assert_eq!(config.version, loaded.version);
    assert_eq!(loaded.sources[0].name(), "models");
}

#[test]
fn test_minimal_yaml() {
    let yaml = r#"
version: "1.0"
sources:
  - type: go
    name: models
    path: ./pkg/models
  - type: manifest
    name: extra
    path: ./declarations.yaml
output:
  base_path: ./generated
  format: jsonnet
"#;

    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert!(config.validate().is_ok());
    assert!(config.synthesis.use_aliases);
    assert!(!config.synthesis.doc_only);
    assert!(!config.generation.fail_fast);
    assert_eq!(config.output.format, OutputFormat::Jsonnet);
    assert_eq!(config.sources[1].source_type(), "manifest");
}

#[test]
fn test_config_validation() {
    assert!(config_with_source().validate().is_ok());

    // No sources
    assert!(Config::default().validate().is_err());

    let mut config = config_with_source();
    config.version = "2.0".to_string();
    assert!(config.validate().is_err());

    let mut config = config_with_source();
    config
        .sources
        .push(Source::Manifest(ManifestSource::new("models", "m.yaml")));
    assert!(config.validate().is_err());

    let mut config = config_with_source();
    config.synthesis.root_key = Some(" ".to_string());
    assert!(config.validate().is_err());

    let mut config = config_with_source();
    config.output.format = OutputFormat::Go;
    assert!(config.validate().is_err());
    config.output.organization = Organization::PerSource;
    assert!(config.validate().is_ok());
}
