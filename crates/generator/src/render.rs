//! Artifact rendering

use anyhow::{anyhow, Result};
use descgen_synth::DescriptionNode;
use std::collections::BTreeMap;
use tracing::warn;

use crate::config::OutputFormat;
use crate::document::DescriptionDocument;
use crate::{golang, jsonnet};

/// Render documents into a single artifact
///
/// Data formats merge all documents into one map keyed by declaration name;
/// declarations without a description are left out. Go output renders
/// exactly one document, since it has to live in that document's package.
pub fn render(format: OutputFormat, documents: &[DescriptionDocument]) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut content = serde_json::to_string_pretty(&merge(documents))?;
            content.push('\n');
            Ok(content)
        }
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&merge(documents))?),
        OutputFormat::Jsonnet => Ok(jsonnet::render(&merge(documents))),
        OutputFormat::Go => match documents {
            [document] => golang::render(document),
            _ => Err(anyhow!(
                "Go output renders one document at a time, got {}",
                documents.len()
            )),
        },
    }
}

/// Collect described declarations keyed by name
pub fn merge(documents: &[DescriptionDocument]) -> BTreeMap<&str, &DescriptionNode> {
    let mut merged = BTreeMap::new();

    for document in documents {
        for (decl, node) in document.described() {
            if merged.insert(decl.name.as_str(), node).is_some() {
                warn!(
                    "Declaration {} in {:?} replaces an earlier declaration with the same name",
                    decl.name, document.source
                );
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DescribedDeclaration;
    use std::collections::BTreeMap;

    fn documents() -> Vec<DescriptionDocument> {
        let mut members = BTreeMap::new();
        members.insert("name".to_string(), DescriptionNode::text("Pet name"));

        let mut pet = DescriptionDocument::new("pet.go", Some("models".to_string()));
        pet.declarations.push(DescribedDeclaration::new(
            "Pet",
            Some(DescriptionNode::Object(members)),
        ));
        pet.declarations
            .push(DescribedDeclaration::new("Undocumented", None));

        let mut owner = DescriptionDocument::new("owner.go", Some("models".to_string()));
        owner.declarations.push(DescribedDeclaration::new(
            "Owner",
            Some(DescriptionNode::text("Owns pets")),
        ));

        vec![pet, owner]
    }

    #[test]
    fn test_render_json() {
        let content = render(OutputFormat::Json, &documents()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(value["Owner"], "Owns pets");
        assert_eq!(value["Pet"]["name"], "Pet name");
        assert!(value.get("Undocumented").is_none());
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_render_yaml() {
        let content = render(OutputFormat::Yaml, &documents()).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&content).unwrap();

        assert_eq!(value["Owner"].as_str(), Some("Owns pets"));
        assert_eq!(value["Pet"]["name"].as_str(), Some("Pet name"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let first = render(OutputFormat::Jsonnet, &documents()).unwrap();
        let second = render(OutputFormat::Jsonnet, &documents()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_go_needs_single_document() {
        assert!(render(OutputFormat::Go, &documents()).is_err());
        assert!(render(OutputFormat::Go, &documents()[1..]).is_ok());
    }
}
