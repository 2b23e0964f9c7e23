//! YAML and JSON declaration manifests
//!
//! A manifest is the serialized form of [`Introspection`]:
//!
//! ```yaml
//! package: petstore
//! declarations:
//!   - name: Pet
//!     comments:
//!       - kind: doc
//!         text: A pet in the store
//!     members:
//!       - name: petName
//!         comments: [{ kind: doc, text: Display name }]
//!     alias_table: { petName: name }
//! ```

use std::path::Path;

use super::{IntrospectError, Introspection, Introspector};

/// Reads declarations written out by hand or by another tool
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestIntrospector;

enum ManifestFormat {
    Yaml,
    Json,
}

fn manifest_format(path: &Path) -> Option<ManifestFormat> {
    let extension = path.extension()?.to_string_lossy().to_ascii_lowercase();
    match extension.as_str() {
        "yaml" | "yml" => Some(ManifestFormat::Yaml),
        "json" => Some(ManifestFormat::Json),
        _ => None,
    }
}

impl Introspector for ManifestIntrospector {
    fn name(&self) -> &'static str {
        "manifest"
    }

    fn supports(&self, path: &Path) -> bool {
        manifest_format(path).is_some()
    }

    fn introspect_source(
        &self,
        content: &str,
        path: &Path,
    ) -> Result<Introspection, IntrospectError> {
        let invalid = |message: String| IntrospectError::Manifest {
            path: path.to_path_buf(),
            message,
        };

        let introspection: Introspection = match manifest_format(path) {
            Some(ManifestFormat::Yaml) => {
                serde_yaml::from_str(content).map_err(|e| invalid(e.to_string()))?
            }
            Some(ManifestFormat::Json) => {
                serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?
            }
            None => return Err(IntrospectError::Unsupported(path.to_path_buf())),
        };

        if let Some(unnamed) = introspection
            .declarations
            .iter()
            .position(|d| d.name.trim().is_empty())
        {
            return Err(invalid(format!("declaration #{} has no name", unnamed + 1)));
        }

        Ok(introspection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use descgen_synth::{CommentKind, StorageKind};

    #[test]
    fn test_yaml_manifest() {
        let yaml = r#"
package: petstore
declarations:
  - name: Pet
    comments:
      - kind: doc
        text: A pet in the store
    members:
      - name: petName
        comments:
          - kind: doc
            text: Display name
      - name: isAdult
        storage: computed
    alias_table:
      petName: name
"#;
        let introspection = ManifestIntrospector
            .introspect_source(yaml, Path::new("pets.yaml"))
            .unwrap();

        assert_eq!(introspection.package.as_deref(), Some("petstore"));
        let pet = &introspection.declarations[0];
        assert_eq!(pet.comments[0].kind, CommentKind::Doc);
        assert_eq!(pet.members[1].storage, StorageKind::Computed);
        assert_eq!(
            pet.alias_table.as_ref().and_then(|t| t.get("petName")),
            Some("name")
        );
    }

    #[test]
    fn test_json_manifest() {
        let json = r#"{"declarations": [{"name": "Order", "members": [{"name": "id"}]}]}"#;
        let introspection = ManifestIntrospector
            .introspect_source(json, Path::new("orders.json"))
            .unwrap();

        assert_eq!(introspection.package, None);
        assert_eq!(introspection.declarations[0].members[0].name, "id");
    }

    #[test]
    fn test_invalid_manifest() {
        let err = ManifestIntrospector
            .introspect_source("declarations: [", Path::new("bad.yaml"))
            .unwrap_err();
        assert!(matches!(err, IntrospectError::Manifest { .. }));

        let err = ManifestIntrospector
            .introspect_source("declarations:\n  - name: ''\n", Path::new("bad.yaml"))
            .unwrap_err();
        assert!(err.to_string().contains("#1"));
    }
}
