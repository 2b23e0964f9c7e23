//! Go source rendering
//!
//! Every described type gets a value-receiver method returning its
//! description as plain Go values: a `string` for text and a
//! `map[string]any` for members. Types without a description get no method,
//! so callers treat a missing accessor as "no description". Interfaces,
//! aliases and pointer types cannot declare methods and are left out.

use anyhow::{anyhow, Result};
use descgen_synth::DescriptionNode;
use tracing::warn;

use crate::document::{DescribedDeclaration, DescriptionDocument};

/// Name of the generated accessor method
pub const ACCESSOR: &str = "Descriptions";

/// Render one document as a Go source file in the document's package
pub fn render(document: &DescriptionDocument) -> Result<String> {
    let package = document
        .package
        .as_deref()
        .ok_or_else(|| anyhow!("{:?} has no Go package", document.source))?;

    let mut content = String::new();
    content.push_str("// Code generated by descgen. DO NOT EDIT.\n");
    content.push_str(&format!("// Source: {}\n\n", document.source.display()));
    content.push_str(&format!("package {package}\n"));

    for (decl, node) in document.described() {
        if !decl.kind.accepts_methods() {
            warn!(
                "No {} accessor for {} in {:?}: {} types cannot have methods",
                ACCESSOR, decl.name, document.source, decl.kind
            );
            continue;
        }
        content.push('\n');
        content.push_str(&accessor(decl, node));
    }

    Ok(content)
}

fn accessor(decl: &DescribedDeclaration, node: &DescriptionNode) -> String {
    let receiver = if decl.type_params == 0 {
        decl.name.clone()
    } else {
        format!("{}[{}]", decl.name, vec!["_"; decl.type_params].join(", "))
    };

    let mut content = String::new();
    content.push_str(&format!(
        "// {ACCESSOR} returns the synthesized description of {}.\n",
        decl.name
    ));
    content.push_str(&format!("func ({receiver}) {ACCESSOR}() any {{\n"));
    content.push_str("\treturn ");
    write_value(&mut content, node, 1);
    content.push_str("\n}\n");
    content
}

fn write_value(content: &mut String, node: &DescriptionNode, depth: usize) {
    match node {
        DescriptionNode::Text(text) => content.push_str(&quote(text)),
        DescriptionNode::Object(children) => {
            let indent = "\t".repeat(depth + 1);
            content.push_str("map[string]any{\n");
            for (key, child) in children {
                content.push_str(&format!("{indent}{}: ", quote(key)));
                write_value(content, child, depth + 1);
                content.push_str(",\n");
            }
            content.push_str(&"\t".repeat(depth));
            content.push('}');
        }
    }
}

/// Interpreted Go string literal
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TypeKind;
    use std::collections::BTreeMap;

    #[test]
    fn test_render_go_accessors() {
        let mut members = BTreeMap::new();
        members.insert("name".to_string(), DescriptionNode::text("The \"pet\" name"));

        let mut document = DescriptionDocument::new("models/pet.go", Some("models".to_string()));
        document.declarations.push(DescribedDeclaration::new(
            "Pet",
            Some(DescriptionNode::Object(members)),
        ));
        document
            .declarations
            .push(DescribedDeclaration::new("Hidden", None));
        document.declarations.push(DescribedDeclaration {
            name: "Box".to_string(),
            description: Some(DescriptionNode::text("A box")),
            type_params: 2,
            kind: TypeKind::Defined,
        });

        let content = render(&document).unwrap();
        let expected = "// Code generated by descgen. DO NOT EDIT.\n\
// Source: models/pet.go\n\
\n\
package models\n\
\n\
// Descriptions returns the synthesized description of Pet.\n\
func (Pet) Descriptions() any {\n\
\treturn map[string]any{\n\
\t\t\"name\": \"The \\\"pet\\\" name\",\n\
\t}\n\
}\n\
\n\
// Descriptions returns the synthesized description of Box.\n\
func (Box[_, _]) Descriptions() any {\n\
\treturn \"A box\"\n\
}\n";
        assert_eq!(content, expected);
        assert!(!content.contains("Hidden"));
    }

    #[test]
    fn test_types_without_methods_are_skipped() {
        let mut document = DescriptionDocument::new("models/kinds.go", Some("models".to_string()));
        for (name, kind) in [
            ("Reader", TypeKind::Interface),
            ("ID", TypeKind::Alias),
            ("Ref", TypeKind::Pointer),
            ("Status", TypeKind::Defined),
        ] {
            let mut decl =
                DescribedDeclaration::new(name, Some(DescriptionNode::text(format!("{name} doc"))));
            decl.kind = kind;
            document.declarations.push(decl);
        }

        let content = render(&document).unwrap();
        assert!(content.contains("func (Status) Descriptions() any {\n\treturn \"Status doc\"\n}"));
        assert!(!content.contains("func (Reader)"));
        assert!(!content.contains("func (ID)"));
        assert!(!content.contains("func (Ref)"));
    }

    #[test]
    fn test_missing_package_is_an_error() {
        let document = DescriptionDocument::new("decls.yaml", None);
        assert!(render(&document).is_err());
    }
}
