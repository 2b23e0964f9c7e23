//! Introspection data model
//!
//! These types are the plain-data contract between a declaration source
//! (a parser, a manifest file) and the synthesizer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a comment block was marked in source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentKind {
    /// Documentation comment
    Doc,

    /// Ordinary comment
    Plain,
}

/// A single comment block with its delimiters already stripped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentBlock {
    /// Comment kind
    pub kind: CommentKind,

    /// Comment content
    pub text: String,
}

impl CommentBlock {
    /// Create a documentation comment block
    pub fn doc(text: impl Into<String>) -> Self {
        Self {
            kind: CommentKind::Doc,
            text: text.into(),
        }
    }

    /// Create a plain comment block
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: CommentKind::Plain,
            text: text.into(),
        }
    }

    pub fn is_doc(&self) -> bool {
        self.kind == CommentKind::Doc
    }
}

/// Storage kind of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Backed by storage in the declaration
    #[default]
    Stored,

    /// Derived on access
    Computed,
}

/// A stored or computed property of a declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Declared name
    pub name: String,

    /// Comment blocks attached to the member, in source order
    #[serde(default)]
    pub comments: Vec<CommentBlock>,

    /// Attribute markers; only their presence matters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_markers: Vec<String>,

    /// Stored or computed
    #[serde(default)]
    pub storage: StorageKind,

    /// Name of the member's declared type, used for nested descriptions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl Member {
    /// Create a stored member without comments
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comments: Vec::new(),
            attribute_markers: Vec::new(),
            storage: StorageKind::Stored,
            type_name: None,
        }
    }

    pub fn with_comment(mut self, comment: CommentBlock) -> Self {
        self.comments.push(comment);
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.attribute_markers.push(marker.into());
        self
    }

    pub fn computed(mut self) -> Self {
        self.storage = StorageKind::Computed;
        self
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
}

/// Mapping from declared member name to external (serialized) name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an alias; a later entry for the same name replaces the earlier one
    pub fn insert(&mut self, declared: impl Into<String>, external: impl Into<String>) {
        self.entries.insert(declared.into(), external.into());
    }

    /// External name for a declared name, if the table has one
    pub fn get(&self, declared: &str) -> Option<&str> {
        self.entries.get(declared).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (declared, external) in iter {
            table.insert(declared, external);
        }
        table
    }
}

/// The unit a description is synthesized for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Declaration name
    pub name: String,

    /// Comment blocks directly above the declaration, in source order
    #[serde(default)]
    pub comments: Vec<CommentBlock>,

    /// Members in declaration order
    #[serde(default)]
    pub members: Vec<Member>,

    /// Whether the declaration itself carries attributes
    #[serde(default)]
    pub has_attributes: bool,

    /// Optional alias table for member names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_table: Option<AliasTable>,
}

impl Declaration {
    /// Create an empty declaration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comments: Vec::new(),
            members: Vec::new(),
            has_attributes: false,
            alias_table: None,
        }
    }

    pub fn with_comment(mut self, comment: CommentBlock) -> Self {
        self.comments.push(comment);
        self
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_aliases(mut self, table: AliasTable) -> Self {
        self.alias_table = Some(table);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_from_yaml() {
        let yaml = r#"
name: Pet
comments:
  - kind: doc
    text: A pet in the store
members:
  - name: petName
    comments:
      - kind: plain
        text: display name
    type_name: string
  - name: age
    storage: computed
  - name: tags
    attribute_markers: ["+optional"]
alias_table:
  petName: name
"#;

        let decl: Declaration = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(decl.name, "Pet");
        assert!(decl.comments[0].is_doc());
        assert_eq!(decl.members.len(), 3);
        assert_eq!(decl.members[0].storage, StorageKind::Stored);
        assert_eq!(decl.members[0].type_name.as_deref(), Some("string"));
        assert_eq!(decl.members[1].storage, StorageKind::Computed);
        assert_eq!(decl.members[2].attribute_markers, vec!["+optional"]);
        assert!(!decl.has_attributes);

        let table = decl.alias_table.unwrap();
        assert_eq!(table.get("petName"), Some("name"));
        assert_eq!(table.get("age"), None);
    }

    #[test]
    fn test_alias_table_later_entry_replaces() {
        let table: AliasTable = [("a", "x"), ("a", "y")].into_iter().collect();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("a"), Some("y"));
    }
}
