//! Description tree

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Synthesized description of a declaration or member
///
/// Serializes untagged: a `Text` node is a plain string, an `Object` node is
/// a map keyed by external member name. Keys are kept sorted so rendering
/// the same tree twice yields identical output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DescriptionNode {
    /// Leaf description
    Text(String),

    /// Composite description keyed by external member name
    Object(BTreeMap<String, DescriptionNode>),
}

impl DescriptionNode {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, DescriptionNode>> {
        match self {
            Self::Text(_) => None,
            Self::Object(map) => Some(map),
        }
    }

    /// Look up a child of an `Object` node
    pub fn get(&self, key: &str) -> Option<&DescriptionNode> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Number of leaf descriptions in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Text(_) => 1,
            Self::Object(map) => map.values().map(Self::leaf_count).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_json_shape() {
        let mut inner = BTreeMap::new();
        inner.insert("name".to_string(), DescriptionNode::text("Pet name"));
        let mut outer = BTreeMap::new();
        outer.insert("owner".to_string(), DescriptionNode::Object(inner));
        outer.insert("age".to_string(), DescriptionNode::text("Age in years"));
        let node = DescriptionNode::Object(outer);

        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(
            json,
            r#"{"age":"Age in years","owner":{"name":"Pet name"}}"#
        );

        let parsed: DescriptionNode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, node);
        assert_eq!(parsed.leaf_count(), 2);
        assert_eq!(
            parsed.get("owner").and_then(|n| n.get("name")),
            Some(&DescriptionNode::text("Pet name"))
        );
    }
}
