//! Description tree construction

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, trace};

use crate::alias::resolve;
use crate::comment::classify;
use crate::filter::is_eligible;
use crate::model::{Declaration, Member};
use crate::node::DescriptionNode;

/// Synthesis settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisOptions {
    /// Resolve member names through the declaration's alias table
    pub use_aliases: bool,

    /// Only use documentation comments
    pub doc_only: bool,

    /// Recurse into members whose type is another declaration of the same input set
    pub nested: bool,

    /// Keep the declaration comment under this key when members are described
    pub root_key: Option<String>,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            use_aliases: true,
            doc_only: false,
            nested: false,
            root_key: None,
        }
    }
}

/// Builds description trees for declarations
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    options: SynthesisOptions,
}

type DeclarationIndex<'a> = HashMap<&'a str, &'a Declaration>;

impl Synthesizer {
    pub fn new(options: SynthesisOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SynthesisOptions {
        &self.options
    }

    /// Build the description of a single declaration
    ///
    /// No other declarations are visible, so nested descriptions are never
    /// produced here; use [`Synthesizer::build_all`] for that.
    pub fn build(&self, decl: &Declaration) -> Option<DescriptionNode> {
        let mut path = HashSet::from([decl.name.clone()]);
        self.build_in(decl, &DeclarationIndex::new(), &mut path)
    }

    /// Build every declaration of one input set, in input order
    ///
    /// Each declaration is built independently; the set only serves as the
    /// lookup table for nested descriptions.
    pub fn build_all(&self, decls: &[Declaration]) -> Vec<(String, Option<DescriptionNode>)> {
        let index: DeclarationIndex = decls.iter().map(|d| (d.name.as_str(), d)).collect();

        decls
            .iter()
            .map(|decl| {
                let mut path = HashSet::from([decl.name.clone()]);
                (decl.name.clone(), self.build_in(decl, &index, &mut path))
            })
            .collect()
    }

    fn build_in(
        &self,
        decl: &Declaration,
        index: &DeclarationIndex,
        path: &mut HashSet<String>,
    ) -> Option<DescriptionNode> {
        let root_text = classify(&decl.comments, self.options.doc_only);
        let mapping = self.members(decl, index, path);
        self.assemble(mapping, root_text)
    }

    /// Descriptions of a declaration's eligible members, keyed by external name
    fn members(
        &self,
        decl: &Declaration,
        index: &DeclarationIndex,
        path: &mut HashSet<String>,
    ) -> BTreeMap<String, DescriptionNode> {
        let mut mapping = BTreeMap::new();

        for member in &decl.members {
            if !is_eligible(member) {
                trace!("Skipping member {}.{}", decl.name, member.name);
                continue;
            }

            let external = resolve(
                &member.name,
                decl.alias_table.as_ref(),
                self.options.use_aliases,
            );
            let text = classify(&member.comments, self.options.doc_only);
            let node = if self.options.nested {
                self.nested_node(member, text, index, path)
            } else {
                text.map(DescriptionNode::Text)
            };

            if let Some(node) = node {
                if mapping.insert(external.clone(), node).is_some() {
                    debug!(
                        "Member {}.{} overrides earlier entry for {}",
                        decl.name, member.name, external
                    );
                }
            }
        }

        mapping
    }

    /// Object of member descriptions with `text` kept under the root key,
    /// or the bare text when no member is described
    ///
    /// A member whose external name equals the root key wins over the text.
    fn assemble(
        &self,
        mut mapping: BTreeMap<String, DescriptionNode>,
        text: Option<String>,
    ) -> Option<DescriptionNode> {
        if mapping.is_empty() {
            return text.map(DescriptionNode::Text);
        }

        if let (Some(key), Some(text)) = (&self.options.root_key, text) {
            mapping.entry(key.clone()).or_insert(DescriptionNode::Text(text));
        }
        Some(DescriptionNode::Object(mapping))
    }

    /// Description of a member whose type is another declaration in the set
    ///
    /// The member's own text takes the place of the type's comment. Unknown
    /// types and cycles fall back to the member's text.
    fn nested_node(
        &self,
        member: &Member,
        text: Option<String>,
        index: &DeclarationIndex,
        path: &mut HashSet<String>,
    ) -> Option<DescriptionNode> {
        let Some(child) = member
            .type_name
            .as_deref()
            .and_then(|name| index.get(name))
            .copied()
        else {
            return text.map(DescriptionNode::Text);
        };

        if !path.insert(child.name.clone()) {
            debug!("Not descending into {}: cyclic reference", child.name);
            return text.map(DescriptionNode::Text);
        }
        let mapping = self.members(child, index, path);
        path.remove(&child.name);

        let text = text.or_else(|| classify(&child.comments, self.options.doc_only));
        self.assemble(mapping, text)
    }
}

/// Build the description of a single declaration
pub fn build(decl: &Declaration, options: &SynthesisOptions) -> Option<DescriptionNode> {
    Synthesizer::new(options.clone()).build(decl)
}
