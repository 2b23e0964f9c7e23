//! Tree-sitter walk over a Go source file

use descgen_generator::TypeKind;
use descgen_synth::{AliasTable, Declaration, Member};
use std::collections::HashMap;
use std::ops::Range;
use tracing::debug;
use tree_sitter::{Node, Parser};

use super::comments::{Attached, CommentCursor, RawComment};
use super::tags;
use crate::introspect::{Diagnostic, IntrospectError, Introspection};

/// Source text covered by a node
pub fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Newline and semicolon tokens that end a statement
fn is_terminator(node: Node) -> bool {
    !node.is_named() && matches!(node.kind(), "\n" | ";" | "\0")
}

/// Parse Go source into declarations
pub fn parse(source: &str, alias_tag: &str) -> Result<Introspection, IntrospectError> {
    let mut parser = Parser::new();
    parser
        .set_language(tree_sitter_go::language())
        .map_err(|e| IntrospectError::Parser(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| IntrospectError::Parser("tree-sitter returned no tree".to_string()))?;
    let root = tree.root_node();

    let mut file = GoFile::new(source, alias_tag);
    file.walk(root);

    let mut diagnostics = Vec::new();
    collect_diagnostics(root, &mut diagnostics);

    Ok(file.finish(diagnostics))
}

/// Declarations gathered from one file
struct GoFile<'a> {
    source: &'a str,
    alias_tag: &'a str,
    package: Option<String>,
    declarations: Vec<Declaration>,
    type_params: HashMap<String, usize>,
    kinds: HashMap<String, TypeKind>,
    /// `type A B` definitions, resolved against the file's other types at the end
    defined_as: Vec<(String, String)>,
    /// Computed members keyed by receiver type, attached once the walk is done
    methods: Vec<(String, Member)>,
}

impl<'a> GoFile<'a> {
    fn new(source: &'a str, alias_tag: &'a str) -> Self {
        Self {
            source,
            alias_tag,
            package: None,
            declarations: Vec::new(),
            type_params: HashMap::new(),
            kinds: HashMap::new(),
            defined_as: Vec::new(),
            methods: Vec::new(),
        }
    }

    fn text(&self, node: Node) -> String {
        node_text(node, self.source).to_string()
    }

    fn walk(&mut self, root: Node) {
        let mut comments = CommentCursor::new();
        let mut last_declaration = None;
        let mut cursor = root.walk();

        for child in root.children(&mut cursor) {
            match child.kind() {
                "comment" => {
                    if let (Some(trailing), Some(index)) =
                        (comments.comment(child, self.source), last_declaration)
                    {
                        attach_trailing(&mut self.declarations[index], trailing);
                    }
                }
                "package_clause" => {
                    comments.code(child);
                    self.package = child.named_child(0).map(|name| self.text(name));
                    last_declaration = None;
                }
                "type_declaration" => {
                    let attached = comments.code(child);
                    last_declaration = self.type_declaration(child, attached);
                }
                "method_declaration" => {
                    let attached = comments.code(child);
                    self.method_declaration(child, attached);
                    last_declaration = None;
                }
                _ if is_terminator(child) => {}
                _ => {
                    comments.code(child);
                    last_declaration = None;
                }
            }
        }
    }

    /// Returns the index of the declaration when the statement declares one type
    fn type_declaration(&mut self, node: Node, attached: Attached) -> Option<usize> {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();

        if !children.iter().any(|c| c.kind() == "(") {
            let spec = children
                .iter()
                .find(|c| matches!(c.kind(), "type_spec" | "type_alias"))?;
            return Some(self.type_spec(*spec, attached));
        }

        // Grouped declaration: each spec only takes the comments inside the
        // parentheses
        let mut comments = CommentCursor::new();
        let mut last_spec = None;

        for child in children {
            match child.kind() {
                "comment" => {
                    if let (Some(trailing), Some(index)) =
                        (comments.comment(child, self.source), last_spec)
                    {
                        attach_trailing(&mut self.declarations[index], trailing);
                    }
                }
                "type_spec" | "type_alias" => {
                    let attached = comments.code(child);
                    last_spec = Some(self.type_spec(child, attached));
                }
                _ if is_terminator(child) => {}
                _ => {
                    comments.code(child);
                    last_spec = None;
                }
            }
        }

        None
    }

    fn type_spec(&mut self, node: Node, attached: Attached) -> usize {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n))
            .unwrap_or_default();

        let mut declaration = Declaration::new(name.clone());
        declaration.comments = attached.comments;
        declaration.has_attributes = !attached.markers.is_empty();

        if let Some(params) = node.child_by_field_name("type_parameters") {
            let count = type_parameter_count(params);
            if count > 0 {
                self.type_params.insert(name.clone(), count);
            }
        }

        if let Some(ty) = node.child_by_field_name("type") {
            let ty = unparenthesized(ty);
            let kind = if node.kind() == "type_alias" {
                TypeKind::Alias
            } else {
                match ty.kind() {
                    "interface_type" => TypeKind::Interface,
                    "pointer_type" => TypeKind::Pointer,
                    "type_identifier" => {
                        let target = self.text(ty);
                        self.defined_as.push((name.clone(), target));
                        TypeKind::Defined
                    }
                    _ => TypeKind::Defined,
                }
            };
            if kind != TypeKind::Defined {
                self.kinds.insert(name.clone(), kind);
            }

            if ty.kind() == "struct_type" {
                self.struct_members(ty, &mut declaration);
            }
        }

        self.declarations.push(declaration);
        self.declarations.len() - 1
    }

    fn struct_members(&self, struct_type: Node, declaration: &mut Declaration) {
        let mut cursor = struct_type.walk();
        let Some(list) = struct_type
            .children(&mut cursor)
            .find(|c| c.kind() == "field_declaration_list")
        else {
            return;
        };

        let mut comments = CommentCursor::new();
        let mut aliases = AliasTable::new();
        let mut last_field: Option<Range<usize>> = None;
        let mut cursor = list.walk();

        for child in list.children(&mut cursor) {
            match child.kind() {
                "comment" => {
                    if let (Some(trailing), Some(range)) =
                        (comments.comment(child, self.source), last_field.clone())
                    {
                        for member in &mut declaration.members[range] {
                            attach_trailing_member(member, trailing.clone());
                        }
                    }
                }
                "field_declaration" => {
                    let attached = comments.code(child);
                    let start = declaration.members.len();
                    self.field_declaration(child, &attached, &mut declaration.members, &mut aliases);
                    last_field = Some(start..declaration.members.len());
                }
                _ if is_terminator(child) => {}
                _ => {
                    comments.code(child);
                    last_field = None;
                }
            }
        }

        if !aliases.is_empty() {
            declaration.alias_table = Some(aliases);
        }
    }

    /// One member per declared name, or one for an embedded type
    fn field_declaration(
        &self,
        node: Node,
        attached: &Attached,
        members: &mut Vec<Member>,
        aliases: &mut AliasTable,
    ) {
        let ty = node.child_by_field_name("type");

        let mut cursor = node.walk();
        let mut names: Vec<String> = node
            .children_by_field_name("name", &mut cursor)
            .map(|n| self.text(n))
            .collect();
        if names.is_empty() {
            names.extend(ty.and_then(|t| self.embedded_name(t)));
        }

        let type_name = ty.and_then(|t| self.type_name(t));
        let tag = node
            .child_by_field_name("tag")
            .map(|t| tags::literal_value(node_text(t, self.source)));
        // Fields the encoding drops have no external name to describe
        let omitted = tag
            .as_deref()
            .filter(|t| tags::omits(t, self.alias_tag))
            .map(|_| format!("{}:\"-\"", self.alias_tag));

        for name in names {
            if let Some(alias) = tag.as_deref().and_then(|t| tags::alias(t, self.alias_tag)) {
                aliases.insert(name.clone(), alias);
            }

            let mut member = Member::new(name);
            member.comments = attached.comments.clone();
            member.attribute_markers = attached.markers.clone();
            member.attribute_markers.extend(omitted.clone());
            member.type_name = type_name.clone();
            members.push(member);
        }
    }

    /// Zero-argument, single-result methods become computed members
    fn method_declaration(&mut self, node: Node, attached: Attached) {
        let Some(receiver) = node
            .child_by_field_name("receiver")
            .and_then(|r| r.named_child(0))
            .and_then(|p| p.child_by_field_name("type"))
            .and_then(|t| self.receiver_name(t))
        else {
            return;
        };
        let Some(name) = node.child_by_field_name("name").map(|n| self.text(n)) else {
            return;
        };

        let params = node
            .child_by_field_name("parameters")
            .map(|p| p.named_child_count())
            .unwrap_or(0);
        let result = node.child_by_field_name("result");
        if params != 0 || result_count(result) != 1 {
            debug!("Method {}.{} is not a computed member", receiver, name);
            return;
        }

        let mut member = Member::new(name).computed();
        member.comments = attached.comments;
        member.attribute_markers = attached.markers;
        member.type_name = result
            .filter(|r| r.kind() != "parameter_list")
            .and_then(|r| self.type_name(r));

        self.methods.push((receiver, member));
    }

    fn finish(mut self, diagnostics: Vec<Diagnostic>) -> Introspection {
        self.resolve_defined_kinds();

        for (receiver, member) in std::mem::take(&mut self.methods) {
            match self.declarations.iter_mut().find(|d| d.name == receiver) {
                Some(declaration) => declaration.members.push(member),
                None => debug!(
                    "Receiver {} of {} is declared in another file",
                    receiver, member.name
                ),
            }
        }

        Introspection {
            package: self.package,
            declarations: self.declarations,
            type_params: self.type_params,
            kinds: self.kinds,
            diagnostics,
        }
    }

    /// `type A B` shares the underlying type of `B`, so a definition over an
    /// interface or pointer type declared in this file cannot take methods
    /// either. Types from other files or packages stay `Defined`.
    fn resolve_defined_kinds(&mut self) {
        for _ in 0..self.defined_as.len() {
            let mut changed = false;

            for (name, target) in &self.defined_as {
                if self.kinds.contains_key(name) {
                    continue;
                }
                if let Some(kind @ (TypeKind::Interface | TypeKind::Pointer)) =
                    self.kinds.get(target).copied()
                {
                    self.kinds.insert(name.clone(), kind);
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }
    }

    /// Named type a field refers to, looking through pointers, slices and arrays
    fn type_name(&self, ty: Node) -> Option<String> {
        match ty.kind() {
            "type_identifier" | "qualified_type" => Some(self.text(ty)),
            "pointer_type" | "parenthesized_type" => {
                ty.named_child(0).and_then(|t| self.type_name(t))
            }
            "slice_type" | "array_type" => ty
                .child_by_field_name("element")
                .and_then(|t| self.type_name(t)),
            "generic_type" => ty
                .child_by_field_name("type")
                .and_then(|t| self.type_name(t)),
            _ => None,
        }
    }

    /// Member name of an embedded field: the unqualified type name
    fn embedded_name(&self, ty: Node) -> Option<String> {
        match ty.kind() {
            "qualified_type" => ty.child_by_field_name("name").map(|n| self.text(n)),
            "generic_type" => ty
                .child_by_field_name("type")
                .and_then(|t| self.embedded_name(t)),
            "pointer_type" => ty.named_child(0).and_then(|t| self.embedded_name(t)),
            "type_identifier" => Some(self.text(ty)),
            _ => None,
        }
    }

    fn receiver_name(&self, ty: Node) -> Option<String> {
        match ty.kind() {
            "pointer_type" | "parenthesized_type" => {
                ty.named_child(0).and_then(|t| self.receiver_name(t))
            }
            "generic_type" => ty
                .child_by_field_name("type")
                .and_then(|t| self.receiver_name(t)),
            "type_identifier" => Some(self.text(ty)),
            _ => None,
        }
    }
}

fn unparenthesized(ty: Node) -> Node {
    match ty.kind() {
        "parenthesized_type" => ty.named_child(0).map(unparenthesized).unwrap_or(ty),
        _ => ty,
    }
}

fn type_parameter_count(params: Node) -> usize {
    let mut cursor = params.walk();
    let declarations: Vec<Node> = params.named_children(&mut cursor).collect();

    declarations
        .into_iter()
        .map(|decl| {
            let mut cursor = decl.walk();
            let count = decl
                .children(&mut cursor)
                .filter(|c| c.kind() == "identifier")
                .count();
            count
        })
        .sum()
}

/// Number of values a method returns
fn result_count(result: Option<Node>) -> usize {
    let Some(result) = result else {
        return 0;
    };
    if result.kind() != "parameter_list" {
        return 1;
    }

    let mut cursor = result.walk();
    let declarations: Vec<Node> = result.named_children(&mut cursor).collect();
    declarations
        .into_iter()
        .filter(|d| d.kind() == "parameter_declaration")
        .map(|decl| {
            let mut cursor = decl.walk();
            let names = decl.children_by_field_name("name", &mut cursor).count();
            names.max(1)
        })
        .sum()
}

fn attach_trailing(declaration: &mut Declaration, comment: RawComment) {
    let mut attached = Attached::default();
    attached.push_trailing(comment);
    declaration.comments.extend(attached.comments);
    declaration.has_attributes |= !attached.markers.is_empty();
}

fn attach_trailing_member(member: &mut Member, comment: RawComment) {
    let mut attached = Attached::default();
    attached.push_trailing(comment);
    member.comments.extend(attached.comments);
    member.attribute_markers.extend(attached.markers);
}

fn collect_diagnostics(node: Node, diagnostics: &mut Vec<Diagnostic>) {
    let line = node.start_position().row + 1;

    if node.is_error() {
        diagnostics.push(Diagnostic {
            line,
            message: "syntax error".to_string(),
        });
        return;
    }
    if node.is_missing() {
        diagnostics.push(Diagnostic {
            line,
            message: format!("missing {}", node.kind()),
        });
        return;
    }
    if !node.has_error() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_diagnostics(child, diagnostics);
    }
}
