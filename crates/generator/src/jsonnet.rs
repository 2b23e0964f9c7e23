//! Jsonnet object rendering

use descgen_synth::DescriptionNode;
use std::collections::BTreeMap;

const KEYWORDS: &[&str] = &[
    "assert",
    "else",
    "error",
    "false",
    "for",
    "function",
    "if",
    "import",
    "importbin",
    "importstr",
    "in",
    "local",
    "null",
    "self",
    "super",
    "tailstrict",
    "then",
    "true",
];

/// Render declaration descriptions as a Jsonnet object literal
pub fn render(descriptions: &BTreeMap<&str, &DescriptionNode>) -> String {
    let mut content = String::new();
    content.push_str("// Generated by descgen. DO NOT EDIT.\n");

    if descriptions.is_empty() {
        content.push_str("{}\n");
        return content;
    }

    content.push_str("{\n");
    for (name, node) in descriptions {
        write_field(&mut content, name, node, 1);
    }
    content.push_str("}\n");

    content
}

fn write_field(content: &mut String, key: &str, node: &DescriptionNode, depth: usize) {
    let indent = "  ".repeat(depth);

    match node {
        DescriptionNode::Text(text) => {
            content.push_str(&format!("{indent}{}: {},\n", field_name(key), quote(text)));
        }
        DescriptionNode::Object(children) => {
            content.push_str(&format!("{indent}{}: {{\n", field_name(key)));
            for (child_key, child) in children {
                write_field(content, child_key, child, depth + 1);
            }
            content.push_str(&format!("{indent}}},\n"));
        }
    }
}

/// Bare identifier when Jsonnet allows it, quoted string otherwise
fn field_name(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        && !KEYWORDS.contains(&key);

    if is_identifier {
        key.to_string()
    } else {
        quote(key)
    }
}

/// Single-quoted Jsonnet string literal
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for c in text.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}
