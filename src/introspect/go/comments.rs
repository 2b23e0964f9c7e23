//! Comment grouping and attachment
//!
//! Go has no dedicated doc-comment syntax. A comment group (comments on
//! consecutive lines) that ends on the line directly above a declaration is
//! its documentation; any other group before it is an ordinary comment, as is
//! a comment trailing the declaration on its last line. Lines starting with
//! `+` (kubebuilder-style markers) or `//go:` directives are attributes and
//! never become description text.

use descgen_synth::CommentBlock;
use tree_sitter::Node;

use super::parser::node_text;

/// A comment node as written in source
#[derive(Debug, Clone)]
pub struct RawComment {
    start_row: usize,
    end_row: usize,
    text: String,
}

impl RawComment {
    pub fn from_node(node: Node, source: &str) -> Self {
        Self {
            start_row: node.start_position().row,
            end_row: node.end_position().row,
            text: node_text(node, source).to_string(),
        }
    }
}

/// Comments and attribute markers attached to one declaration or member
#[derive(Debug, Clone, Default)]
pub struct Attached {
    pub comments: Vec<CommentBlock>,
    pub markers: Vec<String>,
}

impl Attached {
    fn push_group(&mut self, group: &[RawComment], doc: bool) {
        let (text, markers) = split_group(group);
        self.markers.extend(markers);
        if let Some(text) = text {
            self.comments.push(if doc {
                CommentBlock::doc(text)
            } else {
                CommentBlock::plain(text)
            });
        }
    }

    /// Add a comment that trails the code on its line
    pub fn push_trailing(&mut self, comment: RawComment) {
        self.push_group(std::slice::from_ref(&comment), false);
    }
}

/// Tracks comments seen since the last piece of code in a node list
#[derive(Debug, Default)]
pub struct CommentCursor {
    pending: Vec<RawComment>,
    last_code_row: Option<usize>,
}

impl CommentCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a comment node
    ///
    /// Returns the comment when it trails code on the same line; the caller
    /// decides whether that code owns it.
    pub fn comment(&mut self, node: Node, source: &str) -> Option<RawComment> {
        let comment = RawComment::from_node(node, source);
        if self.last_code_row == Some(comment.start_row) {
            return Some(comment);
        }
        self.pending.push(comment);
        None
    }

    /// Feed a code node, returning the comments that lead it
    pub fn code(&mut self, node: Node) -> Attached {
        let pending = std::mem::take(&mut self.pending);
        self.last_code_row = Some(node.end_position().row);
        attach(&pending, node.start_position().row)
    }
}

/// Split leading comments into groups and classify them against `target_row`
fn attach(comments: &[RawComment], target_row: usize) -> Attached {
    let mut attached = Attached::default();
    let mut groups: Vec<&[RawComment]> = Vec::new();
    let mut start = 0;

    for i in 1..=comments.len() {
        let breaks = i == comments.len() || comments[i].start_row > comments[i - 1].end_row + 1;
        if breaks {
            groups.push(&comments[start..i]);
            start = i;
        }
    }

    for group in groups {
        let doc = group
            .last()
            .is_some_and(|last| last.end_row + 1 == target_row);
        attached.push_group(group, doc);
    }

    attached
}

/// Separate a comment group into description text and attribute markers
fn split_group(group: &[RawComment]) -> (Option<String>, Vec<String>) {
    let mut lines = Vec::new();
    let mut markers = Vec::new();

    for comment in group {
        if comment.text.starts_with("//go:") {
            markers.push(comment.text.clone());
            continue;
        }

        for line in comment_lines(&comment.text) {
            if line.trim_start().starts_with('+') {
                markers.push(line.trim().to_string());
            } else {
                lines.push(line);
            }
        }
    }

    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    let first = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());

    let text = lines[first..].join("\n");
    ((!text.is_empty()).then_some(text), markers)
}

/// Content lines of a comment with delimiters removed
fn comment_lines(text: &str) -> Vec<String> {
    if let Some(line) = text.strip_prefix("//") {
        let line = line.strip_prefix(' ').unwrap_or(line);
        return vec![line.trim_end().to_string()];
    }

    let body = text
        .strip_prefix("/*")
        .map(|rest| rest.strip_suffix("*/").unwrap_or(rest))
        .unwrap_or(text);

    body.lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line).to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(row: usize, text: &str) -> RawComment {
        RawComment {
            start_row: row,
            end_row: row,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_adjacent_group_is_doc() {
        let comments = [
            raw(0, "// detached"),
            raw(2, "// Pet is a pet."),
            raw(3, "// It has a name."),
        ];
        let attached = attach(&comments, 4);

        assert_eq!(
            attached.comments,
            vec![
                CommentBlock::plain("detached"),
                CommentBlock::doc("Pet is a pet.\nIt has a name."),
            ]
        );
    }

    #[test]
    fn test_gap_makes_group_plain() {
        let attached = attach(&[raw(0, "// above a blank line")], 2);
        assert_eq!(
            attached.comments,
            vec![CommentBlock::plain("above a blank line")]
        );
    }

    #[test]
    fn test_markers_are_split_out() {
        let comments = [
            raw(0, "// +kubebuilder:object:root=true"),
            raw(1, "//go:generate stringer -type=Kind"),
            raw(2, "// Kind is a kind."),
            raw(3, "// +optional"),
        ];
        let attached = attach(&comments, 4);

        assert_eq!(attached.comments, vec![CommentBlock::doc("Kind is a kind.")]);
        assert_eq!(
            attached.markers,
            vec![
                "+kubebuilder:object:root=true",
                "//go:generate stringer -type=Kind",
                "+optional",
            ]
        );
    }

    #[test]
    fn test_marker_only_group_has_no_text() {
        let attached = attach(&[raw(0, "// +optional")], 1);
        assert!(attached.comments.is_empty());
        assert_eq!(attached.markers, vec!["+optional"]);
    }

    #[test]
    fn test_block_comment_lines() {
        assert_eq!(
            comment_lines("/*\n * First\n * Second\n */"),
            vec!["", "First", "Second", ""]
        );
        let (text, _) = split_group(&[RawComment {
            start_row: 0,
            end_row: 3,
            text: "/*\n * First\n * Second\n */".to_string(),
        }]);
        assert_eq!(text.as_deref(), Some("First\nSecond"));
    }

    #[test]
    fn test_blank_comment_lines_inside_group_are_kept() {
        let (text, _) = split_group(&[raw(0, "// One"), raw(1, "//"), raw(2, "// Two")]);
        assert_eq!(text.as_deref(), Some("One\n\nTwo"));
    }
}
