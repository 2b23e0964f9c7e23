//! Comment classification

use crate::model::CommentBlock;

/// Extract description text from a sequence of comment blocks
///
/// With `doc_only` set, only documentation blocks are used; otherwise every
/// block contributes in source order. Blocks are joined with a single
/// newline. Blank blocks are skipped, and a result with no visible text is
/// `None` rather than an empty string.
pub fn classify(comments: &[CommentBlock], doc_only: bool) -> Option<String> {
    let text = comments
        .iter()
        .filter(|block| !doc_only || block.is_doc())
        .map(|block| block.text.as_str())
        .filter(|text| !text.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
