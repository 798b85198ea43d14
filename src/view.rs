use std::ops::Range;

use crate::search::node_matches;
use crate::tree::{truncate, Tree};
use crate::types::{Indicator, Mode, Node, NodeId, NodeValue, RowView};

const PREVIEW_LIMIT: usize = 200;

/// Flattens the expanded part of `tree` in pre-order and applies the text
/// filter. The filter is ignored while a query is being typed.
pub fn project(tree: &Tree, filter: &str, mode: Mode) -> Vec<NodeId> {
    let mut rows = Vec::new();
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        rows.push(id);
        let node = tree.get(id);
        if node.expanded {
            stack.extend(node.children.iter().rev());
        }
    }

    if filter.is_empty() || mode == Mode::QueryInput {
        return rows;
    }
    let needle = filter.to_lowercase();
    rows.retain(|&id| node_matches(tree.get(id), &needle));
    rows
}

/// Clamps `cursor` into `[0, len - 1]`, or 0 for an empty list.
pub fn clamp_cursor(cursor: usize, len: usize) -> usize {
    cursor.min(len.saturating_sub(1))
}

pub fn value_hint(node: &Node) -> String {
    match &node.value {
        NodeValue::Object if node.expanded => "{".into(),
        NodeValue::Object => format!("{{...}} ({} items)", node.children.len()),
        NodeValue::Array if node.expanded => "[".into(),
        NodeValue::Array => format!("[...] ({} items)", node.children.len()),
        NodeValue::String(s) => format!("\"{}\"", truncate(s, PREVIEW_LIMIT)),
        NodeValue::Number(n) => n.to_string(),
        NodeValue::Bool(b) => b.to_string(),
        NodeValue::Null => "null".into(),
    }
}

fn indicator(node: &Node) -> Indicator {
    if !node.has_children() {
        Indicator::Leaf
    } else if node.expanded {
        Indicator::Expanded
    } else {
        Indicator::Collapsed
    }
}

/// Presentation rows for `window` (clamped to `rows`). Only the rows inside
/// the window are built, so a frame costs its height, not the document size.
pub fn row_views(
    tree: &Tree,
    rows: &[NodeId],
    window: Range<usize>,
    cursor: usize,
    is_match: impl Fn(NodeId) -> bool,
) -> Vec<RowView> {
    let end = window.end.min(rows.len());
    let start = window.start.min(end);
    rows[start..end]
        .iter()
        .enumerate()
        .map(|(offset, &id)| {
            let node = tree.get(id);
            RowView {
                id,
                depth: tree.depth(id),
                indicator: indicator(node),
                key: node.key.clone(),
                kind: node.kind(),
                hint: value_hint(node),
                is_cursor: start + offset == cursor,
                is_match: is_match(id),
            }
        })
        .collect()
}
