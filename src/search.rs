use std::collections::HashSet;

use crate::tree::Tree;
use crate::types::{MatchStatus, Node, NodeId};

pub fn text_matches(text: &str, needle_lower: &str) -> bool {
    // Note: needle should already be lower-cased
    text.to_lowercase().contains(needle_lower)
}

/// Shared row rule for filtering and search: path or key, plus the value for
/// scalar nodes. Containers never match on their contents.
pub fn node_matches(node: &Node, needle_lower: &str) -> bool {
    if text_matches(&node.path, needle_lower) || text_matches(&node.key, needle_lower) {
        return true;
    }
    node.value
        .scalar_text()
        .is_some_and(|text| text_matches(&text, needle_lower))
}

/// Rows of `rows` that match `term`, in row order.
pub fn search(tree: &Tree, rows: &[NodeId], term: &str) -> Vec<NodeId> {
    if term.is_empty() {
        return Vec::new();
    }
    let needle = term.to_lowercase();
    rows.iter()
        .copied()
        .filter(|&id| node_matches(tree.get(id), &needle))
        .collect()
}

/// Index into `rows` of the goto target: an exact path match wins over the
/// first row whose path merely contains `target`.
pub fn goto_index(tree: &Tree, rows: &[NodeId], target: &str) -> Option<usize> {
    if target.is_empty() {
        return None;
    }
    let needle = target.to_lowercase();
    rows.iter()
        .position(|&id| tree.get(id).path.to_lowercase() == needle)
        .or_else(|| rows.iter().position(|&id| text_matches(&tree.get(id).path, &needle)))
}

/// Match list from the last search plus a wrap-around position. Node ids are
/// only meaningful for the tree generation they were taken from.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    term: String,
    matches: Vec<NodeId>,
    members: HashSet<NodeId>,
    index: usize,
    generation: u64,
}

impl SearchState {
    pub fn new(term: &str, matches: Vec<NodeId>, generation: u64) -> Self {
        Self {
            term: term.to_string(),
            members: matches.iter().copied().collect(),
            matches,
            index: 0,
            generation,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Matches valid for a tree of `generation`; stale lists read as empty.
    pub fn matches(&self, generation: u64) -> &[NodeId] {
        if self.generation == generation {
            &self.matches
        } else {
            &[]
        }
    }

    pub fn is_match(&self, generation: u64, id: NodeId) -> bool {
        self.generation == generation && self.members.contains(&id)
    }

    pub fn current(&self, generation: u64) -> Option<NodeId> {
        self.matches(generation).get(self.index).copied()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next(&mut self, generation: u64) -> Option<NodeId> {
        let len = self.matches(generation).len();
        if len == 0 {
            return None;
        }
        self.index = (self.index + 1) % len;
        self.current(generation)
    }

    pub fn prev(&mut self, generation: u64) -> Option<NodeId> {
        let len = self.matches(generation).len();
        if len == 0 {
            return None;
        }
        self.index = (self.index + len - 1) % len;
        self.current(generation)
    }

    pub fn status(&self, generation: u64) -> MatchStatus {
        let count = self.matches(generation).len();
        MatchStatus {
            position: if count == 0 { 0 } else { self.index + 1 },
            count,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
