use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Map, Value};

use crate::types::{Node, NodeId, NodeValue};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

pub fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…", &s[..cut]),
    }
}

fn is_shorthand_name(raw: &str) -> bool {
    let mut chars = raw.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

// Member names that are not plain identifiers use bracket notation so that
// `{"a.b": 1}` and `{"a": {"b": 1}}` never share a path.
pub fn child_path(parent: &str, key: &str) -> String {
    if is_shorthand_name(key) {
        format!("{}.{}", parent, key)
    } else {
        let escaped = key.replace('\\', "\\\\").replace('"', "\\\"");
        format!("{}[\"{}\"]", parent, escaped)
    }
}

/// Arena-backed document tree. Node 0 is the root; parents are referenced by
/// index, so dropping the tree drops every node at once.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    generation: u64,
}

impl Tree {
    pub fn build(value: &Value) -> Self {
        Self::build_with(value, "", "$")
    }

    pub fn build_with(value: &Value, key: &str, path: &str) -> Self {
        let mut tree = Tree {
            nodes: Vec::new(),
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        };
        tree.insert(value, key.to_string(), path.to_string(), None);
        tree
    }

    fn insert(
        &mut self,
        value: &Value,
        key: String,
        path: String,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let payload = match value {
            Value::Object(_) => NodeValue::Object,
            Value::Array(_) => NodeValue::Array,
            Value::String(s) => NodeValue::String(s.clone()),
            Value::Number(n) => NodeValue::Number(n.clone()),
            Value::Bool(b) => NodeValue::Bool(*b),
            Value::Null => NodeValue::Null,
        };
        let base = path.clone();
        self.nodes.push(Node {
            key,
            value: payload,
            path,
            parent,
            children: Vec::new(),
            expanded: false,
        });

        let children: Vec<NodeId> = match value {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| self.insert(v, k.clone(), child_path(&base, k), Some(id)))
                .collect(),
            Value::Array(arr) => arr
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    self.insert(v, format!("[{}]", i), format!("{}[{}]", base, i), Some(id))
                })
                .collect(),
            _ => Vec::new(),
        };
        self.nodes[id.0].children = children;
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes in the subtree rooted at `id`, counting `id` itself.
    pub fn node_count(&self, id: NodeId) -> usize {
        1 + self
            .get(id)
            .children
            .iter()
            .map(|&child| self.node_count(child))
            .sum::<usize>()
    }

    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.get(parent).parent;
        }
        depth
    }

    /// Ancestors of `id`, root first.
    pub fn parent_chain(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.get(id).parent;
        while let Some(parent) = current {
            chain.push(parent);
            current = self.get(parent).parent;
        }
        chain.reverse();
        chain
    }

    pub fn find_path(&self, path: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.path == path).map(NodeId)
    }

    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        self.nodes[id.0].expanded = expanded;
    }

    pub fn expand_all(&mut self) {
        self.nodes.iter_mut().for_each(|n| n.expanded = true);
    }

    pub fn collapse_all(&mut self) {
        self.nodes.iter_mut().for_each(|n| n.expanded = false);
    }

    /// Rebuilds the JSON value of the subtree rooted at `id`.
    pub fn to_value(&self, id: NodeId) -> Value {
        let node = self.get(id);
        match &node.value {
            NodeValue::Object => {
                let mut map = Map::new();
                for &child in &node.children {
                    map.insert(self.get(child).key.clone(), self.to_value(child));
                }
                Value::Object(map)
            }
            NodeValue::Array => {
                Value::Array(node.children.iter().map(|&c| self.to_value(c)).collect())
            }
            NodeValue::String(s) => Value::String(s.clone()),
            NodeValue::Number(n) => Value::Number(n.clone()),
            NodeValue::Bool(b) => Value::Bool(*b),
            NodeValue::Null => Value::Null,
        }
    }
}
