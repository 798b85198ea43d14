use serde_json::Number;

/// Index of a node inside a [`crate::tree::Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl NodeKind {
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Object | NodeKind::Array)
    }
}

/// Payload of a node. Containers keep only their shape; their members live
/// in the node's children.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Object,
    Array,
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

impl NodeValue {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeValue::Object => NodeKind::Object,
            NodeValue::Array => NodeKind::Array,
            NodeValue::String(_) => NodeKind::String,
            NodeValue::Number(_) => NodeKind::Number,
            NodeValue::Bool(_) => NodeKind::Boolean,
            NodeValue::Null => NodeKind::Null,
        }
    }

    /// Text used for value matching and copying. `None` for containers.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            NodeValue::Object | NodeValue::Array => None,
            NodeValue::String(s) => Some(s.clone()),
            NodeValue::Number(n) => Some(n.to_string()),
            NodeValue::Bool(b) => Some(b.to_string()),
            NodeValue::Null => Some("null".into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub key: String,               // "" for root, "[i]" for array elements
    pub value: NodeValue,
    pub path: String,              // canonical path, "$" for root
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub expanded: bool,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.value.kind()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    FilterInput,
    QueryInput,
    SearchInput,
    GotoInput,
}

impl Mode {
    pub fn is_input(self) -> bool {
        self != Mode::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Expanded,
    Collapsed,
    Leaf,
}

/// One line of the tree body as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: NodeId,
    pub depth: usize,
    pub indicator: Indicator,
    pub key: String,
    pub kind: NodeKind,
    pub hint: String,            // "{", "[...] (3 items)", "\"text\"", "42", ...
    pub is_cursor: bool,
    pub is_match: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchStatus {
    pub position: usize,         // 1-based, 0 when there are no matches
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub filename: Option<String>,
    pub size: Option<u64>,
    pub node_count: usize,
}
