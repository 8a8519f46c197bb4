use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Opaque node identifier.
///
/// Freshly created nodes get a UUID v4, but any string read back from a map
/// document is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub text: String,
    pub parent_id: Option<NodeId>,
    pub children_ids: Vec<NodeId>,
    // Stored rather than derived; recomputed explicitly when a subtree moves.
    pub depth: usize,
}

impl Node {
    pub fn root(text: impl Into<String>) -> Self {
        Self {
            id: NodeId::generate(),
            text: text.into(),
            parent_id: None,
            children_ids: Vec::new(),
            depth: 0,
        }
    }

    pub fn child_of(parent: &Node, text: impl Into<String>) -> Self {
        Self {
            id: NodeId::generate(),
            text: text.into(),
            parent_id: Some(parent.id.clone()),
            children_ids: Vec::new(),
            depth: parent.depth + 1,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
