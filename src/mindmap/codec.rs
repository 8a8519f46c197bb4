//! # Persistence Codec
//!
//! Converts a [`TreeStore`] to and from the on-disk JSON document:
//!
//! ```text
//! {
//!   "root_ids": ["<id>", ...],
//!   "nodes": {
//!     "<id>": { "id", "text", "parent_id", "children_ids", "depth" },
//!     ...
//!   }
//! }
//! ```
//!
//! Decoding is forgiving about references and strict about shape:
//! - the map key wins when it disagrees with a node's embedded `id`,
//! - card ids that point at no loaded node are dropped,
//! - a node entry without `id` or `text` aborts the whole load.

use crate::error::{MindmapError, Result};
use crate::model::{Node, NodeId};
use crate::tree::TreeStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub root_ids: Vec<NodeId>,
    #[serde(default)]
    pub nodes: BTreeMap<String, serde_json::Value>,
}

/// Wire form of a node. `id` and `text` are mandatory, the rest default.
#[derive(Debug, Serialize, Deserialize)]
struct NodeRecord {
    id: NodeId,
    text: String,
    #[serde(default)]
    parent_id: Option<NodeId>,
    #[serde(default)]
    children_ids: Vec<NodeId>,
    #[serde(default)]
    depth: usize,
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            text: node.text.clone(),
            parent_id: node.parent_id.clone(),
            children_ids: node.children_ids.clone(),
            depth: node.depth,
        }
    }
}

pub fn to_document(tree: &TreeStore) -> Result<Document> {
    let mut nodes = BTreeMap::new();
    for node in tree.nodes() {
        let value = serde_json::to_value(NodeRecord::from(node))?;
        nodes.insert(node.id.to_string(), value);
    }
    Ok(Document {
        root_ids: tree.root_ids().to_vec(),
        nodes,
    })
}

pub fn from_document(document: Document) -> Result<TreeStore> {
    if document.root_ids.is_empty() && document.nodes.is_empty() {
        return Ok(TreeStore::new());
    }

    let mut nodes = BTreeMap::new();
    for (key, value) in document.nodes {
        let record: NodeRecord = serde_json::from_value(value)
            .map_err(|e| MindmapError::Format(format!("node '{key}': {e}")))?;
        let id = NodeId::from(key);
        if record.id != id {
            debug!(key = %id, embedded = %record.id, "node id mismatch, using the map key");
        }
        nodes.insert(
            id.clone(),
            Node {
                id,
                text: record.text,
                parent_id: record.parent_id,
                children_ids: record.children_ids,
                depth: record.depth,
            },
        );
    }

    let declared = document.root_ids.len();
    let root_ids: Vec<NodeId> = document
        .root_ids
        .into_iter()
        .filter(|id| nodes.contains_key(id))
        .collect();
    if root_ids.len() != declared {
        debug!(
            dropped = declared - root_ids.len(),
            "dropped card ids with no matching node"
        );
    }

    Ok(TreeStore::from_parts(nodes, root_ids))
}

/// Pretty-printed JSON, the format written to disk.
pub fn to_json(tree: &TreeStore) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_document(tree)?)?)
}

/// Parses a document. Blank input is an empty map.
pub fn from_json(content: &str) -> Result<TreeStore> {
    if content.trim().is_empty() {
        return Ok(TreeStore::new());
    }
    let document: Document = serde_json::from_str(content)?;
    from_document(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeStore {
        let mut tree = TreeStore::new();
        let a = tree.create_root("Alpha").id.clone();
        let b = tree.create_root("Beta").id.clone();
        let a1 = tree.add_child(a.as_str(), "Alpha one").unwrap().id.clone();
        tree.add_child(a1.as_str(), "Alpha one deep");
        tree.add_child(b.as_str(), "Beta one");
        tree
    }

    #[test]
    fn round_trip_is_identity() {
        let tree = sample();
        let json = to_json(&tree).unwrap();
        let loaded = from_json(&json).unwrap();
        assert_eq!(loaded, tree);

        // And stable when repeated.
        assert_eq!(to_json(&loaded).unwrap(), json);
    }

    #[test]
    fn document_shape() {
        let tree = sample();
        let value: serde_json::Value = serde_json::from_str(&to_json(&tree).unwrap()).unwrap();
        let nodes = value["nodes"].as_object().unwrap();
        assert_eq!(nodes.len(), 5);
        for (key, node) in nodes {
            assert_eq!(node["id"], *key);
            assert!(node.get("children_ids").unwrap().is_array());
            assert!(node.get("depth").unwrap().is_u64());
        }
        assert_eq!(value["root_ids"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn empty_inputs_give_empty_store() {
        assert!(from_json("").unwrap().is_empty());
        assert!(from_json("  \n").unwrap().is_empty());
        assert!(from_json(r#"{"root_ids": [], "nodes": {}}"#).unwrap().is_empty());
        assert!(from_json("{}").unwrap().is_empty());
    }

    #[test]
    fn key_wins_over_embedded_id() {
        let json = r#"{
            "root_ids": ["k1"],
            "nodes": { "k1": { "id": "other", "text": "Card", "children_ids": [], "depth": 0 } }
        }"#;
        let tree = from_json(json).unwrap();
        assert_eq!(tree.get("k1").unwrap().id, "k1");
        assert!(tree.get("other").is_none());
    }

    #[test]
    fn dangling_roots_are_dropped() {
        let json = r#"{
            "root_ids": ["ghost", "k1"],
            "nodes": { "k1": { "id": "k1", "text": "Card" } }
        }"#;
        let tree = from_json(json).unwrap();
        assert_eq!(tree.root_ids(), &[NodeId::from("k1")]);
        assert!(tree.check().is_empty());
    }

    #[test]
    fn optional_fields_default() {
        let json = r#"{ "root_ids": ["k1"], "nodes": { "k1": { "id": "k1", "text": "Card" } } }"#;
        let node = from_json(json).unwrap().get("k1").cloned().unwrap();
        assert!(node.parent_id.is_none());
        assert!(node.children_ids.is_empty());
        assert_eq!(node.depth, 0);
    }

    #[test]
    fn missing_required_field_is_a_format_error() {
        let json = r#"{ "root_ids": ["k1"], "nodes": { "k1": { "id": "k1" } } }"#;
        let err = from_json(json).unwrap_err();
        assert!(matches!(err, MindmapError::Format(ref m) if m.contains("k1")));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        assert!(matches!(
            from_json("{ not json"),
            Err(MindmapError::Serialization(_))
        ));
    }
}
