use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MindmapError, Result};
use crate::tree::TreeStore;

/// Re-parents a node (and its subtree) under `new_parent_id`.
pub fn run(tree: &mut TreeStore, node_id: &str, new_parent_id: &str) -> Result<CmdResult> {
    let node = tree
        .get(node_id)
        .ok_or_else(|| MindmapError::NotFound(format!("Node to move (ID: {node_id}) not found.")))?;
    let parent = tree.get(new_parent_id).ok_or_else(|| {
        MindmapError::NotFound(format!(
            "New parent card/node (ID: {new_parent_id}) not found."
        ))
    })?;
    let message = format!(
        "Moved node '{}' (ID: {}) under '{}' (ID: {}).",
        node.text, node.id, parent.text, parent.id
    );

    tree.move_node(node_id, new_parent_id)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(message)))
}
