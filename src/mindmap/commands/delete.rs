use crate::commands::{node_not_found, CmdMessage, CmdResult};
use crate::error::{MindmapError, Result};
use crate::model::NodeId;
use crate::tree::TreeStore;

/// Deletes a node and everything under it. Cards need `confirm_root`.
///
/// The payload lists every removed id (target and descendants).
pub fn run(tree: &mut TreeStore, node_id: &str, confirm_root: bool) -> Result<CmdResult<Vec<NodeId>>> {
    let node = tree
        .get(node_id)
        .ok_or_else(|| node_not_found(node_id, " for deletion"))?;

    if tree.is_root(node_id) && !confirm_root {
        return Err(MindmapError::InvalidOperation(format!(
            "Confirmation required to delete the root card '{}'.",
            node.text
        )));
    }

    let text = node.text.clone();
    let removal = tree
        .remove_subtree(node_id)
        .ok_or_else(|| node_not_found(node_id, " for deletion"))?;

    let mut result = CmdResult::new(removal.removed).with_message(CmdMessage::success(format!(
        "Deleted node '{text}' (ID: {node_id}) and its children."
    )));
    if !removal.discarded_orphans.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "No cards were left; discarded {} unreachable node(s).",
            removal.discarded_orphans.len()
        )));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Status;
    use crate::store::memory::fixtures::MapFixture;

    #[test]
    fn card_needs_confirmation() {
        let MapFixture {
            mut tree, a, a1, ..
        } = MapFixture::new();
        let before = tree.clone();

        let err = run(&mut tree, a.as_str(), false).unwrap_err();
        assert_eq!(err.status(), Status::InvalidOperation);
        assert_eq!(tree, before);

        let result = run(&mut tree, a.as_str(), true).unwrap();
        assert_eq!(result.payload.len(), 2);
        assert!(tree.get(a.as_str()).is_none());
        assert!(tree.get(a1.as_str()).is_none());
        assert_eq!(tree.root_ids().len(), 1);
    }

    #[test]
    fn child_deletes_without_confirmation() {
        let MapFixture {
            mut tree, b, b1, ..
        } = MapFixture::new();
        let result = run(&mut tree, b1.as_str(), false).unwrap();
        assert_eq!(result.payload, vec![b1.clone()]);
        assert!(tree.get(b.as_str()).unwrap().children_ids.is_empty());
    }

    #[test]
    fn missing_node() {
        let mut tree = MapFixture::new().tree;
        let err = run(&mut tree, "missing", true).unwrap_err();
        assert_eq!(err.status(), Status::NotFound);
    }
}
