use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MindmapError, Result};
use crate::model::Node;
use crate::tree::{TreeStore, MAX_DEPTH};

/// Adds `text` as a new card, or as the last child of `parent_id` when given.
pub fn run(tree: &mut TreeStore, text: &str, parent_id: Option<&str>) -> Result<CmdResult<Node>> {
    let Some(parent_id) = parent_id else {
        let card = tree.create_root(text).clone();
        let message = format!("Created new card '{}' (ID: {}).", text, card.id);
        return Ok(CmdResult::new(card).with_message(CmdMessage::success(message)));
    };

    let parent = tree
        .get(parent_id)
        .ok_or_else(|| MindmapError::NotFound(format!("Parent node with ID '{parent_id}' not found.")))?;
    let parent_desc = format!("node '{}' (ID: {})", parent.text, parent.id);

    if parent.depth >= MAX_DEPTH {
        return Err(MindmapError::MaxDepthReached(format!(
            "Cannot add child to {parent_desc}. Parent is already at max depth ({MAX_DEPTH})."
        )));
    }

    let node = tree.add_child(parent_id, text).cloned().ok_or_else(|| {
        MindmapError::MaxDepthReached(format!(
            "Failed to add node '{text}' under {parent_desc}. It would exceed max depth ({MAX_DEPTH})."
        ))
    })?;
    let message = format!("Added node '{}' (ID: {}) under {}.", text, node.id, parent_desc);
    Ok(CmdResult::new(node).with_message(CmdMessage::success(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Status;

    #[test]
    fn without_parent_creates_card() {
        let mut tree = TreeStore::new();
        let result = run(&mut tree, "Project", None).unwrap();
        assert_eq!(result.payload.depth, 0);
        assert_eq!(tree.root_ids(), &[result.payload.id.clone()]);
        assert!(result.message().contains("Created new card 'Project'"));
    }

    #[test]
    fn depth_limit_scenario() {
        let mut tree = TreeStore::new();
        let project = run(&mut tree, "Project", None).unwrap().payload;
        let task = run(&mut tree, "Task", Some(project.id.as_str()))
            .unwrap()
            .payload;
        let subtask = run(&mut tree, "Subtask", Some(task.id.as_str()))
            .unwrap()
            .payload;
        assert_eq!(task.depth, 1);
        assert_eq!(subtask.depth, 2);

        let err = run(&mut tree, "Too deep", Some(subtask.id.as_str())).unwrap_err();
        assert_eq!(err.status(), Status::MaxDepthReached);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn unknown_parent_is_not_found() {
        let mut tree = TreeStore::new();
        let err = run(&mut tree, "Lost", Some("missing")).unwrap_err();
        assert_eq!(err.status(), Status::NotFound);
        assert!(tree.is_empty());
    }
}
