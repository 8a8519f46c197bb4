use crate::commands::{node_not_found, CmdMessage, CmdResult};
use crate::error::Result;
use crate::tree::TreeStore;

/// Replaces a node's text. The payload is the text it had before.
pub fn run(tree: &mut TreeStore, node_id: &str, new_text: &str) -> Result<CmdResult<String>> {
    let old_text = tree
        .set_text(node_id, new_text)
        .ok_or_else(|| node_not_found(node_id, " for editing"))?;

    let message = format!("Node ID '{node_id}' text changed from '{old_text}' to '{new_text}'.");
    Ok(CmdResult::new(old_text).with_message(CmdMessage::success(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Status;
    use crate::store::memory::fixtures::MapFixture;

    #[test]
    fn changes_text_and_returns_old() {
        let MapFixture { mut tree, a1, .. } = MapFixture::new();
        let result = run(&mut tree, a1.as_str(), "Renamed").unwrap();
        assert_eq!(result.payload, "A1");
        assert_eq!(tree.get(a1.as_str()).unwrap().text, "Renamed");
        assert!(result.message().contains("from 'A1' to 'Renamed'"));
    }

    #[test]
    fn missing_node() {
        let mut tree = MapFixture::new().tree;
        let err = run(&mut tree, "missing", "x").unwrap_err();
        assert_eq!(err.status(), Status::NotFound);
        assert_eq!(err.to_string(), "Node with ID 'missing' not found for editing.");
    }
}
