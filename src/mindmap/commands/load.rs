use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MindmapError, Result};
use crate::store::MapStore;
use crate::tree::TreeStore;
use tracing::debug;

pub fn run<S: MapStore>(store: &S) -> Result<CmdResult<TreeStore>> {
    let tree = store.load()?.ok_or_else(|| {
        MindmapError::NotFound(format!("Mind map file '{}' not found.", store.location()))
    })?;
    debug!(location = %store.location(), nodes = tree.len(), "loaded map");

    let mut result = CmdResult::new(tree).with_message(CmdMessage::success(format!(
        "Mind map loaded successfully from '{}'.",
        store.location()
    )));
    let issues = result.payload.check().len();
    if issues > 0 {
        result.add_message(CmdMessage::warning(format!(
            "Map has {issues} structural problem(s). Run 'doctor' for details."
        )));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Status;
    use crate::store::memory::fixtures::MapFixture;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn loads_stored_map() {
        let fixture = MapFixture::new();
        let result = run(&fixture.store()).unwrap();
        assert_eq!(result.payload, fixture.tree);
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn nothing_stored_is_not_found() {
        let err = run(&InMemoryStore::new()).unwrap_err();
        assert_eq!(err.status(), Status::NotFound);
    }

    #[test]
    fn malformed_document_is_an_error() {
        let err = run(&InMemoryStore::with_document("{not json")).unwrap_err();
        assert_eq!(err.status(), Status::Error);
    }

    #[test]
    fn warns_about_structural_problems() {
        let store = InMemoryStore::with_document(
            r#"{"root_ids": [], "nodes": {"x": {"id": "x", "text": "Loose"}}}"#,
        );
        let result = run(&store).unwrap();
        assert!(result.message().contains("Run 'doctor'"));
    }
}
