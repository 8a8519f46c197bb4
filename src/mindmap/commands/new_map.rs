use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MindmapError, Result};
use crate::store::MapStore;
use crate::tree::TreeStore;

/// Writes an empty map to `store`, refusing to clobber one unless `force`.
pub fn run<S: MapStore>(store: &mut S, force: bool) -> Result<CmdResult<TreeStore>> {
    if store.exists() && !force {
        return Err(MindmapError::AlreadyExists(format!(
            "File '{}' already exists. Use --force to overwrite.",
            store.location()
        )));
    }

    let tree = TreeStore::new();
    store.save(&tree)?;
    let message = format!("Created new empty mind map file: '{}'.", store.location());
    Ok(CmdResult::new(tree).with_message(CmdMessage::success(message)))
}
