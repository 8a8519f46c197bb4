use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::MapStore;
use crate::tree::TreeStore;

pub fn run<S: MapStore>(store: &mut S, tree: &TreeStore) -> Result<CmdResult> {
    store.save(tree)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Mind map saved successfully to '{}'",
        store.location()
    ))))
}
