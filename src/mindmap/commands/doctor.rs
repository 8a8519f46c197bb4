use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::tree::{Issue, TreeStore};

pub fn run(tree: &TreeStore) -> Result<CmdResult<Vec<Issue>>> {
    let issues = tree.check();
    let mut result = CmdResult::default();

    if issues.is_empty() {
        result.add_message(CmdMessage::success(format!(
            "No inconsistencies found ({} node(s) in {} card(s)).",
            tree.len(),
            tree.root_ids().len()
        )));
    } else {
        result.add_message(CmdMessage::warning(format!(
            "Found {} inconsistenc{}:",
            issues.len(),
            if issues.len() == 1 { "y" } else { "ies" }
        )));
        for issue in &issues {
            result.add_message(CmdMessage::info(format!("  - {issue}")));
        }
    }

    result.payload = issues;
    Ok(result)
}
