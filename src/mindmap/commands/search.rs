use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Node;
use crate::tree::TreeStore;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub node: Node,
    /// Card-to-node chain, `None` when the stored parent links are broken.
    pub path: Option<Vec<Node>>,
}

impl SearchHit {
    /// "Card -> Task -> Node", or just the node text without a path.
    pub fn path_display(&self) -> String {
        match &self.path {
            Some(path) => path
                .iter()
                .map(|n| n.text.as_str())
                .collect::<Vec<_>>()
                .join(" -> "),
            None => self.node.text.clone(),
        }
    }
}

pub fn run(tree: &TreeStore, term: &str) -> Result<CmdResult<Vec<SearchHit>>> {
    let hits: Vec<SearchHit> = tree
        .find_by_text(term)
        .into_iter()
        .map(|node| SearchHit {
            node: node.clone(),
            path: tree
                .path_to(node.id.as_str())
                .map(|path| path.into_iter().cloned().collect()),
        })
        .collect();

    let message = if hits.is_empty() {
        CmdMessage::info(format!("No nodes found containing text '{term}'."))
    } else {
        CmdMessage::success(format!(
            "Found {} node(s) containing '{term}'.",
            hits.len()
        ))
    };
    Ok(CmdResult::new(hits).with_message(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add;
    use crate::error::Status;
    use crate::commands::into_parts;

    #[test]
    fn finds_matches_with_paths() {
        let mut tree = TreeStore::new();
        let project = add::run(&mut tree, "Project", None).unwrap().payload;
        add::run(&mut tree, "Task", Some(project.id.as_str())).unwrap();
        add::run(&mut tree, "Other", None).unwrap();

        let result = run(&tree, "task").unwrap();
        assert_eq!(result.payload.len(), 1);
        let hit = &result.payload[0];
        assert_eq!(hit.node.text, "Task");
        assert_eq!(hit.path_display(), "Project -> Task");
        assert_eq!(result.message(), "Found 1 node(s) containing 'task'.");
    }

    #[test]
    fn every_match_carries_its_own_path() {
        let mut tree = TreeStore::new();
        add::run(&mut tree, "Meeting notes", None).unwrap();
        let finance = add::run(&mut tree, "Finance", None).unwrap().payload;
        let budget = add::run(&mut tree, "Budget", Some(finance.id.as_str()))
            .unwrap()
            .payload;
        add::run(&mut tree, "Budget notes", Some(budget.id.as_str())).unwrap();

        let (status, payload, _) = into_parts(run(&tree, "NOTES"));
        assert_eq!(status, Status::Success);
        let hits = payload.unwrap();
        assert_eq!(hits.len(), 2);

        for hit in &hits {
            let path = hit.path.as_ref().unwrap();
            assert!(tree.is_root(path[0].id.as_str()));
            assert_eq!(path.last().unwrap().id, hit.node.id);
            assert_eq!(path.len(), hit.node.depth + 1);
        }
        let mut shown: Vec<_> = hits.iter().map(SearchHit::path_display).collect();
        shown.sort();
        assert_eq!(
            shown,
            vec!["Finance -> Budget -> Budget notes", "Meeting notes"]
        );
    }

    #[test]
    fn broken_parent_link_gives_no_path() {
        let tree = crate::codec::from_json(
            r#"{
                "root_ids": ["r"],
                "nodes": {
                    "r": {"id": "r", "text": "Root"},
                    "x": {"id": "x", "text": "Root note", "parent_id": "ghost", "depth": 1}
                }
            }"#,
        )
        .unwrap();

        let hits = run(&tree, "root").unwrap().payload;
        assert_eq!(hits.len(), 2);
        let stray = hits.iter().find(|h| h.node.id == "x").unwrap();
        assert!(stray.path.is_none());
        assert_eq!(stray.path_display(), "Root note");
        let card = hits.iter().find(|h| h.node.id == "r").unwrap();
        assert_eq!(card.path_display(), "Root");
    }

    #[test]
    fn no_match_is_still_success() {
        let mut tree = TreeStore::new();
        add::run(&mut tree, "Project", None).unwrap();

        let (status, payload, message) = into_parts(run(&tree, "nothing"));
        assert_eq!(status, Status::Success);
        assert_eq!(payload, Some(vec![]));
        assert_eq!(message, "No nodes found containing text 'nothing'.");
    }
}
