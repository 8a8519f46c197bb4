use crate::commands::export::{render_forest, render_subtree, RenderOptions};
use crate::commands::{node_not_found, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Node;
use crate::tree::TreeStore;

/// What `list` shows, relative to the cursor.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    /// Top level: the cards.
    Cards(Vec<Node>),
    /// Inside a node: its direct children.
    Children { parent: Node, children: Vec<Node> },
    /// Recursive listing, already rendered.
    Tree(String),
}

pub fn run(
    tree: &TreeStore,
    cursor: Option<&str>,
    recursive: bool,
    options: RenderOptions,
) -> Result<CmdResult<Listing>> {
    let Some(cursor) = cursor else {
        let cards: Vec<Node> = tree.roots().into_iter().cloned().collect();
        if cards.is_empty() {
            return Ok(CmdResult::new(Listing::Cards(cards))
                .with_message(CmdMessage::info("Map is empty. Use 'add' to create a card.")));
        }
        let listing = if recursive {
            Listing::Tree(render_forest(tree, options))
        } else {
            Listing::Cards(cards)
        };
        return Ok(CmdResult::new(listing));
    };

    let parent = tree
        .get(cursor)
        .ok_or_else(|| node_not_found(cursor, ""))?
        .clone();

    if recursive {
        let rendered = render_subtree(tree, cursor, options)
            .ok_or_else(|| node_not_found(cursor, ""))?;
        return Ok(CmdResult::new(Listing::Tree(rendered)));
    }

    let children: Vec<Node> = tree.children_of(cursor).into_iter().cloned().collect();
    let mut result = CmdResult::new(Listing::Children {
        parent: parent.clone(),
        children,
    });
    if parent.children_ids.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "'{}' has no children.",
            parent.text
        )));
    }
    Ok(result)
}
