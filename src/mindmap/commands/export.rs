use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Node;
use crate::tree::TreeStore;
use std::collections::HashSet;
use std::io::Write;
use tracing::warn;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const SPACE_INDENT: &str = "    ";

/// Rule printed between card blocks.
pub const SEPARATOR: &str = "--------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_ids: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { show_ids: true }
    }
}

impl RenderOptions {
    fn label(&self, node: &Node) -> String {
        if self.show_ids {
            format!("{} (ID: {})", node.text, node.id)
        } else {
            node.text.clone()
        }
    }
}

/// Renders `id` and everything under it as a connector-drawn tree.
///
/// Cards get a `[CARD ROOT]` marker on their first line. A node listed again
/// further down (looping `children_ids` in a damaged map) is drawn only once.
pub fn render_subtree(tree: &TreeStore, id: &str, options: RenderOptions) -> Option<String> {
    let top = tree.get(id)?;
    let mut lines = vec![if top.is_root() {
        format!("{} [CARD ROOT]", options.label(top))
    } else {
        options.label(top)
    }];

    // (node, indent, last among siblings), popped in display order.
    let mut stack: Vec<(&Node, String, bool)> = Vec::new();
    let mut drawn = HashSet::from([&top.id]);
    push_children(tree, top, String::new(), &mut stack);

    while let Some((node, indent, is_last)) = stack.pop() {
        if !drawn.insert(&node.id) {
            warn!(node = %node.id, "node reached twice while rendering; skipping");
            continue;
        }
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        lines.push(format!("{indent}{connector}{}", options.label(node)));

        let child_indent = format!(
            "{indent}{}",
            if is_last { SPACE_INDENT } else { PIPE_INDENT }
        );
        push_children(tree, node, child_indent, &mut stack);
    }

    Some(lines.join("\n"))
}

fn push_children<'a>(
    tree: &'a TreeStore,
    node: &Node,
    indent: String,
    stack: &mut Vec<(&'a Node, String, bool)>,
) {
    let children = tree.children_of(node.id.as_str());
    let count = children.len();
    for (i, child) in children.into_iter().enumerate().rev() {
        stack.push((child, indent.clone(), i + 1 == count));
    }
}

/// Every card as a tree, each block followed by a [`SEPARATOR`] line.
pub fn render_forest(tree: &TreeStore, options: RenderOptions) -> String {
    tree.root_ids()
        .iter()
        .filter_map(|id| render_subtree(tree, id.as_str(), options))
        .map(|block| format!("{block}\n{SEPARATOR}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the whole map. With `dest` the text is written there, otherwise it
/// becomes the payload.
pub fn run(
    tree: &TreeStore,
    dest: Option<&mut dyn Write>,
    options: RenderOptions,
) -> Result<CmdResult<Option<String>>> {
    if tree.roots().is_empty() {
        return Ok(CmdResult::new(None)
            .with_message(CmdMessage::info("Map has no cards, nothing to export.")));
    }

    let content = render_forest(tree, options);
    match dest {
        Some(out) => {
            out.write_all(content.as_bytes())?;
            out.write_all(b"\n")?;
            out.flush()?;
            Ok(CmdResult::new(None)
                .with_message(CmdMessage::success("Mind map export content written.")))
        }
        None => Ok(CmdResult::new(Some(content))
            .with_message(CmdMessage::success("Mind map export content generated."))),
    }
}
