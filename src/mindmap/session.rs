//! # Session
//!
//! Context for the interactive shell: the map currently open (if any) and the
//! node the user has navigated into (the cursor). Everything the shell needs
//! between commands lives here, so the shell loop itself holds no state.
//!
//! The cursor only changes through [`Session::go`], and is reset when a map is
//! swapped out or when the node under it is deleted.

use crate::api::MindmapApi;
use crate::commands::export::RenderOptions;
use crate::commands::list::Listing;
use crate::commands::search::SearchHit;
use crate::commands::{node_not_found, CmdMessage, CmdResult};
use crate::error::{MindmapError, Result};
use crate::model::{Node, NodeId};
use crate::store::MapStore;
use crate::tree::Issue;
use std::path::Path;

/// Where the cursor is.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub node: Node,
    /// Texts from the owning card down to the node.
    pub path: Vec<String>,
    pub parent: Option<Node>,
    pub child_count: usize,
}

#[derive(Debug)]
pub struct Session<S: MapStore> {
    api: Option<MindmapApi<S>>,
    cursor: Option<NodeId>,
}

impl<S: MapStore> Default for Session<S> {
    fn default() -> Self {
        Self {
            api: None,
            cursor: None,
        }
    }
}

impl<S: MapStore> Session<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.api.is_some()
    }

    pub fn api(&self) -> Option<&MindmapApi<S>> {
        self.api.as_ref()
    }

    pub fn cursor(&self) -> Option<&NodeId> {
        self.cursor.as_ref()
    }

    pub fn location(&self) -> Option<String> {
        self.api.as_ref().map(|api| api.location())
    }

    fn loaded(&self) -> Result<&MindmapApi<S>> {
        self.api.as_ref().ok_or(MindmapError::NoMap)
    }

    fn loaded_mut(&mut self) -> Result<&mut MindmapApi<S>> {
        self.api.as_mut().ok_or(MindmapError::NoMap)
    }

    fn replace(&mut self, api: MindmapApi<S>) {
        self.api = Some(api);
        self.cursor = None;
    }

    /// Creates an empty map in `store` and makes it current.
    pub fn new_map(&mut self, store: S, force: bool) -> Result<CmdResult> {
        let result = MindmapApi::create(store, force)?;
        let messages = result.messages;
        self.replace(result.payload);
        Ok(CmdResult {
            payload: (),
            messages,
        })
    }

    /// Opens the map in `store`. A missing map opens empty, bound to `store`.
    pub fn load(&mut self, store: S) -> Result<CmdResult> {
        let opened = MindmapApi::open(store)?;
        let mut messages = opened.messages;
        let api = opened.payload;
        if messages.is_empty() {
            messages.push(CmdMessage::success(format!(
                "Mind map loaded successfully from '{}'.",
                api.location()
            )));
        }
        self.replace(api);
        Ok(CmdResult {
            payload: (),
            messages,
        })
    }

    pub fn save(&mut self) -> Result<CmdResult> {
        self.loaded_mut()?.save()
    }

    pub fn save_as(&mut self, store: S) -> Result<CmdResult> {
        self.loaded_mut()?.save_as(store)
    }

    /// Moves the cursor: `/` to the top level, `..` one level up (a card goes
    /// back to the top level), anything else is a node id.
    pub fn go(&mut self, target: &str) -> Result<CmdResult> {
        let api = self.loaded()?;
        let tree = api.tree();

        let next = match target {
            "/" => None,
            ".." => {
                let Some(current) = &self.cursor else {
                    return Ok(CmdResult::default()
                        .with_message(CmdMessage::info("Already at the top level.")));
                };
                tree.get(current.as_str()).and_then(|n| n.parent_id.clone())
            }
            id => Some(
                tree.get(id)
                    .ok_or_else(|| node_not_found(id, ""))?
                    .id
                    .clone(),
            ),
        };

        let message = match next.as_ref().and_then(|id| tree.get(id.as_str())) {
            Some(node) => format!("Now at '{}' (ID: {}).", node.text, node.id),
            None => "At the top level.".to_string(),
        };
        self.cursor = next;
        Ok(CmdResult::default().with_message(CmdMessage::info(message)))
    }

    /// Describes the cursor, or `None` at the top level.
    pub fn current(&self) -> Result<CmdResult<Option<Position>>> {
        let api = self.loaded()?;
        let tree = api.tree();

        let Some(node) = self.cursor.as_ref().and_then(|id| tree.get(id.as_str())) else {
            let message = format!(
                "At the top level of '{}' ({} card(s)).",
                api.location(),
                tree.root_ids().len()
            );
            return Ok(CmdResult::new(None).with_message(CmdMessage::info(message)));
        };

        let position = Position {
            node: node.clone(),
            path: tree.path_texts(node.id.as_str()).unwrap_or_default(),
            parent: node
                .parent_id
                .as_ref()
                .and_then(|p| tree.get(p.as_str()))
                .cloned(),
            child_count: node.children_ids.len(),
        };
        Ok(CmdResult::new(Some(position)))
    }

    /// Adds under `parent_id`, or under the cursor when none is given.
    pub fn add(&mut self, text: &str, parent_id: Option<&str>) -> Result<CmdResult<Node>> {
        let parent = parent_id
            .map(str::to_string)
            .or_else(|| self.cursor.as_ref().map(|c| c.to_string()));
        self.loaded_mut()?.add(text, parent.as_deref())
    }

    /// Lists relative to the cursor.
    pub fn list(&self, recursive: bool, options: RenderOptions) -> Result<CmdResult<Listing>> {
        let cursor = self.cursor.as_ref().map(NodeId::as_str);
        self.loaded()?.list(cursor, recursive, options)
    }

    pub fn delete(&mut self, node_id: &str, confirm_root: bool) -> Result<CmdResult<Vec<NodeId>>> {
        let mut result = self.loaded_mut()?.delete(node_id, confirm_root)?;
        // The orphan safeguard can take the cursor's node too, so check the tree.
        let cursor_gone = match (&self.cursor, &self.api) {
            (Some(cursor), Some(api)) => !api.tree().contains(cursor.as_str()),
            _ => false,
        };
        if cursor_gone {
            self.cursor = None;
            result.add_message(CmdMessage::info("Returned to the top level."));
        }
        Ok(result)
    }

    /// Edits `node_id`, or the node under the cursor when none is given.
    pub fn edit(&mut self, node_id: Option<&str>, text: &str) -> Result<CmdResult<String>> {
        let target = match node_id {
            Some(id) => id.to_string(),
            None => self.cursor.as_ref().map(NodeId::to_string).ok_or_else(|| {
                MindmapError::InvalidOperation(
                    "No node selected. Give an ID or 'go' to a node first.".into(),
                )
            })?,
        };
        self.loaded_mut()?.edit(&target, text)
    }

    pub fn move_node(&mut self, node_id: &str, new_parent_id: &str) -> Result<CmdResult> {
        self.loaded_mut()?.move_node(node_id, new_parent_id)
    }

    pub fn search(&self, term: &str) -> Result<CmdResult<Vec<SearchHit>>> {
        self.loaded()?.search(term)
    }

    pub fn export(&self, options: RenderOptions) -> Result<CmdResult<Option<String>>> {
        self.loaded()?.export(options)
    }

    pub fn export_to_file(&self, path: &Path, options: RenderOptions) -> Result<CmdResult> {
        self.loaded()?.export_to_file(path, options)
    }

    pub fn doctor(&self) -> Result<CmdResult<Vec<Issue>>> {
        self.loaded()?.doctor()
    }
}
