//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for map operations, whether they come from the one-shot CLI or
//! from the interactive shell's [`Session`](crate::session::Session).
//!
//! ## Role and Responsibilities
//!
//! - **Owns** one [`TreeStore`] and the [`MapStore`] it came from
//! - **Dispatches** to the matching `commands::*::run`
//! - **Persists** after every successful mutation (add, delete, edit, move)
//!   and appends the save message to the command's messages
//!
//! Business rules stay in `commands/*.rs`; the API never prints.
//!
//! ## Generic Over MapStore
//!
//! - Production: `MindmapApi<FileStore>`
//! - Testing: `MindmapApi<InMemoryStore>`

use crate::commands::export::RenderOptions;
use crate::commands::list::Listing;
use crate::commands::search::SearchHit;
use crate::commands::{self, CmdMessage, CmdResult};
use crate::error::{MindmapError, Result};
use crate::model::{Node, NodeId};
use crate::store::MapStore;
use crate::tree::{Issue, TreeStore};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug)]
pub struct MindmapApi<S: MapStore> {
    store: S,
    tree: TreeStore,
}

impl<S: MapStore> MindmapApi<S> {
    pub fn new(store: S, tree: TreeStore) -> Self {
        Self { store, tree }
    }

    /// Loads the map held by `store`, or starts an empty one when nothing is
    /// stored yet. The empty map is only written on the first mutation.
    pub fn open(store: S) -> Result<CmdResult<Self>> {
        match store.load()? {
            Some(tree) => Ok(CmdResult::new(Self::new(store, tree))),
            None => {
                let message = format!(
                    "File '{}' not found. Starting with an empty mind map.",
                    store.location()
                );
                Ok(CmdResult::new(Self::new(store, TreeStore::new()))
                    .with_message(CmdMessage::info(message)))
            }
        }
    }

    /// Writes a fresh empty map to `store`.
    pub fn create(mut store: S, force: bool) -> Result<CmdResult<Self>> {
        let result = commands::new_map::run(&mut store, force)?;
        Ok(result.map(|tree| Self::new(store, tree)))
    }

    /// Loads the map held by `store`; `NotFound` when nothing is stored.
    pub fn load(store: S) -> Result<CmdResult<Self>> {
        let result = commands::load::run(&store)?;
        Ok(result.map(|tree| Self::new(store, tree)))
    }

    pub fn tree(&self) -> &TreeStore {
        &self.tree
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    pub fn add(&mut self, text: &str, parent_id: Option<&str>) -> Result<CmdResult<Node>> {
        let result = commands::add::run(&mut self.tree, text, parent_id)?;
        self.persist(result)
    }

    pub fn delete(&mut self, node_id: &str, confirm_root: bool) -> Result<CmdResult<Vec<NodeId>>> {
        let result = commands::delete::run(&mut self.tree, node_id, confirm_root)?;
        self.persist(result)
    }

    pub fn edit(&mut self, node_id: &str, text: &str) -> Result<CmdResult<String>> {
        let result = commands::edit::run(&mut self.tree, node_id, text)?;
        self.persist(result)
    }

    pub fn move_node(&mut self, node_id: &str, new_parent_id: &str) -> Result<CmdResult> {
        let result = commands::move_node::run(&mut self.tree, node_id, new_parent_id)?;
        self.persist(result)
    }

    pub fn search(&self, term: &str) -> Result<CmdResult<Vec<SearchHit>>> {
        commands::search::run(&self.tree, term)
    }

    pub fn list(
        &self,
        cursor: Option<&str>,
        recursive: bool,
        options: RenderOptions,
    ) -> Result<CmdResult<Listing>> {
        commands::list::run(&self.tree, cursor, recursive, options)
    }

    pub fn export(&self, options: RenderOptions) -> Result<CmdResult<Option<String>>> {
        commands::export::run(&self.tree, None, options)
    }

    /// Exports to a text file. An empty map creates no file.
    pub fn export_to_file(&self, path: &Path, options: RenderOptions) -> Result<CmdResult> {
        if self.tree.roots().is_empty() {
            return Ok(commands::export::run(&self.tree, None, options)?.map(|_| ()));
        }
        let file = File::create(path).map_err(MindmapError::Io)?;
        let mut out = BufWriter::new(file);
        commands::export::run(&self.tree, Some(&mut out), options)?;
        Ok(CmdResult::default().with_message(CmdMessage::success(format!(
            "Mind map exported as text tree to: {}",
            path.display()
        ))))
    }

    pub fn doctor(&self) -> Result<CmdResult<Vec<Issue>>> {
        commands::doctor::run(&self.tree)
    }

    pub fn save(&mut self) -> Result<CmdResult> {
        commands::save::run(&mut self.store, &self.tree)
    }

    /// Rebinds the map to `store` and writes it there.
    pub fn save_as(&mut self, store: S) -> Result<CmdResult> {
        self.store = store;
        self.save()
    }

    fn persist<T>(&mut self, mut result: CmdResult<T>) -> Result<CmdResult<T>> {
        let saved = commands::save::run(&mut self.store, &self.tree)?;
        result.messages.extend(saved.messages);
        Ok(result)
    }
}
