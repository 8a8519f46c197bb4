//! # Command Layer
//!
//! One module per action. Commands take a [`TreeStore`](crate::tree::TreeStore)
//! (or a [`MapStore`](crate::store::MapStore) for new/load/save) plus plain Rust
//! arguments and return `Result<CmdResult<T>>`:
//!
//! - `Ok` carries the typed payload and the messages to show the user,
//! - `Err` carries a [`MindmapError`] whose [`status`](MindmapError::status)
//!   names the failure category.
//!
//! Commands never print and never touch the filesystem directly. Export writes
//! into whatever `std::io::Write` the caller hands it.

use crate::error::{MindmapError, Result, Status};

pub mod add;
pub mod config;
pub mod delete;
pub mod doctor;
pub mod edit;
pub mod export;
pub mod list;
pub mod load;
pub mod move_node;
pub mod new_map;
pub mod save;
pub mod search;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Successful outcome of a command: a typed payload plus user-facing messages.
#[derive(Debug, Clone, PartialEq)]
pub struct CmdResult<T = ()> {
    pub payload: T,
    pub messages: Vec<CmdMessage>,
}

impl<T: Default> Default for CmdResult<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> CmdResult<T> {
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            messages: Vec::new(),
        }
    }

    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CmdResult<U> {
        CmdResult {
            payload: f(self.payload),
            messages: self.messages,
        }
    }

    /// All message texts joined by newlines.
    pub fn message(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Flattens a command outcome into `(status, payload, message)` for callers
/// that map statuses themselves (exit codes, HTTP responses).
pub fn into_parts<T>(result: Result<CmdResult<T>>) -> (Status, Option<T>, String) {
    match result {
        Ok(done) => {
            let message = done.message();
            (Status::Success, Some(done.payload), message)
        }
        Err(e) => (e.status(), None, e.to_string()),
    }
}

pub(crate) fn node_not_found(id: &str, purpose: &str) -> MindmapError {
    MindmapError::NotFound(format!("Node with ID '{id}' not found{purpose}."))
}
