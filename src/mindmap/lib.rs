//! # Mindmap Architecture
//!
//! Mindmap keeps short notes as a forest of **cards** (root nodes), each with
//! children at most two levels deep. One map is one JSON document. The crate is
//! a library first; the `mindmap` binary (one-shot commands plus an
//! interactive shell) is just one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, binary only)                              │
//! │  - Parses arguments, runs the shell, colors output          │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session (session.rs) / API (api.rs)                        │
//! │  - Session: shell context, current map and cursor node      │
//! │  - API: owns one map, persists after successful mutations   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - add, delete, edit, move, search, export, list, doctor    │
//! │  - Returns Result<CmdResult<T>>, never prints               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Tree Store (tree.rs, model.rs)                             │
//! │  - Arena of nodes keyed by id, card order, depth limit      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Codec (codec.rs) + Storage (store/)                        │
//! │  - JSON document, FileStore (disk) / InMemoryStore (tests)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Outcomes and Statuses
//!
//! Every command returns `Result<CmdResult<T>, MindmapError>`. The error's
//! [`Status`](error::Status) (`not_found`, `max_depth_reached`,
//! `invalid_operation`, ...) is what callers branch on; the CLI turns any error
//! into `Error: ...` on stderr and exit code 1.
//!
//! ## Testing Strategy
//!
//! 1. **Tree and commands**: unit tests next to the code, over
//!    [`store::memory::InMemoryStore`] and its fixtures.
//! 2. **API and session**: persistence and cursor behavior, still in memory.
//! 3. **CLI**: `tests/` drives the real binary against a temporary data dir.

pub mod api;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod store;
pub mod tree;
