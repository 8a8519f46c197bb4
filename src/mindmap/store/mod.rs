//! # Storage Layer
//!
//! A map is one JSON document (see [`crate::codec`]). The [`MapStore`] trait
//! hides where that document lives so the API and session layers can be
//! exercised without a filesystem.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: one `.json` file on disk, written atomically
//! - [`memory::InMemoryStore`]: keeps the serialized document in memory (tests)
//!
//! ## Storage Format
//!
//! ```text
//! <data dir>/
//! ├── my_map.json     # default map
//! ├── groceries.json  # any other map created with `new`
//! └── config.json     # MindmapConfig
//! ```

use crate::error::Result;
use crate::tree::TreeStore;

pub mod fs;
pub mod memory;

/// Abstract interface for map storage.
pub trait MapStore {
    /// Whether anything is stored at this location yet.
    fn exists(&self) -> bool;

    /// Load the stored map. `Ok(None)` when nothing is stored.
    fn load(&self) -> Result<Option<TreeStore>>;

    /// Persist the map, replacing whatever was stored.
    fn save(&mut self, tree: &TreeStore) -> Result<()>;

    /// Human-readable location, used in messages.
    fn location(&self) -> String;
}
