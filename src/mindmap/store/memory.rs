use super::MapStore;
use crate::codec;
use crate::error::Result;
use crate::tree::TreeStore;

/// In-memory storage for testing and development.
/// Does NOT persist data, but still goes through the JSON codec.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    document: Option<String>,
    saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `content` as its document.
    pub fn with_document(content: impl Into<String>) -> Self {
        Self {
            document: Some(content.into()),
            saves: 0,
        }
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// How many times `save` has been called.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl MapStore for InMemoryStore {
    fn exists(&self) -> bool {
        self.document.is_some()
    }

    fn load(&self) -> Result<Option<TreeStore>> {
        self.document
            .as_deref()
            .map(codec::from_json)
            .transpose()
    }

    fn save(&mut self, tree: &TreeStore) -> Result<()> {
        self.document = Some(codec::to_json(tree)?);
        self.saves += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::NodeId;

    /// Two cards, each with one child:
    ///
    /// ```text
    /// A ── A1
    /// B ── B1
    /// ```
    pub struct MapFixture {
        pub tree: TreeStore,
        pub a: NodeId,
        pub b: NodeId,
        pub a1: NodeId,
        pub b1: NodeId,
    }

    impl Default for MapFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MapFixture {
        pub fn new() -> Self {
            let mut tree = TreeStore::new();
            let a = tree.create_root("A").id.clone();
            let b = tree.create_root("B").id.clone();
            let a1 = tree.add_child(a.as_str(), "A1").map(|n| n.id.clone());
            let b1 = tree.add_child(b.as_str(), "B1").map(|n| n.id.clone());
            Self {
                a,
                b,
                a1: a1.unwrap_or_else(|| unreachable!("cards accept children")),
                b1: b1.unwrap_or_else(|| unreachable!("cards accept children")),
                tree,
            }
        }

        /// The fixture map, already saved in an in-memory store.
        pub fn store(&self) -> InMemoryStore {
            let mut store = InMemoryStore::new();
            // Serializing a plain in-memory tree cannot fail.
            let _ = store.save(&self.tree);
            store.saves = 0;
            store
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::MapFixture;
    use super::*;

    #[test]
    fn empty_store_has_nothing() {
        let store = InMemoryStore::new();
        assert!(!store.exists());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let fixture = MapFixture::new();
        let store = fixture.store();
        assert!(store.exists());
        assert_eq!(store.load().unwrap().unwrap(), fixture.tree);
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn bad_document_fails_to_load() {
        let store = InMemoryStore::with_document("[1, 2");
        assert!(store.load().is_err());
    }
}
