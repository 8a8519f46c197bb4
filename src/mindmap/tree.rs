//! # Tree Store
//!
//! The in-memory map: an arena of [`Node`]s keyed by [`NodeId`] plus the ordered
//! list of card (root) ids. Nodes refer to each other only by id, never by
//! reference, so every structural change is a handful of map edits.
//!
//! ## Invariants
//!
//! Held before and after every public mutation:
//!
//! 1. No node is deeper than [`MAX_DEPTH`].
//! 2. A node's parent exists and lists the node among its children.
//! 3. A node is in `root_ids` exactly when it has no parent.
//! 4. Parent chains reach a root within `MAX_DEPTH + 1` steps (no cycles).
//! 5. Every node is reachable from some card.
//!
//! Operations that can be rejected validate first and mutate last, so a rejected
//! call leaves the store exactly as it was. [`TreeStore::check`] reports any
//! violations found in data that was loaded from disk.

use crate::error::{MindmapError, Result};
use crate::model::{Node, NodeId};
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fmt;
use tracing::{debug, warn};

/// Deepest level a node may sit at (card = 0).
pub const MAX_DEPTH: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStore {
    nodes: BTreeMap<NodeId, Node>,
    root_ids: Vec<NodeId>,
}

/// What a subtree removal took out of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removal {
    /// The target and all of its descendants.
    pub removed: Vec<NodeId>,
    /// Nodes dropped by the orphan safeguard (no cards left but nodes remained).
    pub discarded_orphans: Vec<NodeId>,
}

/// A structural problem found by [`TreeStore::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    DanglingRoot(NodeId),
    MissingParent { id: NodeId, parent: NodeId },
    NotListedByParent { id: NodeId, parent: NodeId },
    DanglingChild { id: NodeId, child: NodeId },
    DuplicateChild { id: NodeId, child: NodeId },
    RootMismatch(NodeId),
    DepthMismatch { id: NodeId, expected: usize, actual: usize },
    DepthExceeded { id: NodeId, depth: usize },
    Cycle(NodeId),
    Orphan(NodeId),
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::DanglingRoot(id) => write!(f, "card {id} is listed but has no node"),
            Issue::MissingParent { id, parent } => {
                write!(f, "node {id} points to missing parent {parent}")
            }
            Issue::NotListedByParent { id, parent } => {
                write!(f, "node {id} is not listed among the children of {parent}")
            }
            Issue::DanglingChild { id, child } => {
                write!(f, "node {id} lists missing child {child}")
            }
            Issue::DuplicateChild { id, child } => {
                write!(f, "node {id} lists child {child} more than once")
            }
            Issue::RootMismatch(id) => {
                write!(f, "node {id} disagrees with the card list about being a root")
            }
            Issue::DepthMismatch {
                id,
                expected,
                actual,
            } => write!(f, "node {id} has depth {actual}, expected {expected}"),
            Issue::DepthExceeded { id, depth } => {
                write!(f, "node {id} sits at depth {depth}, beyond max depth {MAX_DEPTH}")
            }
            Issue::Cycle(id) => write!(f, "node {id} is part of a parent cycle"),
            Issue::Orphan(id) => write!(f, "node {id} is not reachable from any card"),
        }
    }
}

/// Everything a validated move needs, computed without touching the store.
struct MovePlan {
    node_id: NodeId,
    old_parent: Option<NodeId>,
    new_parent: NodeId,
    depths: Vec<(NodeId, usize)>,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a store from already-decoded parts. Used by the codec, which
    /// is responsible for pruning dangling card ids.
    pub(crate) fn from_parts(nodes: BTreeMap<NodeId, Node>, root_ids: Vec<NodeId>) -> Self {
        Self { nodes, root_ids }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn root_ids(&self) -> &[NodeId] {
        &self.root_ids
    }

    pub fn roots(&self) -> Vec<&Node> {
        self.root_ids
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.root_ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn is_root(&self, id: &str) -> bool {
        self.root_ids.iter().any(|r| r == id)
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Adds a new card at the end of the card list.
    pub fn create_root(&mut self, text: impl Into<String>) -> &Node {
        let node = Node::root(text);
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        if !self.root_ids.contains(&id) {
            self.root_ids.push(id.clone());
        }
        &self.nodes[&id]
    }

    /// Appends a child under `parent_id`.
    ///
    /// Returns `None` when the parent does not exist or already sits at
    /// [`MAX_DEPTH`].
    pub fn add_child(&mut self, parent_id: &str, text: impl Into<String>) -> Option<&Node> {
        let parent = self.nodes.get(parent_id)?;
        if parent.depth + 1 > MAX_DEPTH {
            return None;
        }
        let node = Node::child_of(parent, text);
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        self.nodes.get_mut(parent_id)?.children_ids.push(id.clone());
        self.nodes.get(&id)
    }

    /// Direct children in display order. Child ids that do not resolve are skipped.
    pub fn children_of(&self, id: &str) -> Vec<&Node> {
        self.nodes
            .get(id)
            .map(|node| {
                node.children_ids
                    .iter()
                    .filter_map(|child| self.nodes.get(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Nodes from the owning card down to `id`.
    ///
    /// `None` when `id` is unknown, or when the parent chain is broken or loops.
    pub fn path_to(&self, id: &str) -> Option<Vec<&Node>> {
        let mut current = self.nodes.get(id)?;
        let mut path = Vec::new();
        let mut seen = HashSet::new();

        loop {
            if !seen.insert(&current.id) {
                warn!(node = %id, "circular parent chain detected");
                return None;
            }
            path.push(current);
            let Some(parent_id) = &current.parent_id else {
                break;
            };
            match self.nodes.get(parent_id) {
                Some(parent) => current = parent,
                None => {
                    warn!(
                        node = %current.id,
                        parent = %parent_id,
                        "inconsistent map data: parent not found"
                    );
                    return None;
                }
            }
        }

        path.reverse();
        Some(path)
    }

    pub fn path_texts(&self, id: &str) -> Option<Vec<String>> {
        self.path_to(id)
            .map(|path| path.into_iter().map(|n| n.text.clone()).collect())
    }

    /// Replaces a node's text, returning the previous one.
    pub fn set_text(&mut self, id: &str, text: impl Into<String>) -> Option<String> {
        let node = self.nodes.get_mut(id)?;
        Some(std::mem::replace(&mut node.text, text.into()))
    }

    /// Case-insensitive substring search over every node's text, in store order.
    pub fn find_by_text(&self, needle: &str) -> Vec<&Node> {
        let needle = needle.to_lowercase();
        self.nodes
            .values()
            .filter(|node| node.text.to_lowercase().contains(&needle))
            .collect()
    }

    /// Deletes `id` and its whole subtree. `false` if `id` is unknown.
    pub fn delete(&mut self, id: &str) -> bool {
        self.remove_subtree(id).is_some()
    }

    /// Deletes `id` and its whole subtree, reporting what was removed.
    pub fn remove_subtree(&mut self, id: &str) -> Option<Removal> {
        let target = self.nodes.get(id)?;
        let target_id = target.id.clone();
        let parent_id = target.parent_id.clone();

        // Breadth-first order, reversed, removes descendants before their parents.
        let order = self.subtree_ids(&target_id);

        if let Some(parent_id) = parent_id {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children_ids.retain(|c| c != &target_id);
            }
        }
        self.root_ids.retain(|r| r != &target_id);

        let mut removal = Removal::default();
        for node_id in order.into_iter().rev() {
            if self.nodes.remove(&node_id).is_some() {
                removal.removed.push(node_id);
            }
        }

        if self.root_ids.is_empty() && !self.nodes.is_empty() {
            warn!(
                count = self.nodes.len(),
                "no cards left but nodes remain; discarding orphaned nodes"
            );
            removal.discarded_orphans = self.nodes.keys().cloned().collect();
            self.nodes.clear();
        }

        debug!(node = %target_id, removed = removal.removed.len(), "deleted subtree");
        Some(removal)
    }

    /// Re-parents `node_id` under `new_parent_id`, carrying its subtree along.
    ///
    /// Rejected moves leave the store untouched:
    /// - unknown node or parent: `NotFound`
    /// - moving a card, onto the current parent, under itself, or under one of
    ///   its own descendants: `InvalidOperation`
    /// - any node of the subtree ending up beyond [`MAX_DEPTH`]: `MaxDepthReached`
    pub fn move_node(&mut self, node_id: &str, new_parent_id: &str) -> Result<()> {
        let plan = self.plan_move(node_id, new_parent_id)?;
        self.apply_move(plan);
        Ok(())
    }

    fn plan_move(&self, node_id: &str, new_parent_id: &str) -> Result<MovePlan> {
        let node = self.get(node_id).ok_or_else(|| {
            MindmapError::NotFound(format!("Node to move (ID: {node_id}) not found."))
        })?;
        let new_parent = self.get(new_parent_id).ok_or_else(|| {
            MindmapError::NotFound(format!(
                "New parent card/node (ID: {new_parent_id}) not found."
            ))
        })?;

        if self.is_root(node_id) || node.parent_id.is_none() {
            return Err(MindmapError::InvalidOperation(
                "Cannot move a root card. Delete and re-add if necessary.".into(),
            ));
        }
        if node.parent_id.as_ref() == Some(&new_parent.id) {
            return Err(MindmapError::InvalidOperation(
                "Node is already under the specified parent.".into(),
            ));
        }
        if new_parent.id == node.id {
            return Err(MindmapError::InvalidOperation(
                "Cannot move a node under itself.".into(),
            ));
        }

        let mut seen = HashSet::new();
        let mut ancestor = Some(new_parent);
        while let Some(current) = ancestor {
            if current.id == node.id {
                return Err(MindmapError::InvalidOperation(format!(
                    "Cannot move node '{}' under '{}'. This would create a circular dependency.",
                    node.text, new_parent.text
                )));
            }
            if !seen.insert(&current.id) {
                break;
            }
            ancestor = current.parent_id.as_ref().and_then(|p| self.nodes.get(p));
        }

        let base = new_parent.depth + 1;
        let mut depths = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([&node.id]);

        while let Some(current_id) = queue.pop_front() {
            if !visited.insert(current_id) {
                continue;
            }
            let Some(current) = self.nodes.get(current_id) else {
                continue;
            };
            let new_depth = base + current.depth.saturating_sub(node.depth);
            if new_depth > MAX_DEPTH {
                let message = if current.id == node.id {
                    format!(
                        "Moving node '{}' to depth {new_depth} exceeds max depth ({MAX_DEPTH}).",
                        node.text
                    )
                } else {
                    format!(
                        "Moving '{}' would place its descendant '{}' (ID: {}) at depth {new_depth}, exceeding max depth ({MAX_DEPTH}).",
                        node.text, current.text, current.id
                    )
                };
                return Err(MindmapError::MaxDepthReached(message));
            }
            depths.push((current.id.clone(), new_depth));
            queue.extend(current.children_ids.iter());
        }

        Ok(MovePlan {
            node_id: node.id.clone(),
            old_parent: node.parent_id.clone(),
            new_parent: new_parent.id.clone(),
            depths,
        })
    }

    fn apply_move(&mut self, plan: MovePlan) {
        if let Some(old_parent) = &plan.old_parent {
            if let Some(old) = self.nodes.get_mut(old_parent) {
                old.children_ids.retain(|c| c != &plan.node_id);
            }
        }
        if let Some(parent) = self.nodes.get_mut(&plan.new_parent) {
            if !parent.children_ids.contains(&plan.node_id) {
                parent.children_ids.push(plan.node_id.clone());
            }
        }
        if let Some(node) = self.nodes.get_mut(&plan.node_id) {
            node.parent_id = Some(plan.new_parent);
        }
        for (id, depth) in plan.depths {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.depth = depth;
            }
        }
    }

    /// Ids of `id` and all its descendants in breadth-first order.
    fn subtree_ids(&self, id: &NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([id.clone()]);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(node) = self.nodes.get(&current) {
                queue.extend(node.children_ids.iter().cloned());
            }
            order.push(current);
        }
        order
    }

    /// Reports every invariant violation. An empty list means the store is sound.
    pub fn check(&self) -> Vec<Issue> {
        let mut issues = Vec::new();

        for root_id in &self.root_ids {
            if !self.nodes.contains_key(root_id) {
                issues.push(Issue::DanglingRoot(root_id.clone()));
            }
        }

        for node in self.nodes.values() {
            if node.depth > MAX_DEPTH {
                issues.push(Issue::DepthExceeded {
                    id: node.id.clone(),
                    depth: node.depth,
                });
            }

            match &node.parent_id {
                Some(parent_id) => match self.nodes.get(parent_id) {
                    None => issues.push(Issue::MissingParent {
                        id: node.id.clone(),
                        parent: parent_id.clone(),
                    }),
                    Some(parent) => {
                        if !parent.children_ids.contains(&node.id) {
                            issues.push(Issue::NotListedByParent {
                                id: node.id.clone(),
                                parent: parent_id.clone(),
                            });
                        }
                        if node.depth != parent.depth + 1 {
                            issues.push(Issue::DepthMismatch {
                                id: node.id.clone(),
                                expected: parent.depth + 1,
                                actual: node.depth,
                            });
                        }
                    }
                },
                None if node.depth != 0 => issues.push(Issue::DepthMismatch {
                    id: node.id.clone(),
                    expected: 0,
                    actual: node.depth,
                }),
                None => {}
            }

            if node.parent_id.is_none() != self.is_root(node.id.as_str()) {
                issues.push(Issue::RootMismatch(node.id.clone()));
            }

            let mut listed = HashSet::new();
            for child in &node.children_ids {
                if !listed.insert(child) {
                    issues.push(Issue::DuplicateChild {
                        id: node.id.clone(),
                        child: child.clone(),
                    });
                } else if !self.nodes.contains_key(child) {
                    issues.push(Issue::DanglingChild {
                        id: node.id.clone(),
                        child: child.clone(),
                    });
                }
            }

            if self.has_parent_cycle(node) {
                issues.push(Issue::Cycle(node.id.clone()));
            }
        }

        let mut reachable = HashSet::new();
        for root_id in &self.root_ids {
            reachable.extend(self.subtree_ids(root_id));
        }
        for id in self.nodes.keys() {
            if !reachable.contains(id) {
                issues.push(Issue::Orphan(id.clone()));
            }
        }

        issues
    }

    fn has_parent_cycle(&self, node: &Node) -> bool {
        let mut seen = HashSet::from([&node.id]);
        let mut current = node;
        while let Some(parent) = current.parent_id.as_ref().and_then(|p| self.nodes.get(p)) {
            if !seen.insert(&parent.id) {
                return true;
            }
            current = parent;
        }
        false
    }

    #[cfg(test)]
    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Project -> Task -> Subtask
    fn project_tree() -> (TreeStore, NodeId, NodeId, NodeId) {
        let mut tree = TreeStore::new();
        let project = tree.create_root("Project").id.clone();
        let task = tree.add_child(project.as_str(), "Task").unwrap().id.clone();
        let subtask = tree.add_child(task.as_str(), "Subtask").unwrap().id.clone();
        (tree, project, task, subtask)
    }

    /// Two cards A and B, with children A1 and B1.
    fn two_cards() -> (TreeStore, [NodeId; 4]) {
        let mut tree = TreeStore::new();
        let a = tree.create_root("A").id.clone();
        let b = tree.create_root("B").id.clone();
        let a1 = tree.add_child(a.as_str(), "A1").unwrap().id.clone();
        let b1 = tree.add_child(b.as_str(), "B1").unwrap().id.clone();
        (tree, [a, b, a1, b1])
    }

    fn assert_depth_invariant(tree: &TreeStore) {
        for node in tree.nodes() {
            let expected = match &node.parent_id {
                Some(p) => tree.get(p.as_str()).unwrap().depth + 1,
                None => 0,
            };
            assert_eq!(node.depth, expected, "depth of {}", node.text);
            assert!(node.depth <= MAX_DEPTH);
        }
    }

    #[test]
    fn create_root_appends_card() {
        let mut tree = TreeStore::new();
        let first = tree.create_root("First").id.clone();
        let second = tree.create_root("Second").id.clone();

        assert_eq!(tree.root_ids(), &[first.clone(), second]);
        let node = tree.get(first.as_str()).unwrap();
        assert_eq!(node.depth, 0);
        assert!(node.parent_id.is_none());
        assert!(tree.check().is_empty());
    }

    #[test]
    fn add_child_links_parent_and_depth() {
        let (tree, project, task, subtask) = project_tree();
        assert_eq!(tree.get(task.as_str()).unwrap().depth, 1);
        assert_eq!(tree.get(subtask.as_str()).unwrap().depth, 2);
        assert_eq!(
            tree.get(project.as_str()).unwrap().children_ids,
            vec![task.clone()]
        );
        assert_depth_invariant(&tree);
    }

    #[test]
    fn add_child_refuses_beyond_max_depth() {
        let (mut tree, _, _, subtask) = project_tree();
        assert!(tree.add_child(subtask.as_str(), "Too deep").is_none());
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn add_child_to_missing_parent() {
        let mut tree = TreeStore::new();
        assert!(tree.add_child("nope", "Orphan").is_none());
        assert!(tree.is_empty());
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut tree = TreeStore::new();
        let root = tree.create_root("Root").id.clone();
        for text in ["one", "two", "three"] {
            tree.add_child(root.as_str(), text);
        }
        let texts: Vec<_> = tree
            .children_of(root.as_str())
            .iter()
            .map(|n| n.text.as_str())
            .collect();
        assert_eq!(texts, ["one", "two", "three"]);
        assert!(tree.children_of("missing").is_empty());
    }

    #[test]
    fn path_runs_from_card_to_node() {
        let (tree, _, _, subtask) = project_tree();
        assert_eq!(
            tree.path_texts(subtask.as_str()).unwrap(),
            vec!["Project", "Task", "Subtask"]
        );
        assert!(tree.path_to("missing").is_none());
    }

    #[test]
    fn path_detects_cycles_and_broken_links() {
        let (mut tree, project, task, subtask) = project_tree();
        tree.node_mut(project.as_str()).unwrap().parent_id = Some(subtask.clone());
        assert!(tree.path_to(task.as_str()).is_none());

        let (mut tree, _, task, subtask) = project_tree();
        tree.node_mut(task.as_str()).unwrap().parent_id = Some(NodeId::from("ghost"));
        assert!(tree.path_to(subtask.as_str()).is_none());
    }

    #[test]
    fn delete_removes_whole_subtree() {
        let (mut tree, [a, b, a1, b1]) = two_cards();
        let deep = tree.add_child(a1.as_str(), "A1a").unwrap().id.clone();

        assert!(tree.delete(a.as_str()));
        for gone in [&a, &a1, &deep] {
            assert!(tree.get(gone.as_str()).is_none());
        }
        for node in tree.nodes() {
            assert!(!node.children_ids.contains(&a1));
            assert!(!node.children_ids.contains(&deep));
        }
        assert_eq!(tree.root_ids(), &[b.clone()]);
        assert!(tree.get(b1.as_str()).is_some());
        assert!(tree.check().is_empty());
    }

    #[test]
    fn delete_child_detaches_from_parent() {
        let (mut tree, project, task, subtask) = project_tree();
        let removal = tree.remove_subtree(task.as_str()).unwrap();
        assert_eq!(removal.removed.len(), 2);
        assert!(removal.removed.contains(&subtask));
        assert!(removal.discarded_orphans.is_empty());
        assert!(tree.get(project.as_str()).unwrap().children_ids.is_empty());
    }

    #[test]
    fn delete_unknown_is_false() {
        let (mut tree, ..) = project_tree();
        assert!(!tree.delete("missing"));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn deleting_last_card_discards_orphans() {
        let (mut tree, project, ..) = project_tree();
        let mut stray = Node::root("stray");
        stray.parent_id = Some(NodeId::from("ghost"));
        let stray_id = stray.id.clone();
        tree.nodes.insert(stray_id.clone(), stray);

        let removal = tree.remove_subtree(project.as_str()).unwrap();
        assert_eq!(removal.discarded_orphans, vec![stray_id]);
        assert!(tree.is_empty());
    }

    #[test]
    fn find_is_case_insensitive() {
        let (tree, ..) = project_tree();
        let found = tree.find_by_text("TASK");
        assert_eq!(found.len(), 2);
        assert!(tree.find_by_text("nothing").is_empty());
    }

    #[test]
    fn move_between_cards() {
        let (mut tree, [a, _, a1, b1]) = two_cards();
        tree.move_node(a1.as_str(), b1.as_str()).unwrap();

        let moved = tree.get(a1.as_str()).unwrap();
        assert_eq!(moved.depth, 2);
        assert_eq!(moved.parent_id.as_ref(), Some(&b1));
        assert!(tree.get(a.as_str()).unwrap().children_ids.is_empty());
        assert_eq!(tree.get(b1.as_str()).unwrap().children_ids, vec![a1.clone()]);
        assert_depth_invariant(&tree);
        assert!(tree.check().is_empty());
    }

    #[test]
    fn move_carries_descendant_depths() {
        let (mut tree, [_, b, a1, b1]) = two_cards();
        let leaf = tree.add_child(b1.as_str(), "B1a").unwrap().id.clone();
        // Lift leaf up to the card, then move B1 (now childless) under A1.
        tree.move_node(leaf.as_str(), b.as_str()).unwrap();
        assert_eq!(tree.get(leaf.as_str()).unwrap().depth, 1);
        tree.move_node(b1.as_str(), a1.as_str()).unwrap();
        assert_eq!(tree.get(b1.as_str()).unwrap().depth, 2);
        assert_depth_invariant(&tree);
    }

    #[test]
    fn move_rejects_roots() {
        let (mut tree, [_, b, a1, _]) = two_cards();
        let before = tree.clone();
        let err = tree.move_node(b.as_str(), a1.as_str()).unwrap_err();
        assert!(matches!(err, MindmapError::InvalidOperation(_)));
        assert_eq!(tree, before);
    }

    #[test]
    fn move_rejects_cycles() {
        let (mut tree, project, task, subtask) = project_tree();
        let before = tree.clone();

        let err = tree.move_node(task.as_str(), subtask.as_str()).unwrap_err();
        assert!(err.to_string().contains("circular dependency"));
        assert!(matches!(
            tree.move_node(project.as_str(), task.as_str()),
            Err(MindmapError::InvalidOperation(_))
        ));
        assert_eq!(tree, before);
    }

    #[test]
    fn move_rejects_same_parent_and_self() {
        let (mut tree, project, task, _) = project_tree();
        assert!(matches!(
            tree.move_node(task.as_str(), project.as_str()),
            Err(MindmapError::InvalidOperation(m)) if m.contains("already under")
        ));
        assert!(matches!(
            tree.move_node(task.as_str(), task.as_str()),
            Err(MindmapError::InvalidOperation(m)) if m.contains("under itself")
        ));
    }

    #[test]
    fn move_rejects_depth_overflow_atomically() {
        let (mut tree, [_, _, a1, b1]) = two_cards();
        tree.add_child(a1.as_str(), "A1a");
        let before = tree.clone();

        // A1 has a child, so under B1 that child would land at depth 3.
        let err = tree.move_node(a1.as_str(), b1.as_str()).unwrap_err();
        assert!(matches!(err, MindmapError::MaxDepthReached(_)));
        assert!(err.to_string().contains("A1a"));
        assert_eq!(tree, before);

        // Nothing at all can go under a node that already sits at max depth.
        let b1a = tree.add_child(b1.as_str(), "B1a").unwrap().id.clone();
        let before = tree.clone();
        let err = tree.move_node(a1.as_str(), b1a.as_str()).unwrap_err();
        assert!(err.to_string().contains("Moving node 'A1' to depth 3"));
        assert_eq!(tree, before);
    }

    #[test]
    fn move_reports_missing_ids() {
        let (mut tree, [_, _, a1, _]) = two_cards();
        let before = tree.clone();
        assert!(matches!(
            tree.move_node("missing", a1.as_str()),
            Err(MindmapError::NotFound(_))
        ));
        assert_eq!(tree, before);
        assert!(matches!(
            tree.move_node(a1.as_str(), "missing"),
            Err(MindmapError::NotFound(_))
        ));
        assert_eq!(tree, before);
    }

    #[test]
    fn paths_stay_short_after_mixed_operations() {
        let (mut tree, [a, b, a1, b1]) = two_cards();
        let x = tree.add_child(a.as_str(), "X").unwrap().id.clone();
        tree.move_node(a1.as_str(), b1.as_str()).unwrap();
        tree.move_node(x.as_str(), b.as_str()).unwrap();
        tree.delete(b1.as_str());
        tree.add_child(x.as_str(), "Y");

        for node in tree.nodes() {
            let path = tree.path_to(node.id.as_str()).unwrap();
            assert!(path.len() <= MAX_DEPTH + 1);
        }
        assert!(tree.check().is_empty());
    }

    #[test]
    fn check_reports_corruption() {
        let (mut tree, project, task, _) = project_tree();
        tree.node_mut(task.as_str()).unwrap().depth = 2;
        tree.node_mut(project.as_str())
            .unwrap()
            .children_ids
            .push(NodeId::from("ghost"));

        let issues = tree.check();
        assert!(issues.contains(&Issue::DanglingChild {
            id: project.clone(),
            child: NodeId::from("ghost"),
        }));
        assert!(issues
            .iter()
            .any(|i| matches!(i, Issue::DepthMismatch { id, .. } if *id == task)));
    }
}
