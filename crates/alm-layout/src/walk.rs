//! Recursion-path guard for the tab-graph walks.
//!
//! Tabs on one axis are totally ordered by value and every link points one
//! way, so the adjacency graph is a DAG. A node may be reached twice through
//! different paths (diamonds are normal) but never twice on the same
//! recursion path.

use std::collections::BTreeSet;

/// Set of nodes on the current recursion path.
#[derive(Debug, Clone)]
pub struct PathGuard<T: Ord + Copy + std::fmt::Debug> {
    path: BTreeSet<T>,
}

impl<T: Ord + Copy + std::fmt::Debug> Default for PathGuard<T> {
    fn default() -> Self {
        Self {
            path: BTreeSet::new(),
        }
    }
}

impl<T: Ord + Copy + std::fmt::Debug> PathGuard<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `node` onto the path. Returns `false` when it already was on it.
    ///
    /// # Panics
    ///
    /// In debug builds, when `node` is already on the path, which means the
    /// tab graph has a cycle.
    pub fn enter(&mut self, node: T) -> bool {
        let fresh = self.path.insert(node);
        debug_assert!(fresh, "cycle in tab graph at {node:?}");
        fresh
    }

    pub fn leave(&mut self, node: T) {
        self.path.remove(&node);
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    #[must_use]
    pub fn is_on_path(&self, node: T) -> bool {
        self.path.contains(&node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_and_leave_track_depth() {
        let mut guard = PathGuard::new();
        assert!(guard.enter(1_u32));
        assert!(guard.enter(2));
        assert_eq!(guard.depth(), 2);
        assert!(guard.is_on_path(1));
        guard.leave(2);
        guard.leave(1);
        assert_eq!(guard.depth(), 0);
    }

    #[test]
    fn reentry_after_leave_is_fine() {
        let mut guard = PathGuard::new();
        guard.enter('a');
        guard.leave('a');
        guard.enter('a');
        assert!(guard.is_on_path('a'));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "cycle in tab graph")]
    fn repeated_node_on_path_panics() {
        let mut guard = PathGuard::new();
        guard.enter(3_u64);
        let _ = guard.enter(3);
    }
}
