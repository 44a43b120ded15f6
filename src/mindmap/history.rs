//! Linear undo/redo over whole-graph snapshots.
//!
//! ```text
//! push(s3)            [s0, s1, s2, s3]   cursor -> s3
//! undo() x2           [s0, s1, s2, s3]   cursor -> s1
//! push(s4)            [s0, s1, s4]       cursor -> s4  (s2, s3 dropped)
//! ```
//!
//! Invariants: the stack is never empty, `cursor < snapshots.len()`, and
//! `snapshots.len() <= max_depth`.

use super::graph::MindGraph;

#[derive(Clone, Debug)]
pub struct History {
    snapshots: Vec<MindGraph>,
    cursor: usize,
    max_depth: usize,
}

impl History {
    pub fn new(initial: MindGraph, max_depth: usize) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            max_depth: max_depth.max(1),
        }
    }

    pub fn current(&self) -> &MindGraph {
        &self.snapshots[self.cursor]
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Drops any redo branch, appends, then evicts the oldest snapshots
    /// beyond the depth limit.
    pub fn push(&mut self, snapshot: MindGraph) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);

        let overflow = self.snapshots.len().saturating_sub(self.max_depth);
        if overflow > 0 {
            self.snapshots.drain(..overflow);
        }
        self.cursor = self.snapshots.len() - 1;
    }

    pub fn undo(&mut self) -> Option<&MindGraph> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    pub fn redo(&mut self) -> Option<&MindGraph> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    pub fn reset(&mut self, initial: MindGraph) {
        self.snapshots = vec![initial];
        self.cursor = 0;
    }

    /// Collapses history to the current snapshot.
    pub fn clear(&mut self) {
        let current = self.current().clone();
        self.reset(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mindmap::node::IdSeq;

    fn snapshot(word: &str) -> MindGraph {
        MindGraph::seeded(word, &mut IdSeq::default())
    }

    fn word(graph: &MindGraph) -> &str {
        graph.nodes()[0].word.as_str()
    }

    #[test]
    fn undo_and_redo_walk_the_stack() {
        let mut history = History::new(snapshot("a"), 10);
        history.push(snapshot("b"));
        history.push(snapshot("c"));

        assert_eq!(history.undo().map(word), Some("b"));
        assert_eq!(history.undo().map(word), Some("a"));
        assert_eq!(history.undo().map(word), None);
        assert_eq!(word(history.current()), "a");

        assert_eq!(history.redo().map(word), Some("b"));
        assert_eq!(history.redo().map(word), Some("c"));
        assert_eq!(history.redo().map(word), None);
    }

    #[test]
    fn push_after_undo_drops_the_redo_branch() {
        let mut history = History::new(snapshot("a"), 10);
        history.push(snapshot("b"));
        history.push(snapshot("c"));
        history.undo();
        history.undo();

        history.push(snapshot("d"));
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.undo().map(word), Some("a"));
    }

    #[test]
    fn depth_limit_evicts_oldest() {
        let mut history = History::new(snapshot("0"), 3);
        for label in ["1", "2", "3", "4"] {
            history.push(snapshot(label));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        history.undo();
        assert_eq!(history.undo().map(word), Some("2"));
        assert!(!history.can_undo());
    }

    #[test]
    fn clear_keeps_only_the_current_snapshot() {
        let mut history = History::new(snapshot("a"), 10);
        history.push(snapshot("b"));
        history.push(snapshot("c"));
        history.undo();

        history.clear();
        assert_eq!(history.len(), 1);
        assert_eq!(word(history.current()), "b");
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn reset_seeds_a_fresh_stack() {
        let mut history = History::new(snapshot("a"), 10);
        history.push(snapshot("b"));
        history.reset(snapshot("z"));
        assert_eq!(history.len(), 1);
        assert_eq!(word(history.current()), "z");
    }
}
