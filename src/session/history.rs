//! Snapshot-based undo/redo
//!
//! Every undoable operation records the whole screenshot (image handle plus
//! annotation list) before it mutates anything. Images sit behind an `Arc`,
//! so a snapshot costs one annotation-list clone.

use std::collections::VecDeque;

use crate::domain::Screenshot;

/// Oldest snapshots are evicted past this depth
pub const MAX_UNDO_DEPTH: usize = 50;

#[derive(Clone, Debug, Default)]
pub struct History {
    undo: VecDeque<Screenshot>,
    redo: Vec<Screenshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the state before a new mutation; clears the redo stack
    pub fn record(&mut self, before: Screenshot) {
        self.push_undo(before);
        self.redo.clear();
    }

    /// Swap `current` for the previous state. Returns false on an empty stack.
    pub fn undo(&mut self, current: &mut Screenshot) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            return false;
        };
        self.redo.push(std::mem::replace(current, previous));
        true
    }

    /// Swap `current` for the next state. Returns false on an empty stack.
    pub fn redo(&mut self, current: &mut Screenshot) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        let previous = std::mem::replace(current, next);
        self.push_undo(previous);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    fn push_undo(&mut self, snapshot: Screenshot) {
        self.undo.push_back(snapshot);
        while self.undo.len() > MAX_UNDO_DEPTH {
            self.undo.pop_front();
        }
    }
}
