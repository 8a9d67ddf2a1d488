//! Undo/redo snapshot manager.
//!
//! DESIGN
//! ======
//! Every structural mutation (add, delete, format, mirror, clear) first pushes
//! a full deep copy of the collection onto a bounded undo stack and drops the
//! redo stack. Undo and redo swap whole collections; nothing is diffed.
//!
//! TRADE-OFFS
//! ==========
//! Whole-collection copies are simple and cannot miss a variant field, at the
//! cost of memory proportional to `capacity * marks`. Mark collections are
//! small (tens of marks) so this stays cheap.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collection::MarkCollection;
use crate::mark::{GestureFlags, Mark};

/// Immutable deep copy of the mark collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    marks: Vec<Mark>,
}

impl Snapshot {
    /// Copy every mark, dropping transient gesture state.
    #[must_use]
    pub fn capture(collection: &MarkCollection) -> Self {
        let marks = collection
            .iter()
            .cloned()
            .map(|mut mark| {
                mark.gesture = GestureFlags::default();
                mark
            })
            .collect();
        Self { marks }
    }

    #[must_use]
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    fn restore_into(self, collection: &mut MarkCollection) {
        collection.replace_all(self.marks);
    }
}

/// Bounded undo stack plus redo stack.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    capacity: usize,
}

impl History {
    /// `capacity` is clamped to at least one snapshot.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { undo: VecDeque::new(), redo: Vec::new(), capacity: capacity.max(1) }
    }

    /// Snapshot `collection` before a structural change and invalidate redo.
    pub fn record_before_mutation(&mut self, collection: &MarkCollection) {
        self.push_undo(Snapshot::capture(collection));
        self.redo.clear();
    }

    /// Restore the most recent undo snapshot. Returns `false` when there is none.
    pub fn undo(&mut self, collection: &mut MarkCollection) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            return false;
        };
        self.redo.push(Snapshot::capture(collection));
        previous.restore_into(collection);
        debug!(undo = self.undo.len(), redo = self.redo.len(), "history: undo");
        true
    }

    /// Re-apply the most recently undone snapshot. Returns `false` when there is none.
    pub fn redo(&mut self, collection: &mut MarkCollection) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        self.push_undo(Snapshot::capture(collection));
        next.restore_into(collection);
        debug!(undo = self.undo.len(), redo = self.redo.len(), "history: redo");
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
    }
}
