//! Ordered mark registry.
//!
//! Insertion order is paint order and hit-test order. The collection is pure
//! storage; behavior lives on the marks and in the engine.

#[cfg(test)]
#[path = "collection_test.rs"]
mod collection_test;

use crate::mark::{Mark, MarkId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkCollection {
    marks: Vec<Mark>,
}

impl MarkCollection {
    #[must_use]
    pub fn new() -> Self {
        Self { marks: Vec::new() }
    }

    /// Append a mark; it is painted last.
    pub fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    /// Remove a mark by id, preserving the order of the rest.
    pub fn remove(&mut self, id: &MarkId) -> Option<Mark> {
        let index = self.position(id)?;
        Some(self.marks.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: &MarkId) -> Option<&Mark> {
        self.marks.iter().find(|m| &m.id == id)
    }

    pub fn get_mut(&mut self, id: &MarkId) -> Option<&mut Mark> {
        self.marks.iter_mut().find(|m| &m.id == id)
    }

    /// Index of a mark in paint order.
    #[must_use]
    pub fn position(&self, id: &MarkId) -> Option<usize> {
        self.marks.iter().position(|m| &m.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mark> {
        self.marks.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Mark> {
        self.marks.iter_mut()
    }

    /// Ids in paint order.
    #[must_use]
    pub fn ids(&self) -> Vec<MarkId> {
        self.marks.iter().map(|m| m.id).collect()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Mark] {
        &self.marks
    }

    /// Replace every mark, e.g. when restoring a snapshot.
    pub fn replace_all(&mut self, marks: Vec<Mark>) {
        self.marks = marks;
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

impl<'a> IntoIterator for &'a MarkCollection {
    type Item = &'a Mark;
    type IntoIter = std::slice::Iter<'a, Mark>;

    fn into_iter(self) -> Self::IntoIter {
        self.marks.iter()
    }
}
