//! Bounded undo history.
//!
//! Entries are kept oldest first. Pushing past capacity silently drops the
//! oldest entry; popping always returns the newest one.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct UndoStack<T> {
    /// Snapshots, oldest at the front.
    entries: VecDeque<T>,
    /// Maximum number of snapshots to keep.
    capacity: usize,
}

impl<T> UndoStack<T> {
    /// Create an empty stack holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a snapshot, returning the evicted oldest entry if the stack was full.
    pub fn push(&mut self, entry: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(entry);
        }
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    /// Remove and return the most recent snapshot.
    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
impl<T> UndoStack<T> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
