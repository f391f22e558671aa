//! FIFO queue: enqueue at the rear, dequeue from the front.

use std::collections::VecDeque;

use crate::Value;

/// A queue of values. Observers on an empty queue return `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Queue {
    items: VecDeque<Value>,
}

impl Queue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value at the rear.
    pub fn enqueue(&mut self, value: Value) {
        self.items.push_back(value);
    }

    /// Remove and return the front value.
    pub fn dequeue(&mut self) -> Option<Value> {
        self.items.pop_front()
    }

    /// Front value, without removing it.
    pub fn front(&self) -> Option<Value> {
        self.items.front().copied()
    }

    /// Rear value, without removing it.
    pub fn rear(&self) -> Option<Value> {
        self.items.back().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items from front to rear.
    pub fn items(&self) -> Vec<Value> {
        self.items.iter().copied().collect()
    }
}

impl FromIterator<Value> for Queue {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
