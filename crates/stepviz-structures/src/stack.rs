//! LIFO stack with its top at the highest index.

use crate::Value;

/// A stack of values. `pop` and `peek` on an empty stack return `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stack {
    items: Vec<Value>,
}

impl Stack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a value onto the top.
    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    /// Remove and return the top value.
    pub fn pop(&mut self) -> Option<Value> {
        self.items.pop()
    }

    /// Return the top value without removing it.
    pub fn peek(&self) -> Option<Value> {
        self.items.last().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items from bottom to top.
    pub fn items(&self) -> &[Value] {
        &self.items
    }
}

impl FromIterator<Value> for Stack {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
