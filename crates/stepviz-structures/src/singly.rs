//! Singly linked list built from owned boxed nodes.

use std::fmt;

use crate::{check_delete, check_insert, LinkedSequence, Result, StructureError, Value};

struct Node {
    value: Value,
    next: Option<Box<Node>>,
}

/// A singly linked list. Each node owns its successor.
#[derive(Default)]
pub struct SinglyLinkedList {
    head: Option<Box<Node>>,
    len: usize,
}

impl SinglyLinkedList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate values from head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    fn node_mut(&mut self, position: usize) -> Result<&mut Node> {
        let out_of_range = StructureError::PositionOutOfRange {
            position,
            len: self.len,
        };
        let mut node = self.head.as_deref_mut().ok_or(out_of_range)?;
        for _ in 0..position {
            node = node.next.as_deref_mut().ok_or(out_of_range)?;
        }
        Ok(node)
    }
}

impl LinkedSequence for SinglyLinkedList {
    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, position: usize) -> Option<Value> {
        self.iter().nth(position)
    }

    fn insert_at_beginning(&mut self, value: Value) {
        let next = self.head.take();
        self.head = Some(Box::new(Node { value, next }));
        self.len += 1;
    }

    fn insert_at_end(&mut self, value: Value) {
        let node = Box::new(Node { value, next: None });
        if self.len == 0 {
            self.head = Some(node);
            self.len = 1;
            return;
        }
        if let Ok(tail) = self.node_mut(self.len - 1) {
            tail.next = Some(node);
            self.len += 1;
        }
    }

    fn insert_at_position(&mut self, value: Value, position: usize) -> Result<()> {
        check_insert(position, self.len)?;
        if position == 0 {
            self.insert_at_beginning(value);
            return Ok(());
        }

        let prev = self.node_mut(position - 1)?;
        let next = prev.next.take();
        prev.next = Some(Box::new(Node { value, next }));
        self.len += 1;
        Ok(())
    }

    fn delete_at_beginning(&mut self) -> Option<Value> {
        let mut head = self.head.take()?;
        self.head = head.next.take();
        self.len -= 1;
        Some(head.value)
    }

    fn delete_at_end(&mut self) -> Option<Value> {
        let last = self.len.checked_sub(1)?;
        self.delete_at_position(last).ok()
    }

    fn delete_at_position(&mut self, position: usize) -> Result<Value> {
        let len = self.len;
        check_delete(position, len)?;
        let out_of_range = StructureError::PositionOutOfRange { position, len };
        if position == 0 {
            return self.delete_at_beginning().ok_or(out_of_range);
        }

        let prev = self.node_mut(position - 1)?;
        let mut removed = prev.next.take().ok_or(out_of_range)?;
        prev.next = removed.next.take();
        self.len -= 1;
        Ok(removed.value)
    }

    fn traverse(&self) -> Vec<Value> {
        self.iter().collect()
    }

    fn position_of(&self, value: Value) -> Option<usize> {
        self.iter().position(|v| v == value)
    }
}

impl Drop for SinglyLinkedList {
    fn drop(&mut self) {
        // Unlink iteratively so long lists don't recurse through Box drops.
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
        }
    }
}

impl Clone for SinglyLinkedList {
    fn clone(&self) -> Self {
        self.iter().collect()
    }
}

impl FromIterator<Value> for SinglyLinkedList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let values: Vec<Value> = iter.into_iter().collect();
        let mut list = Self::new();
        for value in values.into_iter().rev() {
            list.insert_at_beginning(value);
        }
        list
    }
}

impl fmt::Debug for SinglyLinkedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over the values of a [`SinglyLinkedList`].
pub struct Iter<'a> {
    next: Option<&'a Node>,
}

impl Iterator for Iter<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            node.value
        })
    }
}
