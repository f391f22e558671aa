//! Doubly linked list stored in an index arena.
//!
//! Nodes live in a `Vec` and link to each other by slot index, which keeps
//! the list `Send` and free of shared ownership. Removal swaps the last slot
//! into the hole and re-points that node's neighbours, so every slot in the
//! arena is always a live node.
//!
//! Invariants, checked by [`DoublyLinkedList::check_links`]:
//! - `head.prev` and `tail.next` are `None`
//! - walking `next` from the head visits every node and ends at the tail
//! - walking `prev` from the tail visits the same nodes in reverse

use std::fmt;

use crate::{check_delete, check_insert, LinkedSequence, Result, StructureError, Value};

#[derive(Debug, Clone)]
struct Node {
    value: Value,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A doubly linked list with head and tail links.
#[derive(Clone, Default)]
pub struct DoublyLinkedList {
    nodes: Vec<Node>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl DoublyLinkedList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Values from tail to head, following `prev` links.
    pub fn traverse_backward(&self) -> Vec<Value> {
        let mut values = Vec::with_capacity(self.nodes.len());
        let mut cursor = self.tail;
        while let Some(slot) = cursor {
            values.push(self.nodes[slot].value);
            cursor = self.nodes[slot].prev;
        }
        values
    }

    /// Verify the head/tail invariants and that both directions agree.
    pub fn check_links(&self) -> bool {
        if let Some(head) = self.head {
            if self.nodes[head].prev.is_some() {
                return false;
            }
        }
        if let Some(tail) = self.tail {
            if self.nodes[tail].next.is_some() {
                return false;
            }
        }

        let mut forward = Vec::with_capacity(self.nodes.len());
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            // A cycle would walk past the arena size.
            if forward.len() > self.nodes.len() {
                return false;
            }
            forward.push(slot);
            cursor = self.nodes[slot].next;
        }
        if forward.len() != self.nodes.len() || forward.last().copied() != self.tail {
            return false;
        }

        let mut cursor = self.tail;
        for &expected in forward.iter().rev() {
            if cursor != Some(expected) {
                return false;
            }
            cursor = self.nodes[expected].prev;
        }
        cursor.is_none()
    }

    /// Slot holding the node at `position`, walking from the nearer end.
    fn slot_at(&self, position: usize) -> Option<usize> {
        let len = self.nodes.len();
        if position >= len {
            return None;
        }
        if position <= len / 2 {
            let mut cursor = self.head;
            for _ in 0..position {
                cursor = self.nodes[cursor?].next;
            }
            cursor
        } else {
            let mut cursor = self.tail;
            for _ in 0..(len - 1 - position) {
                cursor = self.nodes[cursor?].prev;
            }
            cursor
        }
    }

    /// Push a node whose links are already decided and wire its neighbours.
    fn link(&mut self, value: Value, prev: Option<usize>, next: Option<usize>) {
        let slot = self.nodes.len();
        self.nodes.push(Node { value, prev, next });
        match prev {
            Some(p) => self.nodes[p].next = Some(slot),
            None => self.head = Some(slot),
        }
        match next {
            Some(n) => self.nodes[n].prev = Some(slot),
            None => self.tail = Some(slot),
        }
    }

    /// Detach the node in `slot` and compact the arena.
    fn unlink(&mut self, slot: usize) -> Value {
        let Node { prev, next, .. } = self.nodes[slot];
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }

        let last = self.nodes.len() - 1;
        let removed = self.nodes.swap_remove(slot);
        if slot != last {
            // The former last node now lives in `slot`.
            let Node { prev, next, .. } = self.nodes[slot];
            match prev {
                Some(p) => self.nodes[p].next = Some(slot),
                None => self.head = Some(slot),
            }
            match next {
                Some(n) => self.nodes[n].prev = Some(slot),
                None => self.tail = Some(slot),
            }
        }
        removed.value
    }
}

impl LinkedSequence for DoublyLinkedList {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn get(&self, position: usize) -> Option<Value> {
        self.slot_at(position).map(|slot| self.nodes[slot].value)
    }

    fn insert_at_beginning(&mut self, value: Value) {
        self.link(value, None, self.head);
    }

    fn insert_at_end(&mut self, value: Value) {
        self.link(value, self.tail, None);
    }

    fn insert_at_position(&mut self, value: Value, position: usize) -> Result<()> {
        let len = self.nodes.len();
        check_insert(position, len)?;
        if position == len {
            self.insert_at_end(value);
            return Ok(());
        }

        let next = self.slot_at(position);
        let prev = next.and_then(|slot| self.nodes[slot].prev);
        self.link(value, prev, next);
        Ok(())
    }

    fn delete_at_beginning(&mut self) -> Option<Value> {
        let head = self.head?;
        Some(self.unlink(head))
    }

    fn delete_at_end(&mut self) -> Option<Value> {
        let tail = self.tail?;
        Some(self.unlink(tail))
    }

    fn delete_at_position(&mut self, position: usize) -> Result<Value> {
        let len = self.nodes.len();
        check_delete(position, len)?;
        let slot = self
            .slot_at(position)
            .ok_or(StructureError::PositionOutOfRange { position, len })?;
        Ok(self.unlink(slot))
    }

    fn traverse(&self) -> Vec<Value> {
        let mut values = Vec::with_capacity(self.nodes.len());
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            values.push(self.nodes[slot].value);
            cursor = self.nodes[slot].next;
        }
        values
    }

    fn position_of(&self, value: Value) -> Option<usize> {
        self.traverse().iter().position(|&v| v == value)
    }
}

impl FromIterator<Value> for DoublyLinkedList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut list = Self::new();
        for value in iter {
            list.insert_at_end(value);
        }
        list
    }
}

impl fmt::Debug for DoublyLinkedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.traverse()).finish()
    }
}
