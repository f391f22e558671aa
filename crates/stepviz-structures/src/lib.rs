//! stepviz Data Structure Models
//!
//! Minimal mutable structures that the visualized operations act on:
//! - [`SinglyLinkedList`] and [`DoublyLinkedList`], sharing [`LinkedSequence`]
//! - [`Stack`] (LIFO, top at the highest index)
//! - [`Queue`] (FIFO, enqueue at the rear, dequeue from the front)
//!
//! # Invariants
//!
//! Every mutation leaves the structure fully linked and traversable.
//! Positional operations re-validate their position and report
//! [`StructureError::PositionOutOfRange`] instead of corrupting the links.
//! Observers on an empty structure (pop, peek, front, rear) return `None`.

mod doubly;
mod error;
mod queue;
mod singly;
mod stack;

pub use doubly::DoublyLinkedList;
pub use error::{Result, StructureError};
pub use queue::Queue;
pub use singly::SinglyLinkedList;
pub use stack::Stack;

/// Element type held by every structure and sequence.
///
/// Whole numbers and decimals share one representation; integers typed by
/// the user print without a fractional part.
pub type Value = f64;

/// Sentinel returned by [`LinkedSequence::search`] when the value is absent.
pub const SEARCH_NOT_FOUND: isize = -1;

/// Operations shared by the singly and doubly linked lists.
pub trait LinkedSequence {
    /// Number of nodes in the list.
    fn len(&self) -> usize;

    /// Whether the list has no nodes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value stored at `position`, counting from the head.
    fn get(&self, position: usize) -> Option<Value>;

    /// Link a new node in front of the head.
    fn insert_at_beginning(&mut self, value: Value);

    /// Link a new node after the tail.
    fn insert_at_end(&mut self, value: Value);

    /// Link a new node so that it ends up at `position` (`0 ≤ position ≤ len`).
    fn insert_at_position(&mut self, value: Value, position: usize) -> Result<()>;

    /// Unlink the head. Returns `None` on an empty list.
    fn delete_at_beginning(&mut self) -> Option<Value>;

    /// Unlink the tail. Returns `None` on an empty list.
    fn delete_at_end(&mut self) -> Option<Value>;

    /// Unlink the node at `position` (`0 ≤ position < len`).
    fn delete_at_position(&mut self, position: usize) -> Result<Value>;

    /// Values from head to tail.
    fn traverse(&self) -> Vec<Value>;

    /// Position of the first node holding `value`.
    fn position_of(&self, value: Value) -> Option<usize>;

    /// Position of the first node holding `value`, or [`SEARCH_NOT_FOUND`].
    fn search(&self, value: Value) -> isize {
        self.position_of(value)
            .map_or(SEARCH_NOT_FOUND, |position| position as isize)
    }
}

/// Validate an insertion position against the current length.
pub(crate) fn check_insert(position: usize, len: usize) -> Result<()> {
    if position > len {
        return Err(StructureError::PositionOutOfRange { position, len });
    }
    Ok(())
}

/// Validate a deletion position against the current length.
pub(crate) fn check_delete(position: usize, len: usize) -> Result<()> {
    if position >= len {
        return Err(StructureError::PositionOutOfRange { position, len });
    }
    Ok(())
}
