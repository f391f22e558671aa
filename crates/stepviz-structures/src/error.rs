//! Error types for stepviz-structures.

use thiserror::Error;

/// Result type for structure mutations.
pub type Result<T> = std::result::Result<T, StructureError>;

/// Errors raised by positional structure operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StructureError {
    /// A positional insert or delete addressed a slot outside the structure.
    #[error("position {position} out of range for length {len}")]
    PositionOutOfRange { position: usize, len: usize },
}
