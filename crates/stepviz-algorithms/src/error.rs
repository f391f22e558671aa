//! Input validation errors.

use stepviz_structures::Value;
use thiserror::Error;

use crate::operation::OperationKind;

/// Result type for parsing and validation.
pub type Result<T> = std::result::Result<T, InputError>;

/// Errors raised before a run starts. The screen stays Idle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("enter at least one value")]
    Empty,

    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("position {position} out of range for length {len}")]
    PositionOutOfRange { position: usize, len: usize },

    /// Binary search needs ascending input.
    #[error("values must be sorted in ascending order")]
    Unsorted,

    /// Radix sort works on non-negative integers only.
    #[error("radix sort needs non-negative values, got {0}")]
    NegativeValue(Value),

    /// Counting and radix sort index by value, so decimals are refused.
    #[error("{operation} needs whole numbers, got {value}")]
    NotWhole {
        operation: OperationKind,
        value: Value,
    },

    /// Counting sort allocates one counter per value in range.
    #[error("value range {span} is too wide for counting sort (limit {limit})")]
    RangeTooWide { span: u64, limit: u64 },

    #[error("{operation} cannot run on a {operand}")]
    KindMismatch {
        operation: OperationKind,
        operand: &'static str,
    },

    #[error("unknown operation: {0}")]
    UnknownOperation(String),
}
