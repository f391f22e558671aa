//! stepviz Operation Menu
//!
//! The algorithms a user can watch, each written as the textbook version
//! with a [`StepEmitter`](stepviz_engine::StepEmitter) passed in explicitly:
//!
//! - [`sort`]: bubble, selection, insertion, merge, quick, heap, counting,
//!   radix and bucket sort
//! - [`search`]: linear and binary search
//! - [`array`]: insertion and deletion at a position
//! - [`list`], [`stack`], [`queue`]: structure operations
//!
//! User input is parsed with [`parse_values`] and friends, turned into an
//! [`Operation`] through [`OperationKind::build`], and bound to its operand
//! by [`Workload::new`], which rejects invalid combinations before any
//! thread is spawned. A [`Workload`] is the [`Job`](stepviz_engine::Job)
//! handed to the execution controller.

pub mod array;
mod error;
mod input;
pub mod list;
mod operation;
pub mod queue;
pub mod search;
pub mod sort;
pub mod stack;
mod workload;

pub use error::{InputError, Result};
pub use input::{parse_position, parse_value, parse_values};
pub use list::{ListOperation, ListView};
pub use operation::{
    ArrayEdit, Operand, Operation, OperationKind, OperationParams, ScreenKind, SearchAlgorithm,
    SortAlgorithm,
};
pub use queue::QueueOperation;
pub use stack::StackOperation;
pub use workload::{validate, Workload};
