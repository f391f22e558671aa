//! Terminal results of a run.

use std::fmt;

use serde::{Deserialize, Serialize};
use stepviz_structures::Value;

/// What a run produced, surfaced to the user on completion.
///
/// A search miss is an outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The operation finished; the final frame is the result.
    Completed,
    Found { target: Value, index: usize },
    NotFound { target: Value },
    Traversed { values: Vec<Value> },
    Popped { value: Option<Value> },
    Peeked { value: Option<Value> },
    Dequeued { value: Option<Value> },
    FrontRear {
        front: Option<Value>,
        rear: Option<Value>,
    },
}

struct Shown(Option<Value>);

impl fmt::Display for Shown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value}"),
            None => write!(f, "none"),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Completed => write!(f, "Done"),
            Outcome::Found { target, index } => {
                write!(f, "Target {target} found at index {index}")
            }
            Outcome::NotFound { target } => write!(f, "Target {target} not found"),
            Outcome::Traversed { values } => {
                let joined: Vec<String> = values.iter().map(Value::to_string).collect();
                write!(f, "Traversal: {}", joined.join(" -> "))
            }
            Outcome::Popped { value: None } | Outcome::Peeked { value: None } => {
                write!(f, "Stack is empty")
            }
            Outcome::Popped { value: Some(v) } => write!(f, "Popped value: {v}"),
            Outcome::Peeked { value: Some(v) } => write!(f, "Top element: {v}"),
            Outcome::Dequeued { value: None } => write!(f, "Queue is empty"),
            Outcome::Dequeued { value: Some(v) } => write!(f, "Dequeued value: {v}"),
            Outcome::FrontRear { front, rear } => {
                write!(f, "Front: {}, Rear: {}", Shown(*front), Shown(*rear))
            }
        }
    }
}
