//! Step snapshots published by algorithms at each checkpoint.

use serde::{Deserialize, Serialize};
use stepviz_structures::Value;

/// How a snapshot's values should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Vertical bars, one per element (sorting, searching, arrays)
    Bars,
    /// Nodes joined by forward links
    SinglyLinked,
    /// Nodes joined by forward and backward links
    DoublyLinked,
    /// Boxes stacked bottom to top
    Stack,
    /// Boxes laid out front to rear
    Queue,
}

/// Visual role of a highlighted element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Normal,
    /// Element currently being compared, moved or visited
    Comparing,
    /// Partition pivot
    Pivot,
    /// Inside the live search window
    Range,
    /// Search hit or freshly inserted element
    Found,
    /// Element in its final sorted place
    Sorted,
}

/// A role attached to one element position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub index: usize,
    pub role: Role,
}

/// An immutable snapshot of visualizable state plus highlighted roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Emission order within a run, assigned by the emitter
    pub seq: u64,
    pub layout: Layout,
    pub values: Vec<Value>,
    /// Highlights in application order; a later entry for the same index wins
    pub highlights: Vec<Highlight>,
    /// Positions before which a group divider is drawn (bucket sort)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub separators: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Step {
    /// Create a step with no highlights.
    pub fn new(layout: Layout, values: impl Into<Vec<Value>>) -> Self {
        Self {
            seq: 0,
            layout,
            values: values.into(),
            highlights: Vec::new(),
            separators: Vec::new(),
            caption: None,
        }
    }

    /// Bars snapshot of a sequence.
    pub fn bars(values: &[Value]) -> Self {
        Self::new(Layout::Bars, values)
    }

    /// Highlight a single position. Out-of-range positions are ignored when drawn.
    #[must_use]
    pub fn with(mut self, index: usize, role: Role) -> Self {
        self.highlights.push(Highlight { index, role });
        self
    }

    /// Highlight several positions with the same role.
    #[must_use]
    pub fn with_all(mut self, indices: impl IntoIterator<Item = usize>, role: Role) -> Self {
        self.highlights
            .extend(indices.into_iter().map(|index| Highlight { index, role }));
        self
    }

    /// Highlight every element with `role`.
    #[must_use]
    pub fn all(self, role: Role) -> Self {
        let len = self.values.len();
        self.with_all(0..len, role)
    }

    #[must_use]
    pub fn with_separators(mut self, separators: Vec<usize>) -> Self {
        self.separators = separators;
        self
    }

    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Resolve the role of every element; unhighlighted elements are `Normal`.
    pub fn roles(&self) -> Vec<Role> {
        let mut roles = vec![Role::Normal; self.values.len()];
        for highlight in &self.highlights {
            if let Some(role) = roles.get_mut(highlight.index) {
                *role = highlight.role;
            }
        }
        roles
    }

    /// Whether the snapshot carries only success roles (or none at all).
    pub fn is_terminal_view(&self) -> bool {
        self.highlights
            .iter()
            .all(|h| matches!(h.role, Role::Sorted | Role::Found | Role::Normal))
    }
}
