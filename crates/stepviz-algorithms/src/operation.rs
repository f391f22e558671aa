//! The fixed operation menu and the operands it acts on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stepviz_engine::{Layout, Outcome, RunError, Step, StepEmitter};
use stepviz_structures::{DoublyLinkedList, LinkedSequence, Queue, SinglyLinkedList, Stack, Value};

use crate::error::{InputError, Result};
use crate::list::ListOperation;
use crate::queue::QueueOperation;
use crate::sort;
use crate::stack::StackOperation;

/// Sorting algorithms on the sorting screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortAlgorithm {
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
    Heap,
    Counting,
    Radix,
    Bucket,
}

impl SortAlgorithm {
    pub(crate) fn run(
        self,
        values: &mut [Value],
        emitter: &mut StepEmitter,
    ) -> std::result::Result<Outcome, RunError> {
        match self {
            Self::Bubble => sort::bubble(values, emitter),
            Self::Selection => sort::selection(values, emitter),
            Self::Insertion => sort::insertion(values, emitter),
            Self::Merge => sort::merge(values, emitter),
            Self::Quick => sort::quick(values, emitter),
            Self::Heap => sort::heap(values, emitter),
            Self::Counting => sort::counting(values, emitter),
            Self::Radix => sort::radix(values, emitter),
            Self::Bucket => sort::bucket(values, emitter),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchAlgorithm {
    Linear,
    /// Requires ascending input
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ArrayEdit {
    Insert { position: usize, value: Value },
    Delete { position: usize },
}

/// A fully parameterized operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Operation {
    Sort { algorithm: SortAlgorithm },
    Search { algorithm: SearchAlgorithm, target: Value },
    Array { edit: ArrayEdit },
    List { operation: ListOperation },
    Stack { operation: StackOperation },
    Queue { operation: QueueOperation },
}

impl Operation {
    /// Identifier of this operation on the menu.
    pub fn kind(&self) -> OperationKind {
        use OperationKind as K;
        match *self {
            Operation::Sort { algorithm } => match algorithm {
                SortAlgorithm::Bubble => K::BubbleSort,
                SortAlgorithm::Selection => K::SelectionSort,
                SortAlgorithm::Insertion => K::InsertionSort,
                SortAlgorithm::Merge => K::MergeSort,
                SortAlgorithm::Quick => K::QuickSort,
                SortAlgorithm::Heap => K::HeapSort,
                SortAlgorithm::Counting => K::CountingSort,
                SortAlgorithm::Radix => K::RadixSort,
                SortAlgorithm::Bucket => K::BucketSort,
            },
            Operation::Search { algorithm, .. } => match algorithm {
                SearchAlgorithm::Linear => K::LinearSearch,
                SearchAlgorithm::Binary => K::BinarySearch,
            },
            Operation::Array { edit } => match edit {
                ArrayEdit::Insert { .. } => K::ArrayInsert,
                ArrayEdit::Delete { .. } => K::ArrayDelete,
            },
            Operation::List { operation } => match operation {
                ListOperation::InsertAtBeginning { .. } => K::ListInsertBeginning,
                ListOperation::InsertAtEnd { .. } => K::ListInsertEnd,
                ListOperation::InsertAtPosition { .. } => K::ListInsertPosition,
                ListOperation::DeleteAtBeginning => K::ListDeleteBeginning,
                ListOperation::DeleteAtEnd => K::ListDeleteEnd,
                ListOperation::DeleteAtPosition { .. } => K::ListDeletePosition,
                ListOperation::Traverse => K::ListTraverse,
                ListOperation::Search { .. } => K::ListSearch,
            },
            Operation::Stack { operation } => match operation {
                StackOperation::Push { .. } => K::Push,
                StackOperation::Pop => K::Pop,
                StackOperation::Peek => K::Peek,
            },
            Operation::Queue { operation } => match operation {
                QueueOperation::Enqueue { .. } => K::Enqueue,
                QueueOperation::Dequeue => K::Dequeue,
                QueueOperation::FrontRear => K::FrontRear,
            },
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())
    }
}

/// Menu identifier of an operation, e.g. `bubble-sort` or `list-insert-position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    BubbleSort,
    SelectionSort,
    InsertionSort,
    MergeSort,
    QuickSort,
    HeapSort,
    CountingSort,
    RadixSort,
    BucketSort,
    LinearSearch,
    BinarySearch,
    ArrayInsert,
    ArrayDelete,
    ListInsertBeginning,
    ListInsertEnd,
    ListInsertPosition,
    ListDeleteBeginning,
    ListDeleteEnd,
    ListDeletePosition,
    ListTraverse,
    ListSearch,
    Push,
    Pop,
    Peek,
    Enqueue,
    Dequeue,
    FrontRear,
}

impl OperationKind {
    pub const ALL: [OperationKind; 27] = [
        Self::BubbleSort,
        Self::SelectionSort,
        Self::InsertionSort,
        Self::MergeSort,
        Self::QuickSort,
        Self::HeapSort,
        Self::CountingSort,
        Self::RadixSort,
        Self::BucketSort,
        Self::LinearSearch,
        Self::BinarySearch,
        Self::ArrayInsert,
        Self::ArrayDelete,
        Self::ListInsertBeginning,
        Self::ListInsertEnd,
        Self::ListInsertPosition,
        Self::ListDeleteBeginning,
        Self::ListDeleteEnd,
        Self::ListDeletePosition,
        Self::ListTraverse,
        Self::ListSearch,
        Self::Push,
        Self::Pop,
        Self::Peek,
        Self::Enqueue,
        Self::Dequeue,
        Self::FrontRear,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BubbleSort => "bubble-sort",
            Self::SelectionSort => "selection-sort",
            Self::InsertionSort => "insertion-sort",
            Self::MergeSort => "merge-sort",
            Self::QuickSort => "quick-sort",
            Self::HeapSort => "heap-sort",
            Self::CountingSort => "counting-sort",
            Self::RadixSort => "radix-sort",
            Self::BucketSort => "bucket-sort",
            Self::LinearSearch => "linear-search",
            Self::BinarySearch => "binary-search",
            Self::ArrayInsert => "array-insert",
            Self::ArrayDelete => "array-delete",
            Self::ListInsertBeginning => "list-insert-beginning",
            Self::ListInsertEnd => "list-insert-end",
            Self::ListInsertPosition => "list-insert-position",
            Self::ListDeleteBeginning => "list-delete-beginning",
            Self::ListDeleteEnd => "list-delete-end",
            Self::ListDeletePosition => "list-delete-position",
            Self::ListTraverse => "list-traverse",
            Self::ListSearch => "list-search",
            Self::Push => "push",
            Self::Pop => "pop",
            Self::Peek => "peek",
            Self::Enqueue => "enqueue",
            Self::Dequeue => "dequeue",
            Self::FrontRear => "front-rear",
        }
    }

    /// Parameters this operation needs, by name.
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            Self::LinearSearch | Self::BinarySearch | Self::ListSearch => &["target"],
            Self::ArrayInsert | Self::ListInsertPosition => &["position", "value"],
            Self::ArrayDelete | Self::ListDeletePosition => &["position"],
            Self::ListInsertBeginning | Self::ListInsertEnd | Self::Push | Self::Enqueue => {
                &["value"]
            }
            _ => &[],
        }
    }

    /// Screen whose operand this operation acts on. List operations belong
    /// to both list screens; this returns the singly linked one.
    pub fn screen(self) -> ScreenKind {
        match self {
            Self::BubbleSort
            | Self::SelectionSort
            | Self::InsertionSort
            | Self::MergeSort
            | Self::QuickSort
            | Self::HeapSort
            | Self::CountingSort
            | Self::RadixSort
            | Self::BucketSort => ScreenKind::Sorting,
            Self::LinearSearch | Self::BinarySearch => ScreenKind::Searching,
            Self::ArrayInsert | Self::ArrayDelete => ScreenKind::Array,
            Self::ListInsertBeginning
            | Self::ListInsertEnd
            | Self::ListInsertPosition
            | Self::ListDeleteBeginning
            | Self::ListDeleteEnd
            | Self::ListDeletePosition
            | Self::ListTraverse
            | Self::ListSearch => ScreenKind::SinglyLinkedList,
            Self::Push | Self::Pop | Self::Peek => ScreenKind::Stack,
            Self::Enqueue | Self::Dequeue | Self::FrontRear => ScreenKind::Queue,
        }
    }

    /// Build the operation, taking what it needs from `params`.
    pub fn build(self, params: &OperationParams) -> Result<Operation> {
        let target = || params.target.ok_or(InputError::MissingParameter("target"));
        let value = || params.value.ok_or(InputError::MissingParameter("value"));
        let position = || params.position.ok_or(InputError::MissingParameter("position"));
        let sort = |algorithm| -> Result<Operation> { Ok(Operation::Sort { algorithm }) };
        let list = |operation| -> Result<Operation> { Ok(Operation::List { operation }) };

        match self {
            Self::BubbleSort => sort(SortAlgorithm::Bubble),
            Self::SelectionSort => sort(SortAlgorithm::Selection),
            Self::InsertionSort => sort(SortAlgorithm::Insertion),
            Self::MergeSort => sort(SortAlgorithm::Merge),
            Self::QuickSort => sort(SortAlgorithm::Quick),
            Self::HeapSort => sort(SortAlgorithm::Heap),
            Self::CountingSort => sort(SortAlgorithm::Counting),
            Self::RadixSort => sort(SortAlgorithm::Radix),
            Self::BucketSort => sort(SortAlgorithm::Bucket),
            Self::LinearSearch => Ok(Operation::Search {
                algorithm: SearchAlgorithm::Linear,
                target: target()?,
            }),
            Self::BinarySearch => Ok(Operation::Search {
                algorithm: SearchAlgorithm::Binary,
                target: target()?,
            }),
            Self::ArrayInsert => Ok(Operation::Array {
                edit: ArrayEdit::Insert {
                    position: position()?,
                    value: value()?,
                },
            }),
            Self::ArrayDelete => Ok(Operation::Array {
                edit: ArrayEdit::Delete {
                    position: position()?,
                },
            }),
            Self::ListInsertBeginning => list(ListOperation::InsertAtBeginning { value: value()? }),
            Self::ListInsertEnd => list(ListOperation::InsertAtEnd { value: value()? }),
            Self::ListInsertPosition => list(ListOperation::InsertAtPosition {
                value: value()?,
                position: position()?,
            }),
            Self::ListDeleteBeginning => list(ListOperation::DeleteAtBeginning),
            Self::ListDeleteEnd => list(ListOperation::DeleteAtEnd),
            Self::ListDeletePosition => list(ListOperation::DeleteAtPosition {
                position: position()?,
            }),
            Self::ListTraverse => list(ListOperation::Traverse),
            Self::ListSearch => list(ListOperation::Search { target: target()? }),
            Self::Push => Ok(Operation::Stack {
                operation: StackOperation::Push { value: value()? },
            }),
            Self::Pop => Ok(Operation::Stack {
                operation: StackOperation::Pop,
            }),
            Self::Peek => Ok(Operation::Stack {
                operation: StackOperation::Peek,
            }),
            Self::Enqueue => Ok(Operation::Queue {
                operation: QueueOperation::Enqueue { value: value()? },
            }),
            Self::Dequeue => Ok(Operation::Queue {
                operation: QueueOperation::Dequeue,
            }),
            Self::FrontRear => Ok(Operation::Queue {
                operation: QueueOperation::FrontRear,
            }),
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| InputError::UnknownOperation(name.to_string()))
    }
}

/// Optional parameters supplied alongside an [`OperationKind`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationParams {
    #[serde(default)]
    pub target: Option<Value>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub position: Option<usize>,
}

impl OperationParams {
    #[must_use]
    pub fn with_target(mut self, target: impl Into<Value>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

/// One screen per operand family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenKind {
    Sorting,
    Searching,
    Array,
    SinglyLinkedList,
    DoublyLinkedList,
    Stack,
    Queue,
}

impl ScreenKind {
    pub const ALL: [ScreenKind; 7] = [
        Self::Sorting,
        Self::Searching,
        Self::Array,
        Self::SinglyLinkedList,
        Self::DoublyLinkedList,
        Self::Stack,
        Self::Queue,
    ];

    /// Whether this screen keeps its structure between runs.
    pub fn is_persistent(self) -> bool {
        matches!(
            self,
            Self::SinglyLinkedList | Self::DoublyLinkedList | Self::Stack | Self::Queue
        )
    }

    /// Operations offered on this screen.
    pub fn operations(self) -> Vec<OperationKind> {
        OperationKind::ALL
            .into_iter()
            .filter(|kind| self.supports(*kind))
            .collect()
    }

    pub fn supports(self, kind: OperationKind) -> bool {
        match self {
            Self::DoublyLinkedList => kind.screen() == Self::SinglyLinkedList,
            _ => kind.screen() == self,
        }
    }

    /// Fresh, empty operand for a persistent screen.
    pub fn empty_operand(self) -> Option<Operand> {
        match self {
            Self::SinglyLinkedList => Some(Operand::Singly(SinglyLinkedList::new())),
            Self::DoublyLinkedList => Some(Operand::Doubly(DoublyLinkedList::new())),
            Self::Stack => Some(Operand::Stack(Stack::new())),
            Self::Queue => Some(Operand::Queue(Queue::new())),
            Self::Sorting | Self::Searching | Self::Array => None,
        }
    }

    /// Build this screen's operand from initial values.
    pub fn operand_from(self, values: Vec<Value>) -> Operand {
        match self {
            Self::Sorting | Self::Searching | Self::Array => Operand::Sequence(values),
            Self::SinglyLinkedList => Operand::Singly(values.into_iter().collect()),
            Self::DoublyLinkedList => Operand::Doubly(values.into_iter().collect()),
            Self::Stack => Operand::Stack(values.into_iter().collect()),
            Self::Queue => Operand::Queue(values.into_iter().collect()),
        }
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sorting => "sorting",
            Self::Searching => "searching",
            Self::Array => "array",
            Self::SinglyLinkedList => "singly linked list",
            Self::DoublyLinkedList => "doubly linked list",
            Self::Stack => "stack",
            Self::Queue => "queue",
        };
        f.write_str(name)
    }
}

/// The structure an operation acts on. Moved into the worker for a run.
#[derive(Debug, Clone)]
pub enum Operand {
    Sequence(Vec<Value>),
    Singly(SinglyLinkedList),
    Doubly(DoublyLinkedList),
    Stack(Stack),
    Queue(Queue),
}

impl Operand {
    pub fn name(&self) -> &'static str {
        match self {
            Operand::Sequence(_) => "sequence",
            Operand::Singly(_) => "singly linked list",
            Operand::Doubly(_) => "doubly linked list",
            Operand::Stack(_) => "stack",
            Operand::Queue(_) => "queue",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Operand::Sequence(values) => values.len(),
            Operand::Singly(list) => list.len(),
            Operand::Doubly(list) => list.len(),
            Operand::Stack(stack) => stack.len(),
            Operand::Queue(queue) => queue.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values in drawing order.
    pub fn values(&self) -> Vec<Value> {
        match self {
            Operand::Sequence(values) => values.clone(),
            Operand::Singly(list) => list.traverse(),
            Operand::Doubly(list) => list.traverse(),
            Operand::Stack(stack) => stack.items().to_vec(),
            Operand::Queue(queue) => queue.items(),
        }
    }

    /// Unhighlighted snapshot, used to draw a structure between runs.
    pub fn snapshot(&self) -> Step {
        let layout = match self {
            Operand::Sequence(_) => Layout::Bars,
            Operand::Singly(_) => Layout::SinglyLinked,
            Operand::Doubly(_) => Layout::DoublyLinked,
            Operand::Stack(_) => Layout::Stack,
            Operand::Queue(_) => Layout::Queue,
        };
        Step::new(layout, self.values())
    }
}
