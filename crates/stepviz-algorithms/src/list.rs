//! Linked list operations, shared by the singly and doubly linked lists.
//!
//! Positional operations first walk to the position emitting read-only
//! steps, then perform the mutation in one call that never suspends, so the
//! list is fully linked at every checkpoint.

use serde::{Deserialize, Serialize};
use stepviz_engine::{Layout, Outcome, Role, RunError, Step, StepEmitter};
use stepviz_structures::{DoublyLinkedList, LinkedSequence, SinglyLinkedList, StructureError, Value};

type RunResult = std::result::Result<Outcome, RunError>;

/// A linked list that knows how it is drawn.
pub trait ListView: LinkedSequence {
    const LAYOUT: Layout;

    /// Snapshot of the list from head to tail.
    fn snapshot(&self) -> Step {
        Step::new(Self::LAYOUT, self.traverse())
    }
}

impl ListView for SinglyLinkedList {
    const LAYOUT: Layout = Layout::SinglyLinked;
}

impl ListView for DoublyLinkedList {
    const LAYOUT: Layout = Layout::DoublyLinked;
}

/// Operations offered on the linked list screens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ListOperation {
    InsertAtBeginning { value: Value },
    InsertAtEnd { value: Value },
    InsertAtPosition { value: Value, position: usize },
    DeleteAtBeginning,
    DeleteAtEnd,
    DeleteAtPosition { position: usize },
    Traverse,
    Search { target: Value },
}

/// Run `operation` against `list`.
pub fn apply<L: ListView>(
    list: &mut L,
    operation: ListOperation,
    emitter: &mut StepEmitter,
) -> RunResult {
    match operation {
        ListOperation::InsertAtBeginning { value } => insert_at_beginning(list, value, emitter),
        ListOperation::InsertAtEnd { value } => insert_at_end(list, value, emitter),
        ListOperation::InsertAtPosition { value, position } => {
            insert_at_position(list, value, position, emitter)
        }
        ListOperation::DeleteAtBeginning => delete_at_beginning(list, emitter),
        ListOperation::DeleteAtEnd => delete_at_end(list, emitter),
        ListOperation::DeleteAtPosition { position } => {
            delete_at_position(list, position, emitter)
        }
        ListOperation::Traverse => traverse(list, emitter),
        ListOperation::Search { target } => search(list, target, emitter),
    }
}

/// Emit one read-only step per node in `0..until`.
fn walk<L: ListView>(list: &L, until: usize, emitter: &mut StepEmitter) -> Result<(), RunError> {
    let values = list.traverse();
    for index in 0..until.min(values.len()) {
        emitter.emit(Step::new(L::LAYOUT, values.clone()).with(index, Role::Comparing))?;
    }
    Ok(())
}

pub fn insert_at_beginning<L: ListView>(
    list: &mut L,
    value: Value,
    emitter: &mut StepEmitter,
) -> RunResult {
    if !list.is_empty() {
        emitter.emit(list.snapshot().with(0, Role::Comparing))?;
    }
    list.insert_at_beginning(value);
    emitter.emit_final(list.snapshot().with(0, Role::Found))?;
    Ok(Outcome::Completed)
}

pub fn insert_at_end<L: ListView>(
    list: &mut L,
    value: Value,
    emitter: &mut StepEmitter,
) -> RunResult {
    walk(list, list.len(), emitter)?;
    list.insert_at_end(value);
    let tail = list.len() - 1;
    emitter.emit_final(list.snapshot().with(tail, Role::Found))?;
    Ok(Outcome::Completed)
}

pub fn insert_at_position<L: ListView>(
    list: &mut L,
    value: Value,
    position: usize,
    emitter: &mut StepEmitter,
) -> RunResult {
    let len = list.len();
    if position > len {
        return Err(StructureError::PositionOutOfRange { position, len }.into());
    }
    walk(list, position, emitter)?;
    list.insert_at_position(value, position)?;
    emitter.emit_final(list.snapshot().with(position, Role::Found))?;
    Ok(Outcome::Completed)
}

/// Unlink the head. A no-op on an empty list.
pub fn delete_at_beginning<L: ListView>(list: &mut L, emitter: &mut StepEmitter) -> RunResult {
    if list.is_empty() {
        emitter.emit_final(list.snapshot().with_caption("List is empty"))?;
        return Ok(Outcome::Completed);
    }
    emitter.emit(list.snapshot().with(0, Role::Pivot))?;
    let removed = list.delete_at_beginning();
    emitter.emit_final(list.snapshot().with_caption(deleted_caption(removed)))?;
    Ok(Outcome::Completed)
}

/// Unlink the tail. A no-op on an empty list.
pub fn delete_at_end<L: ListView>(list: &mut L, emitter: &mut StepEmitter) -> RunResult {
    if list.is_empty() {
        emitter.emit_final(list.snapshot().with_caption("List is empty"))?;
        return Ok(Outcome::Completed);
    }
    let tail = list.len() - 1;
    walk(list, tail, emitter)?;
    emitter.emit(list.snapshot().with(tail, Role::Pivot))?;
    let removed = list.delete_at_end();
    emitter.emit_final(list.snapshot().with_caption(deleted_caption(removed)))?;
    Ok(Outcome::Completed)
}

pub fn delete_at_position<L: ListView>(
    list: &mut L,
    position: usize,
    emitter: &mut StepEmitter,
) -> RunResult {
    let len = list.len();
    if position >= len {
        return Err(StructureError::PositionOutOfRange { position, len }.into());
    }
    walk(list, position, emitter)?;
    emitter.emit(list.snapshot().with(position, Role::Pivot))?;
    let removed = list.delete_at_position(position)?;
    emitter.emit_final(list.snapshot().with_caption(deleted_caption(Some(removed))))?;
    Ok(Outcome::Completed)
}

/// Visit every node from head to tail.
pub fn traverse<L: ListView>(list: &L, emitter: &mut StepEmitter) -> RunResult {
    walk(list, list.len(), emitter)?;
    let values = list.traverse();
    emitter.emit_final(Step::new(L::LAYOUT, values.clone()))?;
    Ok(Outcome::Traversed { values })
}

/// Visit nodes until the first one holding `target`.
pub fn search<L: ListView>(list: &L, target: Value, emitter: &mut StepEmitter) -> RunResult {
    let values = list.traverse();
    for (index, &value) in values.iter().enumerate() {
        emitter.emit(Step::new(L::LAYOUT, values.clone()).with(index, Role::Comparing))?;
        if value == target {
            emitter.emit_final(Step::new(L::LAYOUT, values).with(index, Role::Found))?;
            return Ok(Outcome::Found { target, index });
        }
    }
    emitter.emit_final(Step::new(L::LAYOUT, values))?;
    Ok(Outcome::NotFound { target })
}

fn deleted_caption(removed: Option<Value>) -> String {
    match removed {
        Some(value) => format!("Deleted {value}"),
        None => "List is empty".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run<L: ListView>(list: &mut L, operation: ListOperation) -> (RunResult, Vec<Step>) {
        let (mut emitter, recorder) = StepEmitter::recording();
        let result = apply(list, operation, &mut emitter);
        (result, recorder.steps())
    }

    #[test]
    fn doubly_insert_in_the_middle() {
        let mut list: DoublyLinkedList = [1.0, 2.0, 3.0].into_iter().collect();
        let insert = ListOperation::InsertAtPosition { value: 10.0, position: 2 };
        let (result, steps) = run(&mut list, insert);
        assert_eq!(result, Ok(Outcome::Completed));
        assert_eq!(list.traverse(), vec![1.0, 2.0, 10.0, 3.0]);
        assert_eq!(list.traverse_backward(), vec![3.0, 10.0, 2.0, 1.0]);

        // Two walk steps over the unchanged list, then the final frame.
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].values, vec![1.0, 2.0, 3.0]);
        assert_eq!(steps[0].layout, Layout::DoublyLinked);
        assert_eq!(steps[2].roles()[2], Role::Found);
    }

    #[test]
    fn empty_list_insert_then_delete_at_zero() {
        let mut list = SinglyLinkedList::new();
        let insert = ListOperation::InsertAtPosition { value: 4.0, position: 0 };
        let (result, _) = run(&mut list, insert);
        assert!(result.is_ok());
        assert_eq!(list.traverse(), vec![4.0]);

        let (result, steps) = run(&mut list, ListOperation::DeleteAtPosition { position: 0 });
        assert!(result.is_ok());
        assert!(list.is_empty());
        assert!(steps.last().unwrap().values.is_empty());
    }

    #[test]
    fn out_of_range_position_leaves_list_intact() {
        let mut list: SinglyLinkedList = [1.0, 2.0].into_iter().collect();
        let (result, steps) = run(&mut list, ListOperation::DeleteAtPosition { position: 2 });
        assert_eq!(
            result,
            Err(RunError::Structure(StructureError::PositionOutOfRange { position: 2, len: 2 }))
        );
        assert!(steps.is_empty());
        assert_eq!(list.traverse(), vec![1.0, 2.0]);
    }

    #[test]
    fn deletes_on_empty_list_are_no_ops() {
        let mut list = DoublyLinkedList::new();
        for operation in [ListOperation::DeleteAtBeginning, ListOperation::DeleteAtEnd] {
            let (result, steps) = run(&mut list, operation);
            assert_eq!(result, Ok(Outcome::Completed));
            assert_eq!(steps.len(), 1);
            assert_eq!(steps[0].caption.as_deref(), Some("List is empty"));
        }
    }

    #[test]
    fn ends_are_updated() {
        let mut list: DoublyLinkedList = [2.0, 3.0].into_iter().collect();
        run(&mut list, ListOperation::InsertAtBeginning { value: 1.0 });
        run(&mut list, ListOperation::InsertAtEnd { value: 4.5 });
        assert_eq!(list.traverse(), vec![1.0, 2.0, 3.0, 4.5]);

        let (_, steps) = run(&mut list, ListOperation::DeleteAtEnd);
        assert_eq!(steps.last().unwrap().caption.as_deref(), Some("Deleted 4.5"));
        run(&mut list, ListOperation::DeleteAtBeginning);
        assert_eq!(list.traverse(), vec![2.0, 3.0]);
        assert!(list.check_links());
    }

    #[test]
    fn traverse_and_search() {
        let mut list: SinglyLinkedList = [5.0, 6.0, 7.0].into_iter().collect();
        let (result, steps) = run(&mut list, ListOperation::Traverse);
        assert_eq!(result, Ok(Outcome::Traversed { values: vec![5.0, 6.0, 7.0] }));
        assert_eq!(steps.len(), 4);

        let (result, _) = run(&mut list, ListOperation::Search { target: 6.0 });
        assert_eq!(result, Ok(Outcome::Found { target: 6.0, index: 1 }));
        let (result, _) = run(&mut list, ListOperation::Search { target: 1.0 });
        assert_eq!(result, Ok(Outcome::NotFound { target: 1.0 }));
    }

    #[test]
    fn operation_serializes_with_op_tag() {
        let insert = ListOperation::InsertAtPosition { value: 3.5, position: 1 };
        let json = serde_json::to_string(&insert).unwrap();
        assert_eq!(json, r#"{"op":"insert_at_position","value":3.5,"position":1}"#);
    }

    proptest! {
        /// Inserting then deleting at the same position restores the traversal.
        #[test]
        fn insert_then_delete_round_trips(
            values in prop::collection::vec(-50.0..50.0f64, 0..12),
            seed in 0usize..64,
            value in -50.0..50.0f64,
        ) {
            let position = seed % (values.len() + 1);
            let mut singly: SinglyLinkedList = values.iter().copied().collect();
            let mut doubly: DoublyLinkedList = values.iter().copied().collect();

            for operation in [
                ListOperation::InsertAtPosition { value, position },
                ListOperation::DeleteAtPosition { position },
            ] {
                prop_assert!(run(&mut singly, operation).0.is_ok());
                prop_assert!(run(&mut doubly, operation).0.is_ok());
            }
            prop_assert_eq!(singly.traverse(), values.clone());
            prop_assert_eq!(doubly.traverse(), values);
            prop_assert!(doubly.check_links());
        }
    }
}
