//! A validated operand/operation pair, executed as a background job.

use stepviz_engine::{Completion, Job, Outcome, RunError, StepEmitter};
use stepviz_structures::Value;
use tracing::debug;

use crate::array;
use crate::error::{InputError, Result};
use crate::list;
use crate::operation::{
    ArrayEdit, Operand, Operation, OperationKind, SearchAlgorithm, SortAlgorithm,
};
use crate::queue;
use crate::search;
use crate::sort::{bounds, is_whole, COUNTING_RANGE_LIMIT};
use crate::stack;

/// Check that `operation` can run on `operand` before any thread is spawned.
pub fn validate(operand: &Operand, operation: &Operation) -> Result<()> {
    let mismatch = || InputError::KindMismatch {
        operation: operation.kind(),
        operand: operand.name(),
    };

    match (operation, operand) {
        (Operation::Sort { algorithm }, Operand::Sequence(values)) => {
            validate_sort(*algorithm, operation.kind(), values)
        }
        (Operation::Search { algorithm, .. }, Operand::Sequence(values)) => {
            if values.is_empty() {
                return Err(InputError::Empty);
            }
            if *algorithm == SearchAlgorithm::Binary && !values.windows(2).all(|w| w[0] <= w[1]) {
                return Err(InputError::Unsorted);
            }
            Ok(())
        }
        (Operation::Array { edit }, Operand::Sequence(values)) => {
            let len = values.len();
            match *edit {
                ArrayEdit::Insert { position, .. } if position > len => {
                    Err(InputError::PositionOutOfRange { position, len })
                }
                ArrayEdit::Delete { position } if position >= len => {
                    Err(InputError::PositionOutOfRange { position, len })
                }
                _ => Ok(()),
            }
        }
        (Operation::List { operation }, Operand::Singly(_) | Operand::Doubly(_)) => {
            let len = operand.len();
            match *operation {
                list::ListOperation::InsertAtPosition { position, .. } if position > len => {
                    Err(InputError::PositionOutOfRange { position, len })
                }
                list::ListOperation::DeleteAtPosition { position } if position >= len => {
                    Err(InputError::PositionOutOfRange { position, len })
                }
                _ => Ok(()),
            }
        }
        (Operation::Stack { .. }, Operand::Stack(_)) => Ok(()),
        (Operation::Queue { .. }, Operand::Queue(_)) => Ok(()),
        _ => Err(mismatch()),
    }
}

fn validate_sort(algorithm: SortAlgorithm, kind: OperationKind, values: &[Value]) -> Result<()> {
    let (min, max) = bounds(values).ok_or(InputError::Empty)?;
    if !matches!(algorithm, SortAlgorithm::Counting | SortAlgorithm::Radix) {
        return Ok(());
    }
    if let Some(&value) = values.iter().find(|&&v| !is_whole(v)) {
        return Err(InputError::NotWhole {
            operation: kind,
            value,
        });
    }
    match algorithm {
        SortAlgorithm::Radix if min < 0.0 => Err(InputError::NegativeValue(min)),
        SortAlgorithm::Counting if max - min > COUNTING_RANGE_LIMIT as Value => {
            Err(InputError::RangeTooWide {
                span: (max - min) as u64,
                limit: COUNTING_RANGE_LIMIT,
            })
        }
        _ => Ok(()),
    }
}

/// An operation bound to the operand it will act on.
#[derive(Debug, Clone)]
pub struct Workload {
    operand: Operand,
    operation: Operation,
}

impl Workload {
    /// Validate and bind. Call [`validate`] first when the operand must
    /// survive a rejection.
    pub fn new(operand: Operand, operation: Operation) -> Result<Self> {
        validate(&operand, &operation)?;
        Ok(Self { operand, operation })
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }
}

impl Job for Workload {
    type Output = Operand;

    fn label(&self) -> String {
        self.operation.to_string()
    }

    fn run(self, emitter: &mut StepEmitter) -> Completion<Operand> {
        let Workload {
            mut operand,
            operation,
        } = self;
        debug!(%operation, len = operand.len(), "executing workload");
        let result = execute(&mut operand, operation, emitter);
        Completion::new(operand, result)
    }
}

fn execute(
    operand: &mut Operand,
    operation: Operation,
    emitter: &mut StepEmitter,
) -> std::result::Result<Outcome, RunError> {
    match (operation, operand) {
        (Operation::Sort { algorithm }, Operand::Sequence(values)) => {
            algorithm.run(values, emitter)
        }
        (Operation::Search { algorithm, target }, Operand::Sequence(values)) => match algorithm {
            SearchAlgorithm::Linear => search::linear(values, target, emitter),
            SearchAlgorithm::Binary => search::binary(values, target, emitter),
        },
        (Operation::Array { edit }, Operand::Sequence(values)) => match edit {
            ArrayEdit::Insert { position, value } => {
                array::insert_at(values, position, value, emitter)
            }
            ArrayEdit::Delete { position } => array::delete_at(values, position, emitter),
        },
        (Operation::List { operation }, Operand::Singly(list)) => {
            list::apply(list, operation, emitter)
        }
        (Operation::List { operation }, Operand::Doubly(list)) => {
            list::apply(list, operation, emitter)
        }
        (Operation::Stack { operation }, Operand::Stack(stack)) => {
            stack::apply(stack, operation, emitter)
        }
        (Operation::Queue { operation }, Operand::Queue(queue)) => {
            queue::apply(queue, operation, emitter)
        }
        (operation, operand) => unreachable!(
            "{operation} bound to a {} passed validation",
            operand.name()
        ),
    }
}
