//! Stack operations. The top is drawn at the highest index.

use serde::{Deserialize, Serialize};
use stepviz_engine::{Layout, Outcome, Role, RunError, Step, StepEmitter};
use stepviz_structures::{Stack, Value};

type RunResult = std::result::Result<Outcome, RunError>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StackOperation {
    Push { value: Value },
    Pop,
    Peek,
}

fn snapshot(stack: &Stack) -> Step {
    Step::new(Layout::Stack, stack.items())
}

pub fn apply(stack: &mut Stack, operation: StackOperation, emitter: &mut StepEmitter) -> RunResult {
    match operation {
        StackOperation::Push { value } => push(stack, value, emitter),
        StackOperation::Pop => pop(stack, emitter),
        StackOperation::Peek => peek(stack, emitter),
    }
}

pub fn push(stack: &mut Stack, value: Value, emitter: &mut StepEmitter) -> RunResult {
    stack.push(value);
    let top = stack.len() - 1;
    emitter.emit_final(snapshot(stack).with(top, Role::Found))?;
    Ok(Outcome::Completed)
}

/// Remove the top. Popping an empty stack reports `None`.
pub fn pop(stack: &mut Stack, emitter: &mut StepEmitter) -> RunResult {
    if let Some(top) = stack.len().checked_sub(1) {
        emitter.emit(snapshot(stack).with(top, Role::Pivot))?;
    }
    let value = stack.pop();
    emitter.emit_final(snapshot(stack))?;
    Ok(Outcome::Popped { value })
}

pub fn peek(stack: &Stack, emitter: &mut StepEmitter) -> RunResult {
    let step = match stack.len().checked_sub(1) {
        Some(top) => snapshot(stack).with(top, Role::Found),
        None => snapshot(stack),
    };
    emitter.emit_final(step)?;
    Ok(Outcome::Peeked { value: stack.peek() })
}
