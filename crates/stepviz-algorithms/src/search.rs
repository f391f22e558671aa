//! Searching algorithms. A miss is reported as [`Outcome::NotFound`].

use std::cmp::Ordering;

use stepviz_engine::{Outcome, Role, RunError, Step, StepEmitter};
use stepviz_structures::Value;

type RunResult = std::result::Result<Outcome, RunError>;

/// Visit elements left to right; reports the first occurrence.
pub fn linear(values: &[Value], target: Value, emitter: &mut StepEmitter) -> RunResult {
    for (index, &value) in values.iter().enumerate() {
        emitter.emit(Step::bars(values).with(index, Role::Comparing))?;
        if value == target {
            emitter.emit_final(Step::bars(values).with(index, Role::Found))?;
            return Ok(Outcome::Found { target, index });
        }
    }
    emitter.emit_final(Step::bars(values))?;
    Ok(Outcome::NotFound { target })
}

/// Halve the live window `[low, high)` around its midpoint.
///
/// Input must be in ascending order; the window is drawn with
/// [`Role::Range`] and the probe with [`Role::Comparing`].
pub fn binary(values: &[Value], target: Value, emitter: &mut StepEmitter) -> RunResult {
    let (mut low, mut high) = (0, values.len());
    while low < high {
        let mid = low + (high - low) / 2;
        emitter.emit(
            Step::bars(values)
                .with_all(low..high, Role::Range)
                .with(mid, Role::Comparing),
        )?;
        match values[mid].partial_cmp(&target) {
            Some(Ordering::Equal) => {
                emitter.emit_final(Step::bars(values).with(mid, Role::Found))?;
                return Ok(Outcome::Found { target, index: mid });
            }
            Some(Ordering::Less) => low = mid + 1,
            _ => high = mid,
        }
    }
    emitter.emit_final(Step::bars(values))?;
    Ok(Outcome::NotFound { target })
}
