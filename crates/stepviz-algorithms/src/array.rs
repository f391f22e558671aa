//! Array edits at a position, shifting one element per step.

use stepviz_engine::{Outcome, Role, RunError, Step, StepEmitter};
use stepviz_structures::{StructureError, Value};

type RunResult = std::result::Result<Outcome, RunError>;

/// Insert `value` at `position` (`0 ≤ position ≤ len`), shifting the tail
/// right one element at a time.
pub fn insert_at(
    values: &mut Vec<Value>,
    position: usize,
    value: Value,
    emitter: &mut StepEmitter,
) -> RunResult {
    let len = values.len();
    if position > len {
        return Err(StructureError::PositionOutOfRange { position, len }.into());
    }

    values.push(value);
    for i in (position + 1..values.len()).rev() {
        values[i] = values[i - 1];
        emitter.emit(
            Step::bars(values)
                .with(i - 1, Role::Pivot)
                .with(i, Role::Comparing),
        )?;
    }
    values[position] = value;
    emitter.emit_final(Step::bars(values).with(position, Role::Found))?;
    Ok(Outcome::Completed)
}

/// Delete the element at `position` (`0 ≤ position < len`), shifting the
/// tail left one element at a time.
pub fn delete_at(
    values: &mut Vec<Value>,
    position: usize,
    emitter: &mut StepEmitter,
) -> RunResult {
    let len = values.len();
    if position >= len {
        return Err(StructureError::PositionOutOfRange { position, len }.into());
    }

    emitter.emit(Step::bars(values).with(position, Role::Pivot))?;
    for i in position..len - 1 {
        values[i] = values[i + 1];
        emitter.emit(
            Step::bars(values)
                .with(i, Role::Comparing)
                .with(i + 1, Role::Pivot),
        )?;
    }
    values.truncate(len - 1);
    emitter.emit_final(Step::bars(values).with_caption(format!("Deleted position {position}")))?;
    Ok(Outcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_shifts_right() {
        let (mut emitter, recorder) = StepEmitter::recording();
        let mut values = vec![1.0, 2.0, 3.0];
        insert_at(&mut values, 1, 9.0, &mut emitter).unwrap();
        assert_eq!(values, vec![1.0, 9.0, 2.0, 3.0]);

        let steps = recorder.steps();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].values, vec![1.0, 2.0, 3.0, 3.0]);
        assert_eq!(steps[1].values, vec![1.0, 2.0, 2.0, 3.0]);
        assert_eq!(steps[2].roles()[1], Role::Found);
    }

    #[test]
    fn insert_at_end_and_into_empty() {
        let (mut emitter, _recorder) = StepEmitter::recording();
        let mut values = vec![1.0];
        insert_at(&mut values, 1, 2.5, &mut emitter).unwrap();
        assert_eq!(values, vec![1.0, 2.5]);

        let mut empty = Vec::new();
        insert_at(&mut empty, 0, 5.0, &mut emitter).unwrap();
        assert_eq!(empty, vec![5.0]);
    }

    #[test]
    fn delete_shifts_left() {
        let (mut emitter, recorder) = StepEmitter::recording();
        let mut values = vec![4.0, 5.0, 6.0, 7.0];
        delete_at(&mut values, 1, &mut emitter).unwrap();
        assert_eq!(values, vec![4.0, 6.0, 7.0]);
        assert_eq!(recorder.last_step().unwrap().values, vec![4.0, 6.0, 7.0]);
    }

    #[test]
    fn out_of_range_positions_are_rejected() {
        let (mut emitter, recorder) = StepEmitter::recording();
        let mut values = vec![1.0, 2.0];
        assert_eq!(
            insert_at(&mut values, 3, 0.0, &mut emitter),
            Err(RunError::Structure(StructureError::PositionOutOfRange { position: 3, len: 2 }))
        );
        assert!(delete_at(&mut values, 2, &mut emitter).is_err());
        assert!(delete_at(&mut Vec::new(), 0, &mut emitter).is_err());
        assert_eq!(values, vec![1.0, 2.0]);
        assert!(recorder.steps().is_empty());
    }

    #[test]
    fn insert_then_delete_restores() {
        let (mut emitter, _recorder) = StepEmitter::recording();
        let original = vec![3.0, 1.0, 4.0, 1.0, 5.0];
        for position in 0..=original.len() {
            let mut values = original.clone();
            insert_at(&mut values, position, 99.0, &mut emitter).unwrap();
            delete_at(&mut values, position, &mut emitter).unwrap();
            assert_eq!(values, original);
        }
    }
}
