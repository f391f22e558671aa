//! Queue operations. The front is drawn first.

use serde::{Deserialize, Serialize};
use stepviz_engine::{Layout, Outcome, Role, RunError, Step, StepEmitter};
use stepviz_structures::{Queue, Value};

type RunResult = std::result::Result<Outcome, RunError>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum QueueOperation {
    Enqueue { value: Value },
    Dequeue,
    FrontRear,
}

fn snapshot(queue: &Queue) -> Step {
    Step::new(Layout::Queue, queue.items())
}

pub fn apply(queue: &mut Queue, operation: QueueOperation, emitter: &mut StepEmitter) -> RunResult {
    match operation {
        QueueOperation::Enqueue { value } => enqueue(queue, value, emitter),
        QueueOperation::Dequeue => dequeue(queue, emitter),
        QueueOperation::FrontRear => front_rear(queue, emitter),
    }
}

pub fn enqueue(queue: &mut Queue, value: Value, emitter: &mut StepEmitter) -> RunResult {
    queue.enqueue(value);
    let rear = queue.len() - 1;
    emitter.emit_final(snapshot(queue).with(rear, Role::Found))?;
    Ok(Outcome::Completed)
}

/// Remove the front. Dequeuing an empty queue reports `None`.
pub fn dequeue(queue: &mut Queue, emitter: &mut StepEmitter) -> RunResult {
    if !queue.is_empty() {
        emitter.emit(snapshot(queue).with(0, Role::Pivot))?;
    }
    let value = queue.dequeue();
    emitter.emit_final(snapshot(queue))?;
    Ok(Outcome::Dequeued { value })
}

/// Show both ends without removing anything.
pub fn front_rear(queue: &Queue, emitter: &mut StepEmitter) -> RunResult {
    let mut step = snapshot(queue);
    if let Some(rear) = queue.len().checked_sub(1) {
        step = step.with(0, Role::Found).with(rear, Role::Found);
    }
    emitter.emit_final(step)?;
    Ok(Outcome::FrontRear {
        front: queue.front(),
        rear: queue.rear(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(queue: &mut Queue, operation: QueueOperation) -> Outcome {
        let (mut emitter, _recorder) = StepEmitter::recording();
        apply(queue, operation, &mut emitter).unwrap()
    }

    #[test]
    fn dequeues_in_enqueue_order() {
        let mut queue = Queue::new();
        for value in [1.0, 2.0, 3.0] {
            run(&mut queue, QueueOperation::Enqueue { value });
        }
        assert_eq!(
            run(&mut queue, QueueOperation::FrontRear).to_string(),
            "Front: 1, Rear: 3"
        );
        let dequeued: Vec<Outcome> =
            (0..3).map(|_| run(&mut queue, QueueOperation::Dequeue)).collect();
        assert_eq!(
            dequeued,
            vec![
                Outcome::Dequeued { value: Some(1.0) },
                Outcome::Dequeued { value: Some(2.0) },
                Outcome::Dequeued { value: Some(3.0) },
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn empty_queue_reports_none() {
        let mut queue = Queue::new();
        assert_eq!(run(&mut queue, QueueOperation::Dequeue).to_string(), "Queue is empty");
        assert_eq!(
            run(&mut queue, QueueOperation::FrontRear),
            Outcome::FrontRear { front: None, rear: None }
        );
    }

    #[test]
    fn dequeue_highlights_the_front_first() {
        let mut queue: Queue = [5.0, 6.0].into_iter().collect();
        let (mut emitter, recorder) = StepEmitter::recording();
        dequeue(&mut queue, &mut emitter).unwrap();

        let steps = recorder.steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].roles()[0], Role::Pivot);
        assert_eq!(steps[1].values, vec![6.0]);
        assert_eq!(steps[1].layout, Layout::Queue);
    }
}
