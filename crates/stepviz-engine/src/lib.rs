//! Step-Synchronized Execution
//!
//! Algorithms run on a background worker and publish immutable [`Step`]
//! snapshots through a [`StepEmitter`]. Every emission is a checkpoint: the
//! step is handed to the [`RenderSink`], then the worker waits out the step
//! delay (or a manual advance), then holds while paused.
//!
//! # Pieces
//!
//! - [`PlaybackControl`]: pause flag, step mode, speed and cancellation shared
//!   between the interactive context and the worker
//! - [`StepEmitter`]: the checkpoint algorithms call
//! - [`ExecutionController`]: one run at a time per screen instance
//! - [`PlaybackMachine`]: Idle → Running ⇄ Paused → Completed
//!
//! # Ordering
//!
//! Steps reach the sink in emission order and the terminal [`RunSummary`]
//! arrives after the last step. Once the controller is detached nothing else
//! is delivered.

mod control;
mod controller;
mod emitter;
mod error;
mod outcome;
mod playback;
mod sink;
mod step;

pub use control::{Pacing, PlaybackControl, StepDelay};
pub use controller::{
    Completion, ControllerConfig, ExecutionController, Finished, Job, RunId, RunSummary,
};
pub use emitter::StepEmitter;
pub use error::{EngineError, Result, RunError};
pub use outcome::Outcome;
pub use playback::{Controls, PlaybackEvent, PlaybackMachine, PlaybackState, PlaybackStatus};
pub use sink::{ChannelSink, RecordingSink, RenderSink, SinkEvent};
pub use step::{Highlight, Layout, Role, Step};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;
    use stepviz_structures::Value;

    /// Emits one step per element, in order.
    struct Walk(Vec<Value>);

    impl Job for Walk {
        type Output = Vec<Value>;

        fn label(&self) -> String {
            "walk".into()
        }

        fn run(self, emitter: &mut StepEmitter) -> Completion<Vec<Value>> {
            let values = self.0;
            let result = (0..values.len())
                .try_for_each(|i| emitter.emit(Step::bars(&values).with(i, Role::Comparing)))
                .and_then(|()| emitter.emit_final(Step::bars(&values).all(Role::Sorted)))
                .map(|()| Outcome::Completed);
            Completion::new(values, result)
        }
    }

    #[test]
    fn channel_sink_sees_steps_then_summary() {
        let (sink, rx) = ChannelSink::bounded(2);
        let sink: Arc<dyn RenderSink> = Arc::new(sink);
        let mut controller = ExecutionController::new(ControllerConfig::unpaced());
        controller.start(Walk(vec![5.0, 6.0, 7.0]), &sink).unwrap();

        let mut seqs = Vec::new();
        loop {
            match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                SinkEvent::Step(step) => seqs.push(step.seq),
                SinkEvent::Finished(summary) => {
                    assert_eq!(summary.steps, 4);
                    assert_eq!(summary.result, Ok(Outcome::Completed));
                    break;
                }
            }
        }
        assert_eq!(seqs, vec![0, 1, 2, 3]);
        assert_eq!(controller.complete().unwrap().output, vec![5.0, 6.0, 7.0]);
    }

    #[test]
    fn pausing_does_not_change_the_step_sequence() {
        let reference = {
            let (sink, rx) = ChannelSink::bounded(64);
            let sink: Arc<dyn RenderSink> = Arc::new(sink);
            let mut controller = ExecutionController::new(ControllerConfig::unpaced());
            controller.start(Walk(vec![3.0, 1.0, 2.0]), &sink).unwrap();
            controller.complete().unwrap();
            drop(sink);
            rx.try_iter().collect::<Vec<_>>()
        };

        let (sink, rx) = ChannelSink::bounded(64);
        let sink: Arc<dyn RenderSink> = Arc::new(sink);
        let mut controller = ExecutionController::new(
            ControllerConfig::unpaced().with_delay(StepDelay::from_secs(StepDelay::MIN)),
        );
        controller.start(Walk(vec![3.0, 1.0, 2.0]), &sink).unwrap();
        controller.pause().unwrap();
        thread::sleep(Duration::from_millis(10));
        controller.resume().unwrap();
        controller.complete().unwrap();
        drop(sink);
        let paused: Vec<_> = rx.try_iter().collect();

        let steps = |events: &[SinkEvent]| -> Vec<Step> {
            events
                .iter()
                .filter_map(|event| match event {
                    SinkEvent::Step(step) => Some(step.clone()),
                    SinkEvent::Finished(_) => None,
                })
                .collect()
        };
        assert_eq!(steps(&reference), steps(&paused));
    }
}
