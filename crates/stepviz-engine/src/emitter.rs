//! The checkpoint algorithms call to publish a step.

use std::sync::{Arc, Weak};

use tracing::trace;

use crate::control::{Pacing, PlaybackControl, StepDelay};
use crate::controller::RunId;
use crate::error::RunError;
use crate::sink::{RecordingSink, RenderSink};
use crate::step::Step;

/// Publishes steps to the render sink and paces the calling algorithm.
///
/// This is the only place a run suspends. It holds a weak reference to the
/// sink: once the view drops it, later steps are discarded.
pub struct StepEmitter {
    run: RunId,
    control: PlaybackControl,
    sink: Weak<dyn RenderSink>,
    emitted: u64,
}

impl StepEmitter {
    pub fn new(run: RunId, control: PlaybackControl, sink: Weak<dyn RenderSink>) -> Self {
        Self {
            run,
            control,
            sink,
            emitted: 0,
        }
    }

    /// Unpaced emitter feeding a fresh [`RecordingSink`].
    ///
    /// The returned `Arc` keeps the sink attached; drop it to detach.
    pub fn recording() -> (Self, Arc<RecordingSink>) {
        let recorder = Arc::new(RecordingSink::new());
        let sink: Arc<dyn RenderSink> = recorder.clone();
        let control = PlaybackControl::new(StepDelay::default(), Pacing::Unpaced);
        (Self::new(RunId(0), control, Arc::downgrade(&sink)), recorder)
    }

    /// Render `step`, then block for the delay or a manual advance, then
    /// while paused.
    pub fn emit(&mut self, step: Step) -> Result<(), RunError> {
        if self.control.is_cancelled() {
            return Err(RunError::Cancelled);
        }
        self.deliver(step);
        self.control.checkpoint()
    }

    /// Render the terminal frame of a run without pacing.
    pub fn emit_final(&mut self, step: Step) -> Result<(), RunError> {
        if self.control.is_cancelled() {
            return Err(RunError::Cancelled);
        }
        self.deliver(step);
        Ok(())
    }

    /// Number of steps emitted so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    fn deliver(&mut self, mut step: Step) {
        step.seq = self.emitted;
        self.emitted += 1;
        match self.sink.upgrade() {
            Some(sink) => {
                trace!(run = self.run.0, seq = step.seq, "step delivered");
                sink.on_step(step);
            }
            None => trace!(run = self.run.0, seq = step.seq, "sink detached; step discarded"),
        }
    }
}
