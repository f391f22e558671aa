//! Render sink contract and the stock sinks.
//!
//! The worker calls the sink directly. Sinks that feed a UI must hand the
//! step over to the interactive context instead of drawing in place; the
//! channel sinks do that with bounded channels, which preserve order and
//! apply backpressure to the worker rather than dropping steps.

use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Mutex, PoisonError};

use tracing::trace;

use crate::controller::RunSummary;
use crate::step::Step;

/// Consumer of the steps and the terminal notification of a run.
pub trait RenderSink: Send + Sync {
    /// Called once per emitted step, in emission order.
    fn on_step(&self, step: Step);

    /// Called once after the last step of a run.
    fn on_finished(&self, summary: RunSummary);
}

/// A step or terminal notification marshaled to the interactive context.
#[derive(Debug, Clone)]
pub enum SinkEvent {
    Step(Step),
    Finished(RunSummary),
}

/// Forwards events over a bounded channel to a thread that owns the view.
#[derive(Debug)]
pub struct ChannelSink {
    tx: SyncSender<SinkEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiving end. The worker blocks when
    /// `capacity` events are waiting.
    pub fn bounded(capacity: usize) -> (Self, Receiver<SinkEvent>) {
        let (tx, rx) = mpsc::sync_channel(capacity.max(1));
        (Self { tx }, rx)
    }

    fn forward(&self, event: SinkEvent) {
        if self.tx.send(event).is_err() {
            trace!("render receiver dropped; event discarded");
        }
    }
}

impl RenderSink for ChannelSink {
    fn on_step(&self, step: Step) {
        self.forward(SinkEvent::Step(step));
    }

    fn on_finished(&self, summary: RunSummary) {
        self.forward(SinkEvent::Finished(summary));
    }
}

/// Keeps every event in memory. Used for headless runs and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    steps: Mutex<Vec<Step>>,
    summaries: Mutex<Vec<RunSummary>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps received so far, in arrival order.
    pub fn steps(&self) -> Vec<Step> {
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent step, if any.
    pub fn last_step(&self) -> Option<Step> {
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Terminal notifications received so far.
    pub fn summaries(&self) -> Vec<RunSummary> {
        self.summaries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RenderSink for RecordingSink {
    fn on_step(&self, step: Step) {
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(step);
    }

    fn on_finished(&self, summary: RunSummary) {
        self.summaries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(summary);
    }
}
