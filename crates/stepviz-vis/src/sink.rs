//! Render sink that hands steps to an async task.

use stepviz_engine::{RenderSink, RunSummary, SinkEvent, Step};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::trace;

/// Forwards events to a tokio task over a bounded channel.
///
/// Only the worker thread sends, and it does so with `blocking_send`, so a
/// slow socket holds the worker at its current step instead of dropping it.
#[derive(Debug, Clone)]
pub struct AsyncChannelSink {
    tx: Sender<SinkEvent>,
}

impl AsyncChannelSink {
    pub fn bounded(capacity: usize) -> (Self, Receiver<SinkEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    fn forward(&self, event: SinkEvent) {
        if self.tx.blocking_send(event).is_err() {
            trace!("session receiver dropped; event discarded");
        }
    }
}

impl RenderSink for AsyncChannelSink {
    fn on_step(&self, step: Step) {
        self.forward(SinkEvent::Step(step));
    }

    fn on_finished(&self, summary: RunSummary) {
        self.forward(SinkEvent::Finished(summary));
    }
}
