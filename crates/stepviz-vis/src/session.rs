//! Per-connection state: the open screen and its event stream.

use std::sync::Arc;

use stepviz_engine::{RenderSink, SinkEvent};
use tokio::sync::mpsc::Receiver;
use tracing::{debug, info, warn};

use crate::config::VisConfig;
use crate::error::{Result, ScreenError};
use crate::protocol::{ClientCommand, ViewEvent};
use crate::screen::Screen;
use crate::sink::AsyncChannelSink;

struct Attached {
    screen: Screen,
    sink: Arc<dyn RenderSink>,
    events: Receiver<SinkEvent>,
}

/// The interactive context of one connected view.
///
/// Every screen gets its own sink and channel, so steps from a run started
/// on a closed screen never reach the next one.
pub struct Session {
    config: VisConfig,
    attached: Option<Attached>,
}

impl Session {
    pub fn new(config: VisConfig) -> Self {
        Self {
            config,
            attached: None,
        }
    }

    pub fn screen(&self) -> Option<&Screen> {
        self.attached.as_ref().map(|a| &a.screen)
    }

    /// Apply a user command. Rejections come back as an `Error` event.
    pub fn handle(&mut self, command: ClientCommand) -> Vec<ViewEvent> {
        match self.dispatch(command) {
            Ok(events) => events,
            Err(err) => {
                debug!(%err, "command rejected");
                vec![ViewEvent::error(err)]
            }
        }
    }

    fn dispatch(&mut self, command: ClientCommand) -> Result<Vec<ViewEvent>> {
        if let ClientCommand::Open { screen } = command {
            self.close();
            let (sink, events) = AsyncChannelSink::bounded(self.config.channel_capacity);
            let screen = Screen::new(screen, self.config.controller());
            let opened = ViewEvent::Opened {
                screen: screen.kind(),
                operations: screen.kind().operations(),
                frame: screen.current_frame(),
                status: screen.status(),
            };
            info!(screen = %screen.kind(), "screen opened");
            self.attached = Some(Attached {
                screen,
                sink: Arc::new(sink),
                events,
            });
            return Ok(vec![opened]);
        }
        if let ClientCommand::Close = command {
            self.close();
            return Ok(vec![ViewEvent::Closed]);
        }

        let attached = self.attached.as_mut().ok_or(ScreenError::NoScreen)?;
        let screen = &mut attached.screen;
        match command {
            ClientCommand::Start { .. } => {
                if let Some(request) = command.start_request() {
                    screen.start(request, &attached.sink)?;
                }
            }
            ClientCommand::Pause => screen.pause()?,
            ClientCommand::Resume => screen.resume()?,
            ClientCommand::Speed { delay } => screen.set_delay(delay),
            ClientCommand::StepMode { enabled } => screen.set_step_mode(enabled),
            ClientCommand::Advance => screen.advance()?,
            ClientCommand::Status | ClientCommand::Open { .. } | ClientCommand::Close => {}
        }
        Ok(vec![ViewEvent::Status {
            status: screen.status(),
        }])
    }

    /// Turn a sink event into view events, joining the run when it ends.
    pub fn on_event(&mut self, event: SinkEvent) -> Vec<ViewEvent> {
        let Some(attached) = self.attached.as_mut() else {
            return Vec::new();
        };
        let screen = &mut attached.screen;
        match event {
            SinkEvent::Step(step) => {
                screen.record(&step);
                vec![ViewEvent::Step { step }]
            }
            SinkEvent::Finished(summary) => {
                debug!(run = summary.run.0, steps = summary.steps, "run reported finished");
                let first = match screen.finish() {
                    Ok(report) => ViewEvent::finished(&report),
                    Err(err) => {
                        warn!(%err, "run could not be joined");
                        ViewEvent::error(err)
                    }
                };
                vec![
                    first,
                    ViewEvent::Status {
                        status: screen.status(),
                    },
                ]
            }
        }
    }

    /// Next event from the open screen's worker. Pending while no screen is open.
    pub async fn recv(&mut self) -> Option<SinkEvent> {
        match self.attached.as_mut() {
            Some(attached) => attached.events.recv().await,
            None => std::future::pending().await,
        }
    }

    /// Close the open screen, detaching any run in flight.
    pub fn close(&mut self) {
        if let Some(mut attached) = self.attached.take() {
            attached.screen.close();
            debug!(screen = %attached.screen.kind(), "screen closed");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
