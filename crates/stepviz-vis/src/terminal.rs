//! Terminal driver: renders steps as text and maps keys to playback controls.

use std::io::Write;
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use stepviz_algorithms::ScreenKind;
use stepviz_engine::{
    ChannelSink, ControllerConfig, Pacing, PlaybackStatus, RenderSink, SinkEvent, StepDelay,
};
use tracing::{debug, info};

use crate::error::Result;
use crate::render::TextCanvas;
use crate::screen::{RunReport, Screen, StartRequest};

/// How often pending key commands are checked while waiting for a step.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Speed control increment, in seconds.
const DELAY_STEP: f64 = 0.1;

/// A key command typed while a run is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    TogglePause,
    Advance,
    Faster,
    Slower,
    ToggleStepMode,
    Quit,
}

impl KeyCommand {
    /// `p` pause/resume, `n` next step, `+`/`-` speed, `s` step mode, `q` quit.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "p" | "pause" | "resume" => Some(Self::TogglePause),
            "n" | "next" | "" => Some(Self::Advance),
            "+" | "f" => Some(Self::Faster),
            "-" | "l" => Some(Self::Slower),
            "s" | "step" => Some(Self::ToggleStepMode),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Settings for one terminal run.
#[derive(Debug, Clone)]
pub struct TerminalOptions {
    pub delay: StepDelay,
    pub step_mode: bool,
    pub color: bool,
    pub pacing: Pacing,
    pub channel_capacity: usize,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            delay: StepDelay::default(),
            step_mode: false,
            color: true,
            pacing: Pacing::Realtime,
            channel_capacity: 16,
        }
    }
}

impl TerminalOptions {
    fn controller(&self) -> ControllerConfig {
        ControllerConfig::default()
            .with_delay(self.delay)
            .with_step_mode(self.step_mode)
            .with_pacing(self.pacing)
    }

    fn canvas(&self) -> TextCanvas {
        if self.color {
            TextCanvas::ansi()
        } else {
            TextCanvas::plain()
        }
    }
}

/// Drives one screen from a terminal: the calling thread is the
/// interactive context, the run executes on the controller's worker.
pub struct TerminalDriver<W: Write> {
    out: W,
    canvas: TextCanvas,
    screen: Screen,
    capacity: usize,
}

impl<W: Write> TerminalDriver<W> {
    pub fn new(kind: ScreenKind, options: &TerminalOptions, out: W) -> Self {
        Self {
            out,
            canvas: options.canvas(),
            screen: Screen::new(kind, options.controller()),
            capacity: options.channel_capacity,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run `request` to completion, honouring key commands as they arrive.
    ///
    /// Returns `None` when the user quit before the run finished.
    pub fn run(
        &mut self,
        request: StartRequest,
        keys: &Receiver<KeyCommand>,
    ) -> Result<Option<RunReport>> {
        let (sink, events) = ChannelSink::bounded(self.capacity);
        let sink: Arc<dyn RenderSink> = Arc::new(sink);
        let run = self.screen.start(request, &sink)?;
        info!(run = run.0, screen = %self.screen.kind(), "terminal run started");

        loop {
            if self.drain_keys(keys)? {
                self.screen.close();
                writeln!(self.out, "Stopped.")?;
                return Ok(None);
            }

            match events.recv_timeout(POLL_INTERVAL) {
                Ok(SinkEvent::Step(step)) => {
                    self.screen.record(&step);
                    write!(self.out, "{}", self.canvas.render(&step))?;
                    writeln!(self.out)?;
                }
                Ok(SinkEvent::Finished(_)) => {
                    let report = self.screen.finish()?;
                    writeln!(self.out, "{}", report.message())?;
                    self.out.flush()?;
                    return Ok(Some(report));
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("render channel closed before the run finished");
                    let report = self.screen.finish()?;
                    return Ok(Some(report));
                }
            }
        }
    }

    /// Apply pending key commands. Returns true on quit.
    fn drain_keys(&mut self, keys: &Receiver<KeyCommand>) -> Result<bool> {
        loop {
            let key = match keys.try_recv() {
                Ok(key) => key,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return Ok(false),
            };
            if key == KeyCommand::Quit {
                return Ok(true);
            }
            if let Err(err) = self.apply(key) {
                writeln!(self.out, "! {err}")?;
            }
        }
    }

    fn apply(&mut self, key: KeyCommand) -> Result<()> {
        let delay = self.screen.status().delay.as_secs();
        match key {
            KeyCommand::TogglePause => {
                self.screen.toggle_pause()?;
            }
            KeyCommand::Advance => self.screen.advance()?,
            KeyCommand::Faster => self.screen.set_delay(StepDelay::from_secs(delay - DELAY_STEP)),
            KeyCommand::Slower => self.screen.set_delay(StepDelay::from_secs(delay + DELAY_STEP)),
            KeyCommand::ToggleStepMode => {
                let enabled = !self.screen.status().step_mode;
                self.screen.set_step_mode(enabled);
            }
            KeyCommand::Quit => {}
        }
        let status = self.screen.status();
        writeln!(self.out, "{}", status_line(&status))?;
        Ok(())
    }
}

fn status_line(status: &PlaybackStatus) -> String {
    format!(
        "[{}] delay {:.1}s{}",
        status.state,
        status.delay.as_secs(),
        if status.step_mode { ", step mode" } else { "" }
    )
}
