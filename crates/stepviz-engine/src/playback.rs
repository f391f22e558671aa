//! Playback state machine gating the user controls.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::control::StepDelay;
use crate::error::{EngineError, Result};

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// No run active; start is enabled
    #[default]
    Idle,
    /// An algorithm is executing on its worker
    Running,
    /// The worker is held at its checkpoint
    Paused,
    /// The last run returned normally; its final frame is on screen
    Completed,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Events that drive the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackEvent {
    Start,
    Pause,
    Resume,
    /// The algorithm body returned normally
    AlgorithmReturned,
    /// The run ended with an error or was cancelled
    Failed,
}

impl fmt::Display for PlaybackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Pause => write!(f, "pause"),
            Self::Resume => write!(f, "resume"),
            Self::AlgorithmReturned => write!(f, "complete"),
            Self::Failed => write!(f, "fail"),
        }
    }
}

/// Which controls the surface should enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub start: bool,
    pub pause: bool,
    pub resume: bool,
    pub advance: bool,
    pub speed: bool,
}

/// Idle → Running ⇄ Paused → Completed, driven by [`PlaybackEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct PlaybackMachine {
    state: PlaybackState,
    step_mode: bool,
}

impl PlaybackMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether a run is active (running or paused).
    pub fn is_active(&self) -> bool {
        matches!(self.state, PlaybackState::Running | PlaybackState::Paused)
    }

    /// Record the step-mode toggle so `controls` can expose the advance button.
    pub fn set_step_mode(&mut self, enabled: bool) {
        self.step_mode = enabled;
    }

    pub fn step_mode(&self) -> bool {
        self.step_mode
    }

    /// Apply an event, or reject it leaving the state unchanged.
    pub fn apply(&mut self, event: PlaybackEvent) -> Result<PlaybackState> {
        use PlaybackEvent as E;
        use PlaybackState as S;

        let next = match (self.state, event) {
            (S::Idle | S::Completed, E::Start) => S::Running,
            (S::Running, E::Pause) => S::Paused,
            (S::Paused, E::Resume) => S::Running,
            (S::Running | S::Paused, E::AlgorithmReturned) => S::Completed,
            (S::Running | S::Paused, E::Failed) => S::Idle,
            (state, event) => return Err(EngineError::InvalidTransition { state, event }),
        };
        self.state = next;
        Ok(next)
    }

    /// Enabled controls for the current state.
    pub fn controls(&self) -> Controls {
        let state = self.state;
        Controls {
            start: matches!(state, PlaybackState::Idle | PlaybackState::Completed),
            pause: state == PlaybackState::Running,
            resume: state == PlaybackState::Paused,
            advance: self.step_mode && state == PlaybackState::Running,
            speed: true,
        }
    }
}

/// Playback status for sending to frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    pub controls: Controls,
    pub delay: StepDelay,
    pub step_mode: bool,
}
