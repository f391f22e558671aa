//! Playback signals shared between the interactive context and the worker.
//!
//! The pause flag, step mode, pending manual advances and cancellation sit
//! behind one mutex with a condition variable, so a waiting worker wakes as
//! soon as any of them changes. The per-step delay is read on every
//! checkpoint and lives in an atomic so the slider never contends with the
//! worker.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RunError;

/// Seconds of delay applied after each emitted step, clamped to
/// [`StepDelay::MIN`]..=[`StepDelay::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct StepDelay(f64);

impl StepDelay {
    /// Shortest delay the speed control allows.
    pub const MIN: f64 = 0.1;
    /// Longest delay the speed control allows.
    pub const MAX: f64 = 2.0;
    /// Delay used until the user moves the speed control.
    pub const DEFAULT: f64 = 0.5;

    /// Build a delay from seconds. Non-finite input falls back to the default.
    pub fn from_secs(secs: f64) -> Self {
        if secs.is_finite() {
            Self(secs.clamp(Self::MIN, Self::MAX))
        } else {
            Self(Self::DEFAULT)
        }
    }

    pub fn as_secs(self) -> f64 {
        self.0
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_secs_f64(self.0)
    }
}

impl Default for StepDelay {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<f64> for StepDelay {
    fn from(secs: f64) -> Self {
        Self::from_secs(secs)
    }
}

impl From<StepDelay> for f64 {
    fn from(delay: StepDelay) -> Self {
        delay.0
    }
}

/// Whether checkpoints honour the delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pacing {
    /// Sleep for the current [`StepDelay`] after each step
    #[default]
    Realtime,
    /// No delay; pause and step mode still apply (headless runs)
    Unpaced,
}

#[derive(Debug, Default)]
struct Signals {
    paused: bool,
    step_mode: bool,
    advances: u64,
    cancelled: bool,
}

#[derive(Debug)]
struct Shared {
    signals: Mutex<Signals>,
    wake: Condvar,
    delay_bits: AtomicU64,
    pacing: Pacing,
}

/// Handle to the shared playback signals. Clones refer to the same state.
#[derive(Debug, Clone)]
pub struct PlaybackControl {
    shared: Arc<Shared>,
}

impl PlaybackControl {
    /// Create signals with the given initial delay and pacing.
    pub fn new(delay: StepDelay, pacing: Pacing) -> Self {
        Self {
            shared: Arc::new(Shared {
                signals: Mutex::new(Signals::default()),
                wake: Condvar::new(),
                delay_bits: AtomicU64::new(delay.as_secs().to_bits()),
                pacing,
            }),
        }
    }

    fn signals(&self) -> MutexGuard<'_, Signals> {
        self.shared
            .signals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, apply: impl FnOnce(&mut Signals)) {
        let mut signals = self.signals();
        apply(&mut signals);
        drop(signals);
        self.shared.wake.notify_all();
    }

    /// Suspend or release the worker at its next checkpoint.
    pub fn set_paused(&self, paused: bool) {
        debug!(paused, "pause flag changed");
        self.update(|s| s.paused = paused);
    }

    pub fn is_paused(&self) -> bool {
        self.signals().paused
    }

    /// Replace the timed delay with manual advances, or switch back.
    pub fn set_step_mode(&self, enabled: bool) {
        debug!(enabled, "step mode changed");
        self.update(|s| {
            s.step_mode = enabled;
            s.advances = 0;
        });
    }

    /// Release one checkpoint in step mode. Ignored outside step mode.
    pub fn advance(&self) -> bool {
        let mut accepted = false;
        self.update(|s| {
            if s.step_mode {
                s.advances += 1;
                accepted = true;
            }
        });
        accepted
    }

    /// Ask the worker to stop at its next checkpoint. Irreversible.
    pub fn cancel(&self) {
        self.update(|s| s.cancelled = true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.signals().cancelled
    }

    /// Change the delay; takes effect at the next checkpoint.
    pub fn set_delay(&self, delay: StepDelay) {
        debug!(secs = delay.as_secs(), "step delay changed");
        self.shared
            .delay_bits
            .store(delay.as_secs().to_bits(), Ordering::Relaxed);
    }

    pub fn delay(&self) -> StepDelay {
        StepDelay(f64::from_bits(self.shared.delay_bits.load(Ordering::Relaxed)))
    }

    pub fn pacing(&self) -> Pacing {
        self.shared.pacing
    }

    /// Drop a stale pause or queued advances before a new run starts.
    pub(crate) fn reset_for_run(&self) {
        self.update(|s| {
            s.paused = false;
            s.advances = 0;
        });
    }

    /// Block the worker for one checkpoint.
    ///
    /// Waits out the delay (or one manual advance in step mode), then waits
    /// while paused. Returns [`RunError::Cancelled`] as soon as the run is
    /// cancelled.
    pub fn checkpoint(&self) -> Result<(), RunError> {
        let deadline = Instant::now() + self.delay().as_duration();
        let mut signals = self.signals();

        loop {
            if signals.cancelled {
                return Err(RunError::Cancelled);
            }
            if signals.step_mode {
                if signals.advances > 0 {
                    signals.advances -= 1;
                    break;
                }
                signals = self.wait(signals);
                continue;
            }
            if self.shared.pacing == Pacing::Unpaced {
                break;
            }
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            signals = self.wait_timeout(signals, deadline - now);
        }

        while signals.paused && !signals.cancelled {
            signals = self.wait(signals);
        }
        if signals.cancelled {
            return Err(RunError::Cancelled);
        }
        Ok(())
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, Signals>) -> MutexGuard<'a, Signals> {
        self.shared
            .wake
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn wait_timeout<'a>(
        &self,
        guard: MutexGuard<'a, Signals>,
        timeout: Duration,
    ) -> MutexGuard<'a, Signals> {
        self.shared
            .wake
            .wait_timeout(guard, timeout)
            .unwrap_or_else(PoisonError::into_inner)
            .0
    }
}

impl Default for PlaybackControl {
    fn default() -> Self {
        Self::new(StepDelay::default(), Pacing::default())
    }
}
