//! Background execution of one run per screen instance.
//!
//! The controller lives on the interactive context. `start` moves the job
//! (and the operand it owns) onto a fresh worker thread; the worker reports
//! steps and a terminal [`RunSummary`] through the render sink; the
//! interactive context then calls [`ExecutionController::complete`] to join
//! the worker, take the operand back and settle the state machine.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, info_span, trace, warn};

use crate::control::{Pacing, PlaybackControl, StepDelay};
use crate::emitter::StepEmitter;
use crate::error::{EngineError, Result, RunError};
use crate::outcome::Outcome;
use crate::playback::{Controls, PlaybackEvent, PlaybackMachine, PlaybackState, PlaybackStatus};
use crate::sink::RenderSink;

/// Identifier of one run on one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub u64);

/// Terminal notification delivered to the sink after the last step.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run: RunId,
    pub label: String,
    pub steps: u64,
    pub result: std::result::Result<Outcome, RunError>,
}

/// What a job hands back: its operand, whatever happened, and the result.
#[derive(Debug)]
pub struct Completion<T> {
    pub output: T,
    pub result: std::result::Result<Outcome, RunError>,
}

impl<T> Completion<T> {
    pub fn new(output: T, result: std::result::Result<Outcome, RunError>) -> Self {
        Self { output, result }
    }
}

/// A unit of work executed on the worker thread.
pub trait Job: Send + 'static {
    /// The operand returned to the interactive context when the run is joined.
    type Output: Send + 'static;

    /// Short human-readable name used in logs and summaries.
    fn label(&self) -> String;

    /// Execute the algorithm, publishing steps through `emitter`.
    fn run(self, emitter: &mut StepEmitter) -> Completion<Self::Output>;
}

/// A joined run.
#[derive(Debug)]
pub struct Finished<T> {
    pub run: RunId,
    pub output: T,
    pub result: std::result::Result<Outcome, RunError>,
}

/// Configuration for an execution controller.
#[derive(Debug, Clone, Default)]
pub struct ControllerConfig {
    /// Delay applied after each step until the user changes it
    pub initial_delay: StepDelay,
    /// Start in manual step mode
    pub step_mode: bool,
    /// Whether checkpoints honour the delay
    pub pacing: Pacing,
}

impl ControllerConfig {
    /// Config for headless runs: no delay between steps.
    #[must_use]
    pub fn unpaced() -> Self {
        Self {
            pacing: Pacing::Unpaced,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: StepDelay) -> Self {
        self.initial_delay = delay;
        self
    }

    #[must_use]
    pub fn with_step_mode(mut self, enabled: bool) -> Self {
        self.step_mode = enabled;
        self
    }

    #[must_use]
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }
}

struct ActiveRun<T> {
    id: RunId,
    handle: JoinHandle<Completion<T>>,
}

/// Runs jobs on background threads, one at a time, under playback control.
pub struct ExecutionController<J: Job> {
    control: PlaybackControl,
    machine: PlaybackMachine,
    active: Option<ActiveRun<J::Output>>,
    next_run: u64,
    detached: bool,
}

impl<J: Job> ExecutionController<J> {
    pub fn new(config: ControllerConfig) -> Self {
        let control = PlaybackControl::new(config.initial_delay, config.pacing);
        control.set_step_mode(config.step_mode);
        let mut machine = PlaybackMachine::new();
        machine.set_step_mode(config.step_mode);
        Self {
            control,
            machine,
            active: None,
            next_run: 1,
            detached: false,
        }
    }

    /// Spawn `job` on a new worker feeding `sink`.
    ///
    /// Only a weak reference to the sink is kept. Rejected while another run
    /// is active or not yet completed, and after [`detach`](Self::detach).
    pub fn start(&mut self, job: J, sink: &Arc<dyn RenderSink>) -> Result<RunId> {
        if self.detached {
            return Err(EngineError::Detached);
        }
        if self.active.is_some() || self.machine.is_active() {
            return Err(EngineError::RunInProgress);
        }

        let id = RunId(self.next_run);
        let label = job.label();
        self.control.reset_for_run();
        let handle = spawn_worker(id, job, self.control.clone(), Arc::downgrade(sink))?;
        self.machine.apply(PlaybackEvent::Start)?;
        self.next_run += 1;
        self.active = Some(ActiveRun { id, handle });
        info!(run = id.0, %label, "run started");
        Ok(id)
    }

    /// Hold the worker at its next checkpoint.
    pub fn pause(&mut self) -> Result<()> {
        self.machine.apply(PlaybackEvent::Pause)?;
        self.control.set_paused(true);
        Ok(())
    }

    /// Release a paused worker.
    pub fn resume(&mut self) -> Result<()> {
        self.machine.apply(PlaybackEvent::Resume)?;
        self.control.set_paused(false);
        Ok(())
    }

    /// Pause when running, resume when paused.
    pub fn toggle_pause(&mut self) -> Result<PlaybackState> {
        match self.machine.state() {
            PlaybackState::Paused => self.resume()?,
            _ => self.pause()?,
        }
        Ok(self.machine.state())
    }

    /// Change the step delay. Accepted in every state.
    pub fn set_delay(&mut self, delay: StepDelay) {
        self.control.set_delay(delay);
    }

    /// Toggle manual stepping. Accepted in every state.
    pub fn set_step_mode(&mut self, enabled: bool) {
        self.control.set_step_mode(enabled);
        self.machine.set_step_mode(enabled);
    }

    /// Release one step in step mode. Returns whether the advance was accepted.
    pub fn advance(&mut self) -> bool {
        self.machine.controls().advance && self.control.advance()
    }

    /// Join the active run. Call after the sink reported the run finished;
    /// blocks until the worker exits.
    pub fn complete(&mut self) -> Result<Finished<J::Output>> {
        let active = self.active.take().ok_or(EngineError::NoActiveRun)?;
        self.settle(active)
    }

    /// Join the active run if its worker has already exited.
    pub fn try_complete(&mut self) -> Option<Result<Finished<J::Output>>> {
        if !self.active.as_ref()?.handle.is_finished() {
            return None;
        }
        let active = self.active.take()?;
        Some(self.settle(active))
    }

    /// Tear down: cancel the run at its next checkpoint and stop delivering
    /// to the sink. The worker is left to exit on its own.
    pub fn detach(&mut self) {
        if self.detached {
            return;
        }
        self.detached = true;
        self.control.cancel();
        if let Some(active) = self.active.take() {
            debug!(run = active.id.0, "detached while run active; worker left to drain");
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.machine.state()
    }

    pub fn controls(&self) -> Controls {
        self.machine.controls()
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            state: self.machine.state(),
            controls: self.machine.controls(),
            delay: self.control.delay(),
            step_mode: self.machine.step_mode(),
        }
    }

    /// Id of the active run, if any.
    pub fn active_run(&self) -> Option<RunId> {
        self.active.as_ref().map(|active| active.id)
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Shared playback signals, for surfaces that drive them directly.
    pub fn control(&self) -> &PlaybackControl {
        &self.control
    }

    fn settle(&mut self, active: ActiveRun<J::Output>) -> Result<Finished<J::Output>> {
        let joined = active.handle.join();
        self.control.reset_for_run();

        let completion = match joined {
            Ok(completion) => completion,
            Err(_) => {
                self.transition(PlaybackEvent::Failed);
                return Err(EngineError::WorkerPanicked);
            }
        };

        let event = match completion.result {
            Ok(_) => PlaybackEvent::AlgorithmReturned,
            Err(_) => PlaybackEvent::Failed,
        };
        self.transition(event);
        Ok(Finished {
            run: active.id,
            output: completion.output,
            result: completion.result,
        })
    }

    fn transition(&mut self, event: PlaybackEvent) {
        if let Err(err) = self.machine.apply(event) {
            warn!(%err, "unexpected playback transition");
        }
    }
}

impl<J: Job> Drop for ExecutionController<J> {
    fn drop(&mut self) {
        self.detach();
    }
}

fn spawn_worker<J: Job>(
    id: RunId,
    job: J,
    control: PlaybackControl,
    sink: Weak<dyn RenderSink>,
) -> std::io::Result<JoinHandle<Completion<J::Output>>> {
    thread::Builder::new()
        .name(format!("stepviz-run-{}", id.0))
        .spawn(move || {
            let label = job.label();
            let span = info_span!("run", id = id.0, label = %label);
            let _entered = span.enter();

            let mut emitter = StepEmitter::new(id, control.clone(), sink.clone());
            let completion = match panic::catch_unwind(AssertUnwindSafe(|| job.run(&mut emitter))) {
                Ok(completion) => completion,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!(%message, "algorithm panicked");
                    notify(
                        &control,
                        &sink,
                        RunSummary {
                            run: id,
                            label,
                            steps: emitter.emitted(),
                            result: Err(RunError::Panicked(message)),
                        },
                    );
                    panic::resume_unwind(payload);
                }
            };

            let steps = emitter.emitted();
            match &completion.result {
                Ok(outcome) => info!(steps, %outcome, "run completed"),
                Err(RunError::Cancelled) => debug!(steps, "run cancelled"),
                Err(err) => warn!(steps, %err, "run failed"),
            }
            notify(
                &control,
                &sink,
                RunSummary {
                    run: id,
                    label,
                    steps,
                    result: completion.result.clone(),
                },
            );
            completion
        })
}

fn notify(control: &PlaybackControl, sink: &Weak<dyn RenderSink>, summary: RunSummary) {
    if control.is_cancelled() {
        trace!(run = summary.run.0, "run detached; summary discarded");
        return;
    }
    match sink.upgrade() {
        Some(sink) => sink.on_finished(summary),
        None => trace!(run = summary.run.0, "sink dropped; summary discarded"),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;
    use crate::step::{Role, Step};
    use std::time::{Duration, Instant};
    use stepviz_structures::{StructureError, Value};

    /// Increments every element, emitting a step per element.
    struct BumpJob {
        values: Vec<Value>,
        fail_at: Option<usize>,
        panic: bool,
    }

    impl BumpJob {
        fn new(values: Vec<Value>) -> Self {
            Self {
                values,
                fail_at: None,
                panic: false,
            }
        }
    }

    fn bump(
        values: &mut [Value],
        fail_at: Option<usize>,
        emitter: &mut StepEmitter,
    ) -> std::result::Result<Outcome, RunError> {
        for i in 0..values.len() {
            emitter.emit(Step::bars(values).with(i, Role::Comparing))?;
            if fail_at == Some(i) {
                return Err(StructureError::PositionOutOfRange {
                    position: i,
                    len: values.len(),
                }
                .into());
            }
            values[i] += 1.0;
        }
        emitter.emit_final(Step::bars(values).all(Role::Sorted))?;
        Ok(Outcome::Completed)
    }

    impl Job for BumpJob {
        type Output = Vec<Value>;

        fn label(&self) -> String {
            "bump".into()
        }

        fn run(self, emitter: &mut StepEmitter) -> Completion<Vec<Value>> {
            if self.panic {
                panic!("bump exploded");
            }
            let mut values = self.values;
            let result = bump(&mut values, self.fail_at, emitter);
            Completion::new(values, result)
        }
    }

    fn recorder() -> (Arc<RecordingSink>, Arc<dyn RenderSink>) {
        let recorder = Arc::new(RecordingSink::new());
        let sink: Arc<dyn RenderSink> = recorder.clone();
        (recorder, sink)
    }

    fn wait_until(condition: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !condition() {
            assert!(Instant::now() < deadline, "condition not reached in time");
            thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn run_completes_and_returns_operand() {
        let (recorder, sink) = recorder();
        let mut controller = ExecutionController::new(ControllerConfig::unpaced());

        let run = controller.start(BumpJob::new(vec![1.0, 2.0, 3.0]), &sink).unwrap();
        assert_eq!(controller.state(), PlaybackState::Running);

        let finished = controller.complete().unwrap();
        assert_eq!(finished.run, run);
        assert_eq!(finished.output, vec![2.0, 3.0, 4.0]);
        assert_eq!(finished.result, Ok(Outcome::Completed));
        assert_eq!(controller.state(), PlaybackState::Completed);

        let steps = recorder.steps();
        assert_eq!(steps.len(), 4);
        assert!(steps.last().unwrap().is_terminal_view());
        let summaries = recorder.summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].steps, 4);
    }

    #[test]
    fn second_start_while_active_is_rejected() {
        let (_recorder, sink) = recorder();
        let mut controller =
            ExecutionController::new(ControllerConfig::unpaced().with_step_mode(true));

        controller.start(BumpJob::new(vec![1.0, 2.0]), &sink).unwrap();
        let err = controller.start(BumpJob::new(vec![9.0]), &sink).unwrap_err();
        assert!(matches!(err, EngineError::RunInProgress));

        controller.set_step_mode(false);
        let finished = controller.complete().unwrap();
        assert_eq!(finished.output, vec![2.0, 3.0]);

        // A completed controller accepts the next run.
        controller.start(BumpJob::new(vec![5.0]), &sink).unwrap();
        assert_eq!(controller.complete().unwrap().output, vec![6.0]);
    }

    #[test]
    fn finished_but_unjoined_run_still_blocks_start() {
        let (recorder, sink) = recorder();
        let mut controller = ExecutionController::new(ControllerConfig::unpaced());
        controller.start(BumpJob::new(vec![1.0]), &sink).unwrap();
        wait_until(|| !recorder.summaries().is_empty());

        assert!(matches!(
            controller.start(BumpJob::new(vec![1.0]), &sink),
            Err(EngineError::RunInProgress)
        ));
        assert!(controller.complete().is_ok());
    }

    #[test]
    fn step_mode_advances_one_step_at_a_time() {
        let (recorder, sink) = recorder();
        let mut controller =
            ExecutionController::new(ControllerConfig::unpaced().with_step_mode(true));
        controller.start(BumpJob::new(vec![1.0, 2.0, 3.0]), &sink).unwrap();

        wait_until(|| recorder.steps().len() == 1);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(recorder.steps().len(), 1);
        assert!(controller.try_complete().is_none());

        assert!(controller.advance());
        wait_until(|| recorder.steps().len() == 2);
        assert!(controller.advance());
        wait_until(|| recorder.steps().len() == 3);
        assert!(controller.advance());

        let finished = controller.complete().unwrap();
        assert_eq!(finished.output, vec![2.0, 3.0, 4.0]);
        assert_eq!(recorder.steps().len(), 4);
    }

    #[test]
    fn pause_and_resume_route_through_state_machine() {
        let (recorder, sink) = recorder();
        let mut controller =
            ExecutionController::new(ControllerConfig::unpaced().with_step_mode(true));
        assert!(controller.pause().is_err());

        controller.start(BumpJob::new(vec![1.0, 2.0]), &sink).unwrap();
        wait_until(|| recorder.steps().len() == 1);

        assert_eq!(controller.toggle_pause().unwrap(), PlaybackState::Paused);
        assert!(controller.control().is_paused());
        assert!(!controller.advance());
        assert!(controller.controls().resume);

        controller.set_step_mode(false);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(recorder.steps().len(), 1);

        assert_eq!(controller.toggle_pause().unwrap(), PlaybackState::Running);
        let finished = controller.complete().unwrap();
        assert_eq!(finished.output, vec![2.0, 3.0]);
        assert!(!controller.control().is_paused());
    }

    #[test]
    fn structural_error_returns_to_idle() {
        let (recorder, sink) = recorder();
        let mut controller = ExecutionController::new(ControllerConfig::unpaced());
        let mut job = BumpJob::new(vec![1.0, 2.0, 3.0]);
        job.fail_at = Some(1);

        controller.start(job, &sink).unwrap();
        let finished = controller.complete().unwrap();
        assert!(matches!(
            finished.result,
            Err(RunError::Structure(StructureError::PositionOutOfRange { position: 1, .. }))
        ));
        assert_eq!(finished.output, vec![2.0, 2.0, 3.0]);
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert!(recorder.summaries()[0].result.is_err());
    }

    #[test]
    fn worker_panic_is_contained() {
        let (recorder, sink) = recorder();
        let mut controller = ExecutionController::new(ControllerConfig::unpaced());
        let mut job = BumpJob::new(vec![1.0]);
        job.panic = true;

        controller.start(job, &sink).unwrap();
        assert!(matches!(controller.complete(), Err(EngineError::WorkerPanicked)));
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert!(matches!(
            recorder.summaries()[0].result,
            Err(RunError::Panicked(ref message)) if message == "bump exploded"
        ));
    }

    #[test]
    fn detach_discards_late_steps() {
        let (recorder, sink) = recorder();
        let mut controller =
            ExecutionController::new(ControllerConfig::unpaced().with_step_mode(true));
        controller.start(BumpJob::new(vec![1.0, 2.0, 3.0]), &sink).unwrap();
        wait_until(|| recorder.steps().len() == 1);

        controller.detach();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(recorder.steps().len(), 1);
        assert!(recorder.summaries().is_empty());

        assert!(matches!(
            controller.start(BumpJob::new(vec![1.0]), &sink),
            Err(EngineError::Detached)
        ));
    }

    #[test]
    fn dropped_sink_does_not_stop_the_run() {
        let (recorder, sink) = recorder();
        let mut controller = ExecutionController::new(ControllerConfig::unpaced());
        controller.start(BumpJob::new(vec![1.0, 2.0]), &sink).unwrap();
        drop(sink);
        drop(recorder);
        assert_eq!(controller.complete().unwrap().output, vec![2.0, 3.0]);
    }

    #[test]
    fn complete_without_run_is_an_error() {
        let mut controller: ExecutionController<BumpJob> =
            ExecutionController::new(ControllerConfig::default());
        assert!(matches!(controller.complete(), Err(EngineError::NoActiveRun)));
        assert!(controller.try_complete().is_none());
    }

    #[test]
    fn status_reflects_speed_and_mode() {
        let mut controller: ExecutionController<BumpJob> =
            ExecutionController::new(ControllerConfig::default());
        controller.set_delay(StepDelay::from_secs(1.0));
        controller.set_step_mode(true);
        let status = controller.status();
        assert_eq!(status.state, PlaybackState::Idle);
        assert_eq!(status.delay.as_secs(), 1.0);
        assert!(status.step_mode);
    }
}
