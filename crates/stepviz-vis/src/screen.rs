//! One screen instance: an operation menu, its operand and its controller.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stepviz_algorithms::{
    parse_values, InputError, Operand, OperationKind, OperationParams, ScreenKind,
    Workload,
};
use stepviz_engine::{
    ControllerConfig, EngineError, ExecutionController, Outcome, PlaybackState, PlaybackStatus,
    RenderSink, RunError, RunId, Step, StepDelay,
};
use tracing::{debug, warn};

use crate::error::{Result, ScreenError};

/// What the user asked to run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartRequest {
    pub operation: Option<OperationKind>,
    /// Comma-separated values. Required on sequence screens; on structure
    /// screens a non-blank value replaces the current structure.
    #[serde(default)]
    pub values: Option<String>,
    #[serde(default)]
    pub params: OperationParams,
}

impl StartRequest {
    pub fn new(operation: OperationKind) -> Self {
        Self {
            operation: Some(operation),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_values(mut self, values: impl Into<String>) -> Self {
        self.values = Some(values.into());
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: OperationParams) -> Self {
        self.params = params;
        self
    }
}

/// The joined result of a run, ready to show.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run: RunId,
    pub result: std::result::Result<Outcome, RunError>,
}

impl RunReport {
    /// User-facing message.
    pub fn message(&self) -> String {
        match &self.result {
            Ok(outcome) => outcome.to_string(),
            Err(err) => err.to_string(),
        }
    }
}

/// A screen instance.
///
/// Structure screens keep their linked list, stack or queue across runs:
/// the structure is moved into the worker on [`start`](Self::start) and
/// restored by [`finish`](Self::finish).
pub struct Screen {
    kind: ScreenKind,
    controller: ExecutionController<Workload>,
    structure: Option<Operand>,
    last_frame: Option<Step>,
}

impl Screen {
    pub fn new(kind: ScreenKind, config: ControllerConfig) -> Self {
        Self {
            kind,
            controller: ExecutionController::new(config),
            structure: kind.empty_operand(),
            last_frame: None,
        }
    }

    pub fn kind(&self) -> ScreenKind {
        self.kind
    }

    /// Parse, validate and start a run feeding `sink`.
    ///
    /// Nothing is spawned and the structure is untouched when the request
    /// is rejected.
    pub fn start(&mut self, request: StartRequest, sink: &Arc<dyn RenderSink>) -> Result<RunId> {
        if self.controller.is_detached() {
            return Err(EngineError::Detached.into());
        }
        if !self.controller.controls().start {
            return Err(EngineError::RunInProgress.into());
        }

        let kind = request
            .operation
            .ok_or(InputError::MissingParameter("operation"))?;
        if !self.kind.supports(kind) {
            return Err(ScreenError::Unsupported {
                screen: self.kind,
                operation: kind,
            });
        }
        let operation = kind.build(&request.params)?;
        let seeded = self.seed_operand(request.values.as_deref())?;

        let operand = match seeded {
            Some(operand) => operand,
            None => self
                .structure
                .clone()
                .unwrap_or_else(|| self.kind.operand_from(Vec::new())),
        };

        let workload = Workload::new(operand, operation)?;
        let structure = self.structure.take();
        match self.controller.start(workload, sink) {
            Ok(run) => {
                debug!(run = run.0, screen = %self.kind, %operation, "screen started run");
                Ok(run)
            }
            Err(err) => {
                self.structure = structure;
                Err(err.into())
            }
        }
    }

    /// Operand built from typed values, if any were given.
    fn seed_operand(&self, values: Option<&str>) -> Result<Option<Operand>> {
        match values {
            Some(raw) if !raw.trim().is_empty() => {
                Ok(Some(self.kind.operand_from(parse_values(raw)?)))
            }
            _ if self.kind.is_persistent() => Ok(None),
            _ => Err(InputError::Empty.into()),
        }
    }

    /// Join the run after its terminal notification and restore the structure.
    pub fn finish(&mut self) -> Result<RunReport> {
        match self.controller.complete() {
            Ok(finished) => {
                if self.kind.is_persistent() {
                    self.structure = Some(finished.output);
                }
                Ok(RunReport {
                    run: finished.run,
                    result: finished.result,
                })
            }
            Err(EngineError::WorkerPanicked) => {
                warn!(screen = %self.kind, "worker panicked; structure reset");
                self.structure = self.kind.empty_operand();
                Err(EngineError::WorkerPanicked.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Remember the most recent frame so the view can be redrawn.
    pub fn record(&mut self, step: &Step) {
        self.last_frame = Some(step.clone());
    }

    pub fn last_frame(&self) -> Option<&Step> {
        self.last_frame.as_ref()
    }

    /// Frame to draw when the screen is (re)opened.
    pub fn current_frame(&self) -> Option<Step> {
        self.last_frame
            .clone()
            .or_else(|| self.structure.as_ref().map(Operand::snapshot))
    }

    /// The structure between runs. `None` while a run owns it and on
    /// sequence screens.
    pub fn structure(&self) -> Option<&Operand> {
        self.structure.as_ref()
    }

    pub fn active_run(&self) -> Option<RunId> {
        self.controller.active_run()
    }

    pub fn pause(&mut self) -> Result<()> {
        Ok(self.controller.pause()?)
    }

    pub fn resume(&mut self) -> Result<()> {
        Ok(self.controller.resume()?)
    }

    pub fn toggle_pause(&mut self) -> Result<PlaybackState> {
        Ok(self.controller.toggle_pause()?)
    }

    pub fn set_delay(&mut self, delay: StepDelay) {
        self.controller.set_delay(delay);
    }

    pub fn set_step_mode(&mut self, enabled: bool) {
        self.controller.set_step_mode(enabled);
    }

    pub fn advance(&mut self) -> Result<()> {
        if self.controller.advance() {
            Ok(())
        } else {
            Err(ScreenError::AdvanceRejected)
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.controller.status()
    }

    /// Tear the screen down; a running worker stops at its next checkpoint
    /// and renders nothing further.
    pub fn close(&mut self) {
        self.controller.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepviz_engine::{Pacing, RecordingSink};

    fn screen(kind: ScreenKind) -> Screen {
        Screen::new(kind, ControllerConfig::default().with_pacing(Pacing::Unpaced))
    }

    fn sink() -> (Arc<RecordingSink>, Arc<dyn RenderSink>) {
        let recorder = Arc::new(RecordingSink::new());
        let sink: Arc<dyn RenderSink> = recorder.clone();
        (recorder, sink)
    }

    #[test]
    fn sorting_screen_runs_to_completion() {
        let (recorder, sink) = sink();
        let mut screen = screen(ScreenKind::Sorting);
        screen
            .start(StartRequest::new(OperationKind::BubbleSort).with_values("5,3,8,1"), &sink)
            .unwrap();
        let report = screen.finish().unwrap();
        assert_eq!(report.message(), "Done");
        assert_eq!(screen.state(), PlaybackState::Completed);
        assert_eq!(recorder.last_step().unwrap().values, vec![1.0, 3.0, 5.0, 8.0]);
    }

    #[test]
    fn sorting_screen_accepts_decimals() {
        let (recorder, sink) = sink();
        let mut screen = screen(ScreenKind::Sorting);
        screen
            .start(
                StartRequest::new(OperationKind::BucketSort).with_values("0.5, 0.25, 2, -1.75"),
                &sink,
            )
            .unwrap();
        assert_eq!(screen.finish().unwrap().message(), "Done");
        assert_eq!(recorder.last_step().unwrap().values, vec![-1.75, 0.25, 0.5, 2.0]);

        let err = screen
            .start(StartRequest::new(OperationKind::RadixSort).with_values("3,0.5"), &sink)
            .unwrap_err();
        assert!(matches!(err, ScreenError::Input(InputError::NotWhole { .. })));
        assert_eq!(err.to_string(), "radix-sort needs whole numbers, got 0.5");
    }

    #[test]
    fn invalid_input_leaves_screen_idle() {
        let (recorder, sink) = sink();
        let mut screen = screen(ScreenKind::Searching);

        let target = OperationParams::default().with_target(3);
        let err = screen
            .start(
                StartRequest::new(OperationKind::BinarySearch)
                    .with_values("3,x")
                    .with_params(target),
                &sink,
            )
            .unwrap_err();
        assert!(matches!(err, ScreenError::Input(InputError::InvalidNumber(_))));

        let err = screen
            .start(StartRequest::new(OperationKind::BinarySearch).with_values("1,3"), &sink)
            .unwrap_err();
        assert!(matches!(err, ScreenError::Input(InputError::MissingParameter("target"))));

        let err = screen
            .start(
                StartRequest::new(OperationKind::BinarySearch)
                    .with_values("3,1")
                    .with_params(target),
                &sink,
            )
            .unwrap_err();
        assert!(matches!(err, ScreenError::Input(InputError::Unsorted)));

        let err = screen
            .start(StartRequest::new(OperationKind::BubbleSort).with_values("1"), &sink)
            .unwrap_err();
        assert!(matches!(err, ScreenError::Unsupported { .. }));

        assert_eq!(screen.state(), PlaybackState::Idle);
        assert!(recorder.steps().is_empty());
    }

    #[test]
    fn sequence_screens_need_values() {
        let (_recorder, sink) = sink();
        let mut screen = screen(ScreenKind::Sorting);
        let err = screen
            .start(StartRequest::new(OperationKind::HeapSort), &sink)
            .unwrap_err();
        assert!(matches!(err, ScreenError::Input(InputError::Empty)));
    }

    #[test]
    fn stack_persists_across_runs() {
        let (_recorder, sink) = sink();
        let mut screen = screen(ScreenKind::Stack);
        for value in [1, 2, 3] {
            let params = OperationParams::default().with_value(value);
            screen
                .start(StartRequest::new(OperationKind::Push).with_params(params), &sink)
                .unwrap();
            screen.finish().unwrap();
        }

        let mut popped = Vec::new();
        for _ in 0..3 {
            screen.start(StartRequest::new(OperationKind::Pop), &sink).unwrap();
            popped.push(screen.finish().unwrap().message());
        }
        assert_eq!(popped, ["Popped value: 3", "Popped value: 2", "Popped value: 1"]);
        assert!(screen.structure().unwrap().is_empty());
    }

    #[test]
    fn rejected_position_keeps_the_list() {
        let (_recorder, sink) = sink();
        let mut screen = screen(ScreenKind::DoublyLinkedList);
        let params = OperationParams::default().with_value(10).with_position(2);
        screen
            .start(
                StartRequest::new(OperationKind::ListInsertPosition)
                    .with_values("1,2,3")
                    .with_params(params),
                &sink,
            )
            .unwrap();
        screen.finish().unwrap();
        assert_eq!(screen.structure().unwrap().values(), vec![1.0, 2.0, 10.0, 3.0]);

        let params = OperationParams::default().with_position(9);
        let err = screen
            .start(StartRequest::new(OperationKind::ListDeletePosition).with_params(params), &sink)
            .unwrap_err();
        assert!(matches!(
            err,
            ScreenError::Input(InputError::PositionOutOfRange { position: 9, len: 4 })
        ));
        assert_eq!(screen.structure().unwrap().values(), vec![1.0, 2.0, 10.0, 3.0]);
    }

    #[test]
    fn second_start_is_rejected_while_running() {
        let (_recorder, sink) = sink();
        let mut screen = Screen::new(
            ScreenKind::Sorting,
            ControllerConfig::default()
                .with_pacing(Pacing::Unpaced)
                .with_step_mode(true),
        );
        let request = StartRequest::new(OperationKind::QuickSort).with_values("3,2,1");
        screen.start(request.clone(), &sink).unwrap();
        assert!(matches!(
            screen.start(request, &sink),
            Err(ScreenError::Engine(EngineError::RunInProgress))
        ));

        screen.set_step_mode(false);
        assert!(screen.finish().is_ok());
    }

    #[test]
    fn closed_screen_refuses_runs() {
        let (_recorder, sink) = sink();
        let mut screen = screen(ScreenKind::Queue);
        screen.close();
        assert!(matches!(
            screen.start(StartRequest::new(OperationKind::Dequeue), &sink),
            Err(ScreenError::Engine(EngineError::Detached))
        ));
    }

    #[test]
    fn advance_outside_step_mode_is_an_error() {
        let mut screen = screen(ScreenKind::Sorting);
        assert!(matches!(screen.advance(), Err(ScreenError::AdvanceRejected)));
    }
}
