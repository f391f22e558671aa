//! JSON messages exchanged with the browser canvas.

use serde::{Deserialize, Serialize};
use stepviz_algorithms::{OperationKind, OperationParams, ScreenKind};
use stepviz_engine::{Outcome, PlaybackStatus, RunId, Step, StepDelay};

use crate::screen::{RunReport, StartRequest};

/// A user action sent by the view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Open a screen from the menu, replacing the current one.
    Open { screen: ScreenKind },
    Start {
        operation: OperationKind,
        #[serde(default)]
        values: Option<String>,
        #[serde(default)]
        params: OperationParams,
    },
    Pause,
    Resume,
    Speed { delay: StepDelay },
    StepMode { enabled: bool },
    Advance,
    Status,
    /// Back to the menu.
    Close,
}

impl ClientCommand {
    /// The start request carried by a `Start` command.
    pub fn start_request(&self) -> Option<StartRequest> {
        match self {
            ClientCommand::Start {
                operation,
                values,
                params,
            } => Some(StartRequest {
                operation: Some(*operation),
                values: values.clone(),
                params: *params,
            }),
            _ => None,
        }
    }
}

/// Something the view should draw or show.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    Opened {
        screen: ScreenKind,
        operations: Vec<OperationKind>,
        frame: Option<Step>,
        status: PlaybackStatus,
    },
    Step { step: Step },
    Finished {
        run: RunId,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        outcome: Option<Outcome>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Status { status: PlaybackStatus },
    Closed,
    Error { message: String },
}

impl ViewEvent {
    pub fn error(err: impl std::fmt::Display) -> Self {
        ViewEvent::Error {
            message: err.to_string(),
        }
    }

    pub fn finished(report: &RunReport) -> Self {
        let message = report.message();
        match &report.result {
            Ok(outcome) => ViewEvent::Finished {
                run: report.run,
                message,
                outcome: Some(outcome.clone()),
                error: None,
            },
            Err(err) => ViewEvent::Finished {
                run: report.run,
                message,
                outcome: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// One screen of the operation menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenMenu {
    pub screen: ScreenKind,
    pub title: String,
    pub persistent: bool,
    pub operations: Vec<MenuEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuEntry {
    pub operation: OperationKind,
    pub parameters: Vec<String>,
}

/// The full menu, in display order.
pub fn menu() -> Vec<ScreenMenu> {
    ScreenKind::ALL
        .into_iter()
        .map(|screen| ScreenMenu {
            screen,
            title: screen.to_string(),
            persistent: screen.is_persistent(),
            operations: screen
                .operations()
                .into_iter()
                .map(|operation| MenuEntry {
                    operation,
                    parameters: operation.parameters().iter().map(|p| p.to_string()).collect(),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepviz_engine::RunError;
    use stepviz_structures::StructureError;

    #[test]
    fn parses_start_with_defaults() {
        let cmd: ClientCommand =
            serde_json::from_str(r#"{"type":"start","operation":"bubble-sort","values":"3,1,2"}"#)
                .unwrap();
        let request = cmd.start_request().unwrap();
        assert_eq!(request.operation, Some(OperationKind::BubbleSort));
        assert_eq!(request.values.as_deref(), Some("3,1,2"));
        assert_eq!(request.params, OperationParams::default());
    }

    #[test]
    fn parses_params_and_controls() {
        let cmd: ClientCommand = serde_json::from_str(
            r#"{"type":"start","operation":"list-insert-position","params":{"value":10,"position":2}}"#,
        )
        .unwrap();
        let request = cmd.start_request().unwrap();
        assert_eq!(request.params.value, Some(10.0));
        assert_eq!(request.params.position, Some(2));
        assert!(request.values.is_none());

        let cmd: ClientCommand = serde_json::from_str(r#"{"type":"speed","delay":5.0}"#).unwrap();
        assert!(matches!(cmd, ClientCommand::Speed { delay } if delay.as_secs() == StepDelay::MAX));

        let cmd: ClientCommand =
            serde_json::from_str(r#"{"type":"open","screen":"doubly_linked_list"}"#).unwrap();
        assert!(matches!(
            cmd,
            ClientCommand::Open {
                screen: ScreenKind::DoublyLinkedList
            }
        ));
        assert!(serde_json::from_str::<ClientCommand>(r#"{"type":"rewind"}"#).is_err());

        let cmd: ClientCommand = serde_json::from_str(
            r#"{"type":"start","operation":"binary-search","values":"0.5,1.5","params":{"target":1.5}}"#,
        )
        .unwrap();
        assert_eq!(cmd.start_request().unwrap().params.target, Some(1.5));
    }

    #[test]
    fn finished_event_shape() {
        let report = RunReport {
            run: RunId(3),
            result: Ok(Outcome::Found {
                target: 7.0,
                index: 2,
            }),
        };
        let json = serde_json::to_value(ViewEvent::finished(&report)).unwrap();
        assert_eq!(json["type"], "finished");
        assert_eq!(json["run"], 3);
        assert_eq!(json["message"], "Target 7 found at index 2");
        assert_eq!(json["outcome"]["kind"], "found");
        assert!(json.get("error").is_none());

        let report = RunReport {
            run: RunId(4),
            result: Err(RunError::Structure(StructureError::PositionOutOfRange {
                position: 5,
                len: 2,
            })),
        };
        let json = serde_json::to_value(ViewEvent::finished(&report)).unwrap();
        assert!(json.get("outcome").is_none());
        assert_eq!(json["error"], json["message"]);
    }

    #[test]
    fn menu_lists_every_operation_once_per_screen() {
        let menu = menu();
        assert_eq!(menu.len(), ScreenKind::ALL.len());
        let sorting = &menu[0];
        assert_eq!(sorting.operations.len(), 9);
        assert!(!sorting.persistent);

        let doubly = menu
            .iter()
            .find(|m| m.screen == ScreenKind::DoublyLinkedList)
            .unwrap();
        assert!(doubly.persistent);
        let insert = doubly
            .operations
            .iter()
            .find(|e| e.operation == OperationKind::ListInsertPosition)
            .unwrap();
        assert_eq!(insert.parameters, ["position", "value"]);
    }

    #[test]
    fn step_event_carries_the_snapshot() {
        let event = ViewEvent::Step {
            step: Step::bars(&[2.0, 1.0]),
        };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["type"], "step");
        assert_eq!(json["step"]["layout"], "bars");
        assert_eq!(json["step"]["values"], serde_json::json!([2, 1]));
    }
}
