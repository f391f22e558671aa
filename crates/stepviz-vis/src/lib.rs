//! stepviz Visualization
//!
//! Interactive surfaces for watching algorithms run step by step.
//!
//! # Architecture
//!
//! - **Screen**: one operation menu with its operand and execution controller
//! - **Session**: the open screen of one connected view and its event stream
//! - **WebSocket**: streams steps to the canvas page and takes commands back
//! - **Terminal**: renders steps as text and maps keys to playback controls
//!
//! # Usage
//!
//! ```ignore
//! let server = VisServer::new(VisConfig::from_env());
//! server.serve().await?;
//! ```

mod config;
mod error;
mod protocol;
mod render;
mod screen;
mod server;
mod session;
mod sink;
mod terminal;

pub use config::VisConfig;
pub use error::{Result, ScreenError};
pub use protocol::{menu, ClientCommand, MenuEntry, ScreenMenu, ViewEvent};
pub use render::TextCanvas;
pub use screen::{RunReport, Screen, StartRequest};
pub use server::VisServer;
pub use session::Session;
pub use sink::AsyncChannelSink;
pub use terminal::{KeyCommand, TerminalDriver, TerminalOptions};
