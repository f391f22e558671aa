//! Axum web server with WebSocket streaming for the canvas view.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use crate::config::VisConfig;
use crate::protocol::{menu, ClientCommand, ScreenMenu, ViewEvent};
use crate::session::Session;

/// Shared application state.
pub struct AppState {
    config: VisConfig,
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    pub fn new(config: VisConfig) -> Self {
        Self {
            state: Arc::new(AppState { config }),
        }
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index_handler))
            .route("/api/status", get(status_handler))
            .route("/api/operations", get(operations_handler))
            // One session per socket
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the configured address.
    pub async fn serve(self) -> Result<(), std::io::Error> {
        let addr = self.state.config.addr;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Visualization server running on http://localhost:{}", addr.port());
        axum::serve(listener, self.router()).await
    }
}

async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    version: &'static str,
    channel_capacity: usize,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        channel_capacity: state.config.channel_capacity,
    })
}

async fn operations_handler() -> Json<Vec<ScreenMenu>> {
    Json(menu())
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let mut session = Session::new(state.config.clone());
    debug!("view connected");

    loop {
        let events = tokio::select! {
            msg = socket.recv() => match msg {
                Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientCommand>(&text) {
                    Ok(cmd) => session.handle(cmd),
                    Err(err) => vec![ViewEvent::error(format!("bad command: {err}"))],
                },
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => continue,
            },
            Some(event) = session.recv() => session.on_event(event),
        };

        for event in events {
            if !send(&mut socket, &event).await {
                session.close();
                return;
            }
        }
    }

    session.close();
    debug!("view disconnected");
}

async fn send(socket: &mut WebSocket, event: &ViewEvent) -> bool {
    match serde_json::to_string(event) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(err) => {
            debug!(%err, "unserializable view event");
            true
        }
    }
}
