//! WebSocket upgrade + message loop. Each connection plays its own game session.
//! Every client message is parsed as a JSON command and answered with one JSON reply.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::logic::handle_command;
use crate::protocol::{snapshot, ClientCommand, ServerMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "skystack", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

fn encode(msg: &ServerMessage) -> String {
  serde_json::to_string(msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "kind": "serialization", "message": format!("Serialization error: {}", e) }).to_string()
  })
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  let mut flow = state.new_flow();
  info!(target: "skystack", "WebSocket connected; session in intro");

  // Greet with the initial snapshot so the client can render the intro.
  let hello = ServerMessage::Snapshot(snapshot(&flow, None));
  if let Err(e) = socket.send(Message::Text(encode(&hello))).await {
    error!(target: "skystack", error = %e, "WS send error");
    return;
  }

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply = match serde_json::from_str::<ClientCommand>(&txt) {
          Ok(cmd) => {
            debug!(target: "skystack", bytes = txt.len(), "WS command received");
            handle_command(&mut flow, cmd)
          }
          Err(e) => ServerMessage::Error { kind: "invalid_json".into(), message: format!("Invalid JSON: {}", e) },
        };

        if let Err(e) = socket.send(Message::Text(encode(&reply))).await {
          error!(target: "skystack", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(
    target: "skystack",
    experience = flow.progress().experience,
    completed = flow.progress().completed_levels.len(),
    "WebSocket disconnected; session discarded"
  );
}
