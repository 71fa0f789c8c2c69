//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs the session id and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use tracing::{info, instrument};

use crate::logic::handle_command;
use crate::protocol::*;
use crate::state::AppState;

/// HTTP status for a reply; errors map by kind.
pub fn status_for(msg: &ServerMessage) -> StatusCode {
  match msg {
    ServerMessage::Error { kind, .. } => match kind.as_str() {
      "unknown_session" | "unknown_level_id" => StatusCode::NOT_FOUND,
      "level_locked" | "invalid_transition" | "skip_unavailable" => StatusCode::CONFLICT,
      "incomplete_submission" | "invalid_submission_shape" => StatusCode::UNPROCESSABLE_ENTITY,
      _ => StatusCode::BAD_REQUEST,
    },
    _ => StatusCode::OK,
  }
}

fn unknown_session(id: &str) -> (StatusCode, Json<ServerMessage>) {
  let msg = ServerMessage::Error { kind: "unknown_session".into(), message: format!("Unknown session: {id}") };
  (status_for(&msg), Json(msg))
}

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, levels: state.catalog.len(), sessions: state.session_count().await })
}

/// Catalog as a brand-new player sees it.
#[instrument(level = "info", skip(state))]
pub async fn http_list_catalog(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let flow = state.new_flow();
  Json(levels_out(&flow))
}

#[instrument(level = "info", skip(state))]
pub async fn http_create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let id = state.create_session().await;
  let snap = state.with_session(&id, |flow| snapshot(flow, Some(id.clone()))).await;
  match snap {
    Some(snapshot) => (StatusCode::CREATED, Json(SessionCreatedOut { session_id: id, snapshot })).into_response(),
    None => unknown_session(&id).into_response(),
  }
}

#[instrument(level = "info", skip(state), fields(session = %id))]
pub async fn http_get_session(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> impl IntoResponse {
  match state.with_session(&id, |flow| snapshot(flow, Some(id.clone()))).await {
    Some(snap) => (StatusCode::OK, Json(ServerMessage::Snapshot(snap))),
    None => unknown_session(&id),
  }
}

#[instrument(level = "info", skip(state), fields(session = %id))]
pub async fn http_delete_session(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> impl IntoResponse {
  if state.remove_session(&id).await {
    StatusCode::NO_CONTENT.into_response()
  } else {
    unknown_session(&id).into_response()
  }
}

#[instrument(level = "info", skip(state, cmd), fields(session = %id))]
pub async fn http_post_command(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(cmd): Json<ClientCommand>,
) -> impl IntoResponse {
  match state.with_session(&id, |flow| handle_command(flow, cmd)).await {
    Some(reply) => {
      let status = status_for(&reply);
      info!(target: "quest", session = %id, %status, "HTTP command handled");
      (status, Json(reply))
    }
    None => unknown_session(&id),
  }
}
