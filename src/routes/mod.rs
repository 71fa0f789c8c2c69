//! Router assembly. Game API under `/api/v1`, one game per WebSocket at `/ws`,
//! and the front-end bundle for every other path.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Session and catalog endpoints, relative to `/api/v1`.
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(http::http_health))
        .route("/levels", get(http::http_list_catalog))
        .route("/sessions", post(http::http_create_session))
        .route(
            "/sessions/:id",
            get(http::http_get_session).delete(http::http_delete_session),
        )
        .route("/sessions/:id/command", post(http::http_post_command))
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let static_dir = state.static_dir.clone();
    info!(target: "skystack", %static_dir, levels = state.catalog.len(), "Building router");
    // Unknown paths get index.html so client-side routing works.
    let frontend = ServeDir::new(&static_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(format!("{static_dir}/index.html")));

    Router::new()
        .route("/ws", get(ws::ws_upgrade))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .fallback_service(frontend)
}
