//! SkyStack Quest · game backend
//!
//! - Axum HTTP + WebSocket API over the progression engine
//! - In-memory sessions (nothing is persisted)
//! - Static SPA fallback (./static/index.html by default)
//!
//! Important env variables:
//!   PORT               : u16 (default 3000)
//!   QUEST_CONFIG_PATH  : path to TOML config (server settings + optional level bank)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use skystack_quest::config::{listen_addr_from_env, load_config_from_env};
use skystack_quest::routes::build_router;
use skystack_quest::state::AppState;
use skystack_quest::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Config and catalog problems are fatal: refuse to start.
  let cfg = load_config_from_env().inspect_err(|e| {
    error!(target: "skystack", error = %e, "Invalid configuration");
  })?;
  let catalog = cfg.build_catalog().inspect_err(|e| {
    error!(target: "skystack", error = %e, "Level catalog failed integrity checks");
  })?;

  let state = Arc::new(AppState::new(catalog, cfg.server.static_dir.clone()));
  let app = build_router(state.clone());

  let addr = listen_addr_from_env();
  let listener = TcpListener::bind(addr).await?;
  info!(target: "skystack", %addr, levels = state.catalog.len(), static_dir = %state.static_dir, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "skystack", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    error!(target: "skystack", error = %e, "Failed to listen for shutdown signal");
  }
}
