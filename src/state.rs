//! Application state: the shared level catalog and the in-memory session registry.
//!
//! This module owns:
//!   - the validated level catalog (immutable, shared by every session)
//!   - HTTP sessions by id (each one a `GameFlow`)
//!   - the static front-end directory
//!
//! WebSocket connections own their `GameFlow` directly and never touch the registry.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::catalog::LevelCatalog;
use crate::flow::GameFlow;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<LevelCatalog>,
    /// Lives until `DELETE /api/v1/sessions/{id}` or process exit; there is no idle expiry.
    pub sessions: Arc<RwLock<HashMap<String, GameFlow>>>,
    pub static_dir: String,
}

impl AppState {
    pub fn new(catalog: LevelCatalog, static_dir: impl Into<String>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            static_dir: static_dir.into(),
        }
    }

    /// A fresh flow in `Intro` over the shared catalog.
    pub fn new_flow(&self) -> GameFlow {
        GameFlow::new(self.catalog.clone())
    }

    /// Register a new session and return its id.
    #[instrument(level = "info", skip(self))]
    pub async fn create_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let flow = self.new_flow();
        self.sessions.write().await.insert(id.clone(), flow);
        info!(target: "skystack", session = %id, "Session created");
        id
    }

    /// Run `f` against one session while holding the registry write lock, so signals for a
    /// session are applied one at a time. `None` if the session does not exist.
    pub async fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut GameFlow) -> R) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(id).map(f)
    }

    #[instrument(level = "info", skip(self))]
    pub async fn remove_session(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            info!(target: "skystack", session = %id, "Session removed");
        }
        removed
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::Phase;

    #[tokio::test]
    async fn sessions_are_independent() {
        let state = AppState::new(LevelCatalog::builtin().unwrap(), "./static");
        let a = state.create_session().await;
        let b = state.create_session().await;
        assert_ne!(a, b);
        assert_eq!(state.session_count().await, 2);

        state.with_session(&a, |f| f.start()).await.unwrap().unwrap();
        let phase_b = state.with_session(&b, |f| f.phase()).await.unwrap();
        assert_eq!(phase_b, Phase::Intro);

        assert!(state.remove_session(&a).await);
        assert!(!state.remove_session(&a).await);
        assert!(state.with_session(&a, |f| f.phase()).await.is_none());
    }
}
