//! SkyStack Quest · progression and challenge-evaluation engine
//!
//! A narrative quiz game teaching cloud infrastructure. The engine validates a level
//! catalog, evaluates challenge submissions, unlocks levels from completed
//! prerequisites, accumulates xp and badges, and drives each session through
//! intro → level select → briefing → challenge → debrief.
//!
//! The `routes` module hosts sessions over HTTP and WebSocket (axum).

pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod evaluator;
pub mod flow;
pub mod logic;
pub mod progress;
pub mod protocol;
pub mod routes;
pub mod seeds;
pub mod state;
pub mod telemetry;
pub mod unlock;
pub mod util;

pub use catalog::LevelCatalog;
pub use domain::{ChallengeSpec, ChallengeType, Difficulty, LevelDefinition, PlayerProgress};
pub use error::{CatalogError, ConfigError, GameError};
pub use evaluator::{AttemptStatus, ChallengeAttempt, Evaluation, Submission};
pub use flow::{GameFlow, LevelStatus, Phase, Stage};
