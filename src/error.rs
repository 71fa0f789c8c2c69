//! Error types for gameplay (recoverable) and startup (fatal).

use thiserror::Error;

/// Recoverable errors returned to the player. None of them touch `PlayerProgress`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GameError {
  #[error("unknown level id '{0}'")]
  UnknownLevelId(String),
  #[error("level '{0}' is locked: complete its prerequisites first")]
  LevelLocked(String),
  #[error("incomplete submission: {0}")]
  IncompleteSubmission(String),
  #[error("invalid submission: {0}")]
  InvalidSubmissionShape(String),
  #[error("'{signal}' is not accepted while {phase}")]
  InvalidTransition { phase: &'static str, signal: &'static str },
  #[error("skip unavailable: {0}")]
  SkipUnavailable(String),
}

impl GameError {
  /// Stable snake_case name used on the wire.
  pub fn kind(&self) -> &'static str {
    match self {
      GameError::UnknownLevelId(_) => "unknown_level_id",
      GameError::LevelLocked(_) => "level_locked",
      GameError::IncompleteSubmission(_) => "incomplete_submission",
      GameError::InvalidSubmissionShape(_) => "invalid_submission_shape",
      GameError::InvalidTransition { .. } => "invalid_transition",
      GameError::SkipUnavailable(_) => "skip_unavailable",
    }
  }
}

/// Catalog integrity violations. Raised only while building the catalog; fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CatalogError {
  #[error("catalog has no levels")]
  Empty,
  #[error("duplicate level id '{0}'")]
  DuplicateId(String),
  #[error("level '{level}' requires unknown level '{prerequisite}'")]
  UnknownPrerequisite { level: String, prerequisite: String },
  #[error("level '{0}' lists itself as a prerequisite")]
  SelfPrerequisite(String),
  #[error("prerequisite cycle: {}", .0.join(" -> "))]
  PrerequisiteCycle(Vec<String>),
  #[error("level '{level}' declares challenge type '{declared}' but its challenge is '{actual}'")]
  ChallengeTypeMismatch { level: String, declared: &'static str, actual: &'static str },
  #[error("level '{level}' has a malformed challenge: {reason}")]
  MalformedChallenge { level: String, reason: String },
}

/// Startup configuration failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
  #[error("failed to read config '{path}': {source}")]
  Read { path: String, #[source] source: std::io::Error },
  #[error("failed to parse config '{path}': {source}")]
  Parse { path: String, #[source] source: toml::de::Error },
  #[error(transparent)]
  Catalog(#[from] CatalogError),
}
