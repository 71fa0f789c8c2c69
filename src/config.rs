//! Loading game configuration (server settings + optional level bank) from TOML.
//!
//! The file is located through `QUEST_CONFIG_PATH`. Without it the built-in catalog and
//! default server settings are used. A file that is given but cannot be read, parsed or
//! validated stops startup.

use std::net::SocketAddr;

use serde::Deserialize;
use tracing::{info, instrument};

use crate::catalog::LevelCatalog;
use crate::domain::LevelDefinition;
use crate::error::{CatalogError, ConfigError};

pub const CONFIG_PATH_ENV: &str = "QUEST_CONFIG_PATH";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GameConfig {
  #[serde(default)]
  pub server: ServerCfg,
  /// When non-empty, replaces the built-in catalog entirely.
  #[serde(default)]
  pub levels: Vec<LevelDefinition>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServerCfg {
  /// Front-end assets served for every non-API path.
  #[serde(default = "default_static_dir")]
  pub static_dir: String,
}

fn default_static_dir() -> String {
  "./static".into()
}

impl Default for ServerCfg {
  fn default() -> Self {
    Self { static_dir: default_static_dir() }
  }
}

impl GameConfig {
  /// Build the level catalog: configured levels if any, otherwise the built-in story.
  pub fn build_catalog(&self) -> Result<LevelCatalog, CatalogError> {
    if self.levels.is_empty() {
      info!(target: "skystack", "Using built-in level catalog");
      LevelCatalog::builtin()
    } else {
      info!(target: "skystack", levels = self.levels.len(), "Using configured level catalog");
      LevelCatalog::new(self.levels.clone())
    }
  }
}

/// Parse a TOML document. `origin` only labels errors.
pub fn parse_config(s: &str, origin: &str) -> Result<GameConfig, ConfigError> {
  toml::from_str::<GameConfig>(s).map_err(|source| ConfigError::Parse { path: origin.to_string(), source })
}

#[instrument(level = "info")]
pub fn load_config(path: &str) -> Result<GameConfig, ConfigError> {
  let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_string(), source })?;
  let cfg = parse_config(&s, path)?;
  info!(target: "skystack", %path, levels = cfg.levels.len(), "Loaded game config (TOML)");
  Ok(cfg)
}

/// Load from `QUEST_CONFIG_PATH`, or defaults when it is unset.
pub fn load_config_from_env() -> Result<GameConfig, ConfigError> {
  match std::env::var(CONFIG_PATH_ENV) {
    Ok(path) if !path.trim().is_empty() => load_config(&path),
    _ => {
      info!(target: "skystack", "{CONFIG_PATH_ENV} not set; using defaults");
      Ok(GameConfig::default())
    }
  }
}

/// Listen address from `PORT` (default 3000) on all interfaces.
pub fn listen_addr_from_env() -> SocketAddr {
  let port = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .unwrap_or(DEFAULT_PORT);
  SocketAddr::from(([0, 0, 0, 0], port))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{ChallengeSpec, ChallengeType};

  const BANK: &str = r#"
[server]
static_dir = "./public"

[[levels]]
id = "intro"
title = "Warm-up"
difficulty = "beginner"
challenge_type = "multi-part-form"
xp_reward = 50
badge = "Starter"

[levels.challenge]
kind = "policy_form"
instructions = "Mention the region."

[[levels.challenge.requirements]]
description = "Region"
token = "eu-west-1"

[[levels]]
id = "next"
title = "Ordering"
difficulty = "intermediate"
challenge_type = "ordered-arrangement"
xp_reward = 80
prerequisites = ["intro"]

[levels.challenge]
kind = "arrangement"
solution = ["a", "b"]

[[levels.challenge.blocks]]
id = "b"
label = "Second"

[[levels.challenge.blocks]]
id = "a"
label = "First"
"#;

  #[test]
  fn parses_levels_and_server_settings() {
    let cfg = parse_config(BANK, "inline").unwrap();
    assert_eq!(cfg.server.static_dir, "./public");
    assert_eq!(cfg.levels.len(), 2);
    assert_eq!(cfg.levels[0].challenge_type, ChallengeType::MultiPartForm);
    assert_eq!(cfg.levels[0].badge.as_deref(), Some("Starter"));
    assert!(matches!(cfg.levels[1].challenge, ChallengeSpec::Arrangement { .. }));
    assert_eq!(cfg.levels[1].prerequisites, vec!["intro".to_string()]);

    let catalog = cfg.build_catalog().unwrap();
    assert_eq!(catalog.len(), 2);
  }

  #[test]
  fn empty_document_means_defaults() {
    let cfg = parse_config("", "inline").unwrap();
    assert_eq!(cfg.server.static_dir, "./static");
    assert!(cfg.levels.is_empty());
    assert!(cfg.build_catalog().unwrap().len() > 1);
  }

  #[test]
  fn configured_catalog_is_validated() {
    let broken = BANK.replace("prerequisites = [\"intro\"]", "prerequisites = [\"ghost\"]");
    let cfg = parse_config(&broken, "inline").unwrap();
    assert!(matches!(cfg.build_catalog().unwrap_err(), CatalogError::UnknownPrerequisite { .. }));
  }

  #[test]
  fn parse_errors_name_the_origin() {
    let err = parse_config("levels = 3", "bank.toml").unwrap_err();
    assert!(err.to_string().contains("bank.toml"));
  }

  #[test]
  fn missing_file_is_a_read_error() {
    let err = load_config("/definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
  }
}
