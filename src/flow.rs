//! Game flow state machine.
//!
//! Intro -> LevelSelect -> Playing(level: Briefing -> Active -> Debrief) -> LevelSelect ...
//!
//! One `GameFlow` is one player's session. It owns the `PlayerProgress` and the attempt
//! in flight; every signal completes synchronously before the next one.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::catalog::LevelCatalog;
use crate::domain::{ChallengeSpec, LevelDefinition, PlayerProgress};
use crate::error::GameError;
use crate::evaluator::{ChallengeAttempt, Evaluation, Submission};
use crate::progress::apply_completion;
use crate::unlock::{is_completed, is_unlocked};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
  Briefing,
  Active,
  Debrief,
}

/// Public view of where the session is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Phase {
  Intro,
  LevelSelect,
  Playing {
    #[serde(rename = "levelId")]
    level_id: String,
    stage: Stage,
  },
}

/// A level as listed on the selection screen.
#[derive(Clone, Debug, Serialize)]
pub struct LevelStatus<'a> {
  pub level: &'a LevelDefinition,
  pub unlocked: bool,
  pub completed: bool,
}

#[derive(Debug)]
struct Playing {
  level_id: String,
  stage: Stage,
  attempt: ChallengeAttempt,
}

#[derive(Debug)]
enum State {
  Intro,
  LevelSelect,
  Playing(Playing),
}

#[derive(Debug)]
pub struct GameFlow {
  catalog: Arc<LevelCatalog>,
  progress: PlayerProgress,
  state: State,
}

impl GameFlow {
  pub fn new(catalog: Arc<LevelCatalog>) -> Self {
    Self { catalog, progress: PlayerProgress::new(), state: State::Intro }
  }

  pub fn progress(&self) -> &PlayerProgress {
    &self.progress
  }

  pub fn phase(&self) -> Phase {
    match &self.state {
      State::Intro => Phase::Intro,
      State::LevelSelect => Phase::LevelSelect,
      State::Playing(p) => Phase::Playing { level_id: p.level_id.clone(), stage: p.stage },
    }
  }

  /// Level being played, if any.
  pub fn current_level(&self) -> Option<&LevelDefinition> {
    match &self.state {
      State::Playing(p) => self.catalog.get(&p.level_id),
      _ => None,
    }
  }

  pub fn attempt(&self) -> Option<&ChallengeAttempt> {
    match &self.state {
      State::Playing(p) => Some(&p.attempt),
      _ => None,
    }
  }

  fn phase_name(&self) -> &'static str {
    match &self.state {
      State::Intro => "intro",
      State::LevelSelect => "level_select",
      State::Playing(p) => match p.stage {
        Stage::Briefing => "briefing",
        Stage::Active => "active",
        Stage::Debrief => "debrief",
      },
    }
  }

  fn reject(&self, signal: &'static str) -> GameError {
    let phase = self.phase_name();
    warn!(target: "quest", phase, signal, "Signal rejected");
    GameError::InvalidTransition { phase, signal }
  }

  /// Intro -> LevelSelect.
  pub fn start(&mut self) -> Result<(), GameError> {
    match self.state {
      State::Intro => {
        self.state = State::LevelSelect;
        info!(target: "quest", "Session started");
        Ok(())
      }
      _ => Err(self.reject("start")),
    }
  }

  /// Every level in catalog order with its lock/completion flags.
  pub fn list_levels(&self) -> Vec<LevelStatus<'_>> {
    let done = &self.progress.completed_levels;
    self
      .catalog
      .levels()
      .iter()
      .map(|level| LevelStatus {
        level,
        unlocked: is_unlocked(level, done),
        completed: is_completed(&level.id, done),
      })
      .collect()
  }

  /// LevelSelect -> Playing.Briefing. A locked level leaves the state unchanged.
  #[instrument(level = "info", skip(self))]
  pub fn select_level(&mut self, level_id: &str) -> Result<&ChallengeSpec, GameError> {
    if !matches!(self.state, State::LevelSelect) {
      return Err(self.reject("select_level"));
    }
    let level = self
      .catalog
      .get(level_id)
      .ok_or_else(|| GameError::UnknownLevelId(level_id.to_string()))?;
    if !is_unlocked(level, &self.progress.completed_levels) {
      info!(target: "quest", level = %level_id, "Locked level selected; ignoring");
      return Err(GameError::LevelLocked(level_id.to_string()));
    }

    let replay = is_completed(level_id, &self.progress.completed_levels);
    info!(target: "quest", level = %level_id, replay, kind = level.challenge.kind_name(), "Level selected");
    self.state = State::Playing(Playing {
      level_id: level_id.to_string(),
      stage: Stage::Briefing,
      attempt: ChallengeAttempt::new(level.challenge.clone()),
    });
    Ok(&level.challenge)
  }

  /// Playing.Briefing -> Playing.Active.
  pub fn begin_challenge(&mut self) -> Result<(), GameError> {
    match &mut self.state {
      State::Playing(p) if p.stage == Stage::Briefing => {
        p.stage = Stage::Active;
        info!(target: "quest", level = %p.level_id, "Challenge begun");
        Ok(())
      }
      _ => Err(self.reject("begin_challenge")),
    }
  }

  /// Score a submission. A pass moves Active -> Debrief; a fail stays Active.
  /// In Debrief the passing result is returned again and nothing changes.
  #[instrument(level = "info", skip(self, submission))]
  pub fn submit_answer(&mut self, submission: &Submission) -> Result<Evaluation, GameError> {
    let p = match &mut self.state {
      State::Playing(p) if p.stage == Stage::Active => p,
      State::Playing(p) if p.stage == Stage::Debrief => return Ok(p.attempt.snapshot()),
      _ => return Err(self.reject("submit_answer")),
    };
    let eval = p.attempt.submit(submission)?;
    info!(
      target: "quest",
      level = %p.level_id,
      passed = eval.passed,
      status = ?eval.status,
      correct = eval.correct_count,
      "Submission evaluated"
    );
    if eval.passed {
      p.stage = Stage::Debrief;
    }
    Ok(eval)
  }

  /// Skip the current decoding puzzle (Active only).
  pub fn skip_puzzle(&mut self) -> Result<Evaluation, GameError> {
    match &mut self.state {
      State::Playing(p) if p.stage == Stage::Active => {
        let eval = p.attempt.skip()?;
        info!(target: "quest", level = %p.level_id, current = ?eval.current, "Puzzle skipped");
        Ok(eval)
      }
      _ => Err(self.reject("skip_puzzle")),
    }
  }

  /// Playing.Debrief -> LevelSelect, applying the level's reward exactly once.
  #[instrument(level = "info", skip(self))]
  pub fn complete_challenge(&mut self) -> Result<&PlayerProgress, GameError> {
    let level_id = match &self.state {
      State::Playing(p) if p.stage == Stage::Debrief && p.attempt.is_passed() => p.level_id.clone(),
      _ => return Err(self.reject("complete_challenge")),
    };
    let level = self
      .catalog
      .get(&level_id)
      .ok_or_else(|| GameError::UnknownLevelId(level_id.clone()))?;
    self.progress = apply_completion(&self.progress, level, true);
    self.state = State::LevelSelect;
    info!(
      target: "quest",
      level = %level_id,
      xp_gained = level.xp_reward,
      badge = ?level.badge,
      experience = self.progress.experience,
      player_level = self.progress.player_level(),
      "Level completed"
    );
    Ok(&self.progress)
  }

  /// Playing.Briefing | Playing.Active -> LevelSelect, discarding the attempt.
  pub fn abandon_challenge(&mut self) -> Result<(), GameError> {
    match &self.state {
      State::Playing(p) if p.stage != Stage::Debrief => {
        info!(target: "quest", level = %p.level_id, "Challenge abandoned");
        self.state = State::LevelSelect;
        Ok(())
      }
      _ => Err(self.reject("abandon_challenge")),
    }
  }
}
