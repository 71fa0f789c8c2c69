//! Level catalog: ordered, validated registry of level definitions.
//!
//! Construction fails fast on integrity problems (duplicate ids, unknown or self
//! prerequisites, prerequisite cycles, challenge content that cannot be evaluated).
//! A built catalog is immutable and shared by every session.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, instrument};

use crate::domain::{ChallengeSpec, ChoiceQuestion, Difficulty, LevelDefinition};
use crate::error::CatalogError;

#[derive(Clone, Debug)]
pub struct LevelCatalog {
  levels: Vec<LevelDefinition>,
  by_id: HashMap<String, usize>,
}

impl LevelCatalog {
  /// Validate and index `levels`, keeping their order.
  #[instrument(level = "info", skip_all, fields(count = levels.len()))]
  pub fn new(levels: Vec<LevelDefinition>) -> Result<Self, CatalogError> {
    if levels.is_empty() {
      return Err(CatalogError::Empty);
    }

    let mut by_id = HashMap::with_capacity(levels.len());
    for (i, level) in levels.iter().enumerate() {
      if by_id.insert(level.id.clone(), i).is_some() {
        return Err(CatalogError::DuplicateId(level.id.clone()));
      }
    }

    for level in &levels {
      for p in &level.prerequisites {
        if *p == level.id {
          return Err(CatalogError::SelfPrerequisite(level.id.clone()));
        }
        if !by_id.contains_key(p) {
          return Err(CatalogError::UnknownPrerequisite {
            level: level.id.clone(),
            prerequisite: p.clone(),
          });
        }
      }
      let actual = level.challenge.challenge_type();
      if actual != level.challenge_type {
        return Err(CatalogError::ChallengeTypeMismatch {
          level: level.id.clone(),
          declared: level.challenge_type.as_str(),
          actual: actual.as_str(),
        });
      }
      validate_challenge(&level.challenge).map_err(|reason| CatalogError::MalformedChallenge {
        level: level.id.clone(),
        reason,
      })?;
    }

    if let Some(cycle) = find_cycle(&levels, &by_id) {
      return Err(CatalogError::PrerequisiteCycle(cycle));
    }

    let catalog = Self { levels, by_id };
    catalog.log_inventory();
    Ok(catalog)
  }

  /// The built-in story catalog.
  pub fn builtin() -> Result<Self, CatalogError> {
    Self::new(crate::seeds::seed_levels())
  }

  pub fn levels(&self) -> &[LevelDefinition] {
    &self.levels
  }

  pub fn get(&self, id: &str) -> Option<&LevelDefinition> {
    self.by_id.get(id).map(|&i| &self.levels[i])
  }

  pub fn len(&self) -> usize {
    self.levels.len()
  }

  pub fn is_empty(&self) -> bool {
    self.levels.is_empty()
  }

  fn log_inventory(&self) {
    for diff in [Difficulty::Beginner, Difficulty::Intermediate, Difficulty::Advanced] {
      let count = self.levels.iter().filter(|l| l.difficulty == diff).count();
      debug!(target: "quest", difficulty = ?diff, count, "Catalog inventory");
    }
    let total_xp: u64 = self.levels.iter().map(|l| u64::from(l.xp_reward)).sum();
    info!(target: "quest", levels = self.levels.len(), total_xp, "Level catalog validated");
  }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
  Unvisited,
  InProgress,
  Done,
}

/// Depth-first search over the prerequisite relation. Returns the members of the first
/// cycle found, in traversal order.
fn find_cycle(levels: &[LevelDefinition], by_id: &HashMap<String, usize>) -> Option<Vec<String>> {
  let mut marks = vec![Mark::Unvisited; levels.len()];
  let mut path = Vec::new();
  for start in 0..levels.len() {
    if marks[start] == Mark::Unvisited {
      if let Some(cycle) = visit(start, levels, by_id, &mut marks, &mut path) {
        return Some(cycle);
      }
    }
  }
  None
}

fn visit(
  i: usize,
  levels: &[LevelDefinition],
  by_id: &HashMap<String, usize>,
  marks: &mut [Mark],
  path: &mut Vec<usize>,
) -> Option<Vec<String>> {
  marks[i] = Mark::InProgress;
  path.push(i);
  for p in &levels[i].prerequisites {
    let Some(&j) = by_id.get(p) else { continue };
    match marks[j] {
      Mark::InProgress => {
        let from = path.iter().position(|&k| k == j).unwrap_or(0);
        return Some(path[from..].iter().map(|&k| levels[k].id.clone()).collect());
      }
      Mark::Unvisited => {
        if let Some(cycle) = visit(j, levels, by_id, marks, path) {
          return Some(cycle);
        }
      }
      Mark::Done => {}
    }
  }
  path.pop();
  marks[i] = Mark::Done;
  None
}

fn validate_questions(questions: &[ChoiceQuestion]) -> Result<(), String> {
  if questions.is_empty() {
    return Err("no questions".into());
  }
  for (i, q) in questions.iter().enumerate() {
    if q.options.is_empty() {
      return Err(format!("question {i} has no options"));
    }
    let mut seen = HashSet::new();
    for o in &q.options {
      if !seen.insert(o.id.as_str()) {
        return Err(format!("question {i} repeats option '{}'", o.id));
      }
    }
    if q.option(&q.correct).is_none() {
      return Err(format!("question {i}: correct option '{}' is not offered", q.correct));
    }
  }
  Ok(())
}

fn validate_challenge(spec: &ChallengeSpec) -> Result<(), String> {
  match spec {
    ChallengeSpec::ChoiceSet { questions } => validate_questions(questions),
    ChallengeSpec::Quiz { questions, pass_threshold } => {
      validate_questions(questions)?;
      if *pass_threshold == 0 || *pass_threshold > questions.len() {
        return Err(format!(
          "pass threshold {pass_threshold} outside 1..={}",
          questions.len()
        ));
      }
      Ok(())
    }
    ChallengeSpec::Arrangement { blocks, solution, .. } => {
      if solution.is_empty() {
        return Err("empty solution".into());
      }
      let known: HashSet<&str> = blocks.iter().map(|b| b.id.as_str()).collect();
      if known.len() != blocks.len() {
        return Err("duplicate block ids".into());
      }
      let mut used = HashSet::new();
      for id in solution {
        if !known.contains(id.as_str()) {
          return Err(format!("solution uses unknown block '{id}'"));
        }
        if !used.insert(id.as_str()) {
          return Err(format!("solution repeats block '{id}'"));
        }
      }
      Ok(())
    }
    ChallengeSpec::Decoding { puzzles } => {
      if puzzles.is_empty() {
        return Err("no puzzles".into());
      }
      match puzzles.iter().position(|p| p.answer.trim().is_empty()) {
        Some(i) => Err(format!("puzzle {i} has an empty answer")),
        None => Ok(()),
      }
    }
    ChallengeSpec::PolicyForm { requirements, .. } => {
      if requirements.is_empty() {
        return Err("no requirements".into());
      }
      match requirements.iter().position(|r| r.token.is_empty()) {
        Some(i) => Err(format!("requirement {i} has an empty token")),
        None => Ok(()),
      }
    }
  }
}
