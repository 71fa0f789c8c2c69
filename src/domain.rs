//! Domain models: levels, challenge kinds and their content, player progress.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Experience needed per displayed player tier.
pub const XP_PER_PLAYER_LEVEL: u32 = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Beginner,
  Intermediate,
  Advanced,
}

/// Coarse challenge family declared by a level. The concrete rule lives in `ChallengeSpec`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChallengeType {
  MultipleChoice,
  OrderedArrangement,
  FreeText,
  MultiPartForm,
}

impl ChallengeType {
  pub fn as_str(self) -> &'static str {
    match self {
      ChallengeType::MultipleChoice => "multiple-choice",
      ChallengeType::OrderedArrangement => "ordered-arrangement",
      ChallengeType::FreeText => "free-text",
      ChallengeType::MultiPartForm => "multi-part-form",
    }
  }
}

/// One selectable answer of a question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
  pub id: String,
  pub label: String,
  #[serde(default)] pub explanation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceQuestion {
  pub prompt: String,
  pub options: Vec<AnswerOption>,
  /// Id of the correct option.
  pub correct: String,
  /// Shown after answering when the chosen option carries no explanation of its own.
  #[serde(default)] pub explanation: Option<String>,
}

impl ChoiceQuestion {
  pub fn option(&self, id: &str) -> Option<&AnswerOption> {
    self.options.iter().find(|o| o.id == id)
  }

  /// Feedback text for a selected option.
  pub fn feedback_for(&self, selected: &str) -> String {
    self
      .option(selected)
      .and_then(|o| o.explanation.clone())
      .or_else(|| self.explanation.clone())
      .unwrap_or_default()
  }
}

/// A block the player can place in an arrangement challenge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
  pub id: String,
  pub label: String,
}

/// One scrambled word of a decoding challenge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
  pub scrambled: String,
  pub clue: String,
  #[serde(default)] pub category: String,
  pub hint: String,
  /// Compared case-insensitively.
  pub answer: String,
}

/// One token a policy form must contain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
  pub description: String,
  pub token: String,
}

/// Challenge content bound to a level, tagged by `kind`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChallengeSpec {
  /// All questions answered together; every answer must be right.
  ChoiceSet { questions: Vec<ChoiceQuestion> },
  /// Questions answered one at a time; passes at `pass_threshold` correct answers.
  Quiz { questions: Vec<ChoiceQuestion>, pass_threshold: usize },
  /// Blocks placed in order; must match `solution` exactly.
  Arrangement {
    #[serde(default)] instructions: String,
    blocks: Vec<Block>,
    solution: Vec<String>,
  },
  /// Scrambled service names decoded one after another.
  Decoding { puzzles: Vec<Puzzle> },
  /// A structured document that must contain every required token.
  PolicyForm {
    #[serde(default)] instructions: String,
    #[serde(default)] template: String,
    requirements: Vec<Requirement>,
  },
}

impl ChallengeSpec {
  pub fn challenge_type(&self) -> ChallengeType {
    match self {
      ChallengeSpec::ChoiceSet { .. } | ChallengeSpec::Quiz { .. } => ChallengeType::MultipleChoice,
      ChallengeSpec::Arrangement { .. } => ChallengeType::OrderedArrangement,
      ChallengeSpec::Decoding { .. } => ChallengeType::FreeText,
      ChallengeSpec::PolicyForm { .. } => ChallengeType::MultiPartForm,
    }
  }

  pub fn kind_name(&self) -> &'static str {
    match self {
      ChallengeSpec::ChoiceSet { .. } => "choice_set",
      ChallengeSpec::Quiz { .. } => "quiz",
      ChallengeSpec::Arrangement { .. } => "arrangement",
      ChallengeSpec::Decoding { .. } => "decoding",
      ChallengeSpec::PolicyForm { .. } => "policy_form",
    }
  }

  /// Number of scored items (questions, positions, puzzles or requirements).
  pub fn item_count(&self) -> usize {
    match self {
      ChallengeSpec::ChoiceSet { questions } | ChallengeSpec::Quiz { questions, .. } => questions.len(),
      ChallengeSpec::Arrangement { solution, .. } => solution.len(),
      ChallengeSpec::Decoding { puzzles } => puzzles.len(),
      ChallengeSpec::PolicyForm { requirements, .. } => requirements.len(),
    }
  }
}

/// Immutable level definition, validated by `LevelCatalog`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
  pub id: String,
  pub title: String,
  #[serde(default)] pub description: String,
  pub difficulty: Difficulty,
  pub challenge_type: ChallengeType,
  #[serde(default)] pub xp_reward: u32,
  #[serde(default)] pub badge: Option<String>,
  #[serde(default)] pub prerequisites: Vec<String>,

  // Dialogue shown around the challenge; opaque to the engine.
  #[serde(default)] pub briefing: String,
  #[serde(default)] pub debrief: String,

  pub challenge: ChallengeSpec,
}

/// Cumulative state of one player for one session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgress {
  pub experience: u32,
  pub badges: BTreeSet<String>,
  pub completed_levels: BTreeSet<String>,
}

impl PlayerProgress {
  pub fn new() -> Self {
    Self::default()
  }

  /// Display tier; does not gate anything.
  pub fn player_level(&self) -> u32 {
    self.experience / XP_PER_PLAYER_LEVEL + 1
  }

  /// Experience earned inside the current tier, for progress bars.
  pub fn xp_into_level(&self) -> u32 {
    self.experience % XP_PER_PLAYER_LEVEL
  }
}
