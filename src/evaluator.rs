//! Challenge evaluation.
//!
//! Each `ChallengeSpec` variant has one rule:
//!   - choice set: every simultaneous selection must be right (no partial credit)
//!   - quiz: questions one at a time, pass at `pass_threshold` correct answers
//!   - arrangement: the full block sequence must equal the reference ordering
//!   - decoding: case-insensitive answers per puzzle, hint and skip after two misses
//!   - policy form: every required token must be present
//!
//! Stateless rules are plain functions. Quiz and decoding keep a run inside
//! `ChallengeAttempt`, which is what the game flow drives.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{Block, ChallengeSpec, ChoiceQuestion, Puzzle, Requirement};
use crate::error::GameError;

/// Wrong attempts on one puzzle before its hint shows and skipping is allowed.
pub const HINT_AFTER_WRONG_ATTEMPTS: u32 = 2;

/// What the player hands in. The variant must fit the challenge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Submission {
  /// Choice set: one selected option id per question, in question order.
  Choices { selections: Vec<Option<String>> },
  /// Quiz: the option for the current question. `question` pins the index if given.
  Choice {
    option: String,
    #[serde(default)] question: Option<usize>,
  },
  /// Arrangement: block ids in placement order.
  Sequence { blocks: Vec<String> },
  /// Decoding answer or policy document.
  Text { text: String },
}

impl Submission {
  fn kind_name(&self) -> &'static str {
    match self {
      Submission::Choices { .. } => "choices",
      Submission::Choice { .. } => "choice",
      Submission::Sequence { .. } => "sequence",
      Submission::Text { .. } => "text",
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
  InProgress,
  Passed,
  Failed,
}

/// Result of one evaluation (or a read-only snapshot of an attempt).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
  pub passed: bool,
  pub status: AttemptStatus,
  /// Correctness per scored item so far, in order.
  pub per_question: Vec<bool>,
  /// Explanatory text keyed by item index.
  pub feedback: BTreeMap<usize, String>,
  pub correct_count: usize,
  /// Item awaiting input (sequential challenges only).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub current: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub hint: Option<String>,
  #[serde(default)]
  pub can_skip: bool,
  /// Unmet requirement descriptions (policy form only).
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub unmet: Vec<String>,
}

impl Evaluation {
  fn finished(per_question: Vec<bool>, feedback: BTreeMap<usize, String>, passed: bool) -> Self {
    let correct_count = per_question.iter().filter(|c| **c).count();
    Self {
      passed,
      status: if passed { AttemptStatus::Passed } else { AttemptStatus::Failed },
      per_question,
      feedback,
      correct_count,
      current: None,
      hint: None,
      can_skip: false,
      unmet: Vec::new(),
    }
  }
}

/// Case-insensitive comparison, ignoring surrounding whitespace.
pub fn answer_matches(expected: &str, given: &str) -> bool {
  crate::util::normalize_answer(expected) == crate::util::normalize_answer(given)
}

/// Choice set: passes iff every question's selection is its correct option.
pub fn evaluate_choice_set(
  questions: &[ChoiceQuestion],
  selections: &[Option<String>],
) -> Result<Evaluation, GameError> {
  if selections.len() > questions.len() {
    return Err(GameError::InvalidSubmissionShape(format!(
      "{} selections for {} questions",
      selections.len(),
      questions.len()
    )));
  }
  let mut per_question = Vec::with_capacity(questions.len());
  let mut feedback = BTreeMap::new();
  for (i, q) in questions.iter().enumerate() {
    let selected = match selections.get(i).and_then(|s| s.as_deref()) {
      Some(s) if !s.trim().is_empty() => s,
      _ => return Err(GameError::IncompleteSubmission(format!("question {i} has no answer"))),
    };
    if q.option(selected).is_none() {
      return Err(GameError::InvalidSubmissionShape(format!(
        "question {i} has no option '{selected}'"
      )));
    }
    per_question.push(selected == q.correct);
    feedback.insert(i, q.feedback_for(selected));
  }
  let passed = per_question.iter().all(|c| *c);
  Ok(Evaluation::finished(per_question, feedback, passed))
}

/// Arrangement: passes iff `submitted` equals `solution` position by position.
/// Sequences of the wrong length, with repeated or unknown blocks, are not scored.
pub fn evaluate_arrangement(
  blocks: &[Block],
  solution: &[String],
  submitted: &[String],
) -> Result<Evaluation, GameError> {
  if submitted.is_empty() {
    return Err(GameError::IncompleteSubmission("no blocks placed".into()));
  }
  if submitted.len() != solution.len() {
    return Err(GameError::InvalidSubmissionShape(format!(
      "{} blocks placed, {} expected",
      submitted.len(),
      solution.len()
    )));
  }
  let known: HashSet<&str> = blocks.iter().map(|b| b.id.as_str()).collect();
  let mut used = HashSet::new();
  for id in submitted {
    if !known.contains(id.as_str()) {
      return Err(GameError::InvalidSubmissionShape(format!("unknown block '{id}'")));
    }
    if !used.insert(id.as_str()) {
      return Err(GameError::InvalidSubmissionShape(format!("block '{id}' used twice")));
    }
  }

  let per_question: Vec<bool> = submitted.iter().zip(solution).map(|(a, b)| a == b).collect();
  let feedback = per_question
    .iter()
    .enumerate()
    .filter(|(_, ok)| !**ok)
    .map(|(i, _)| (i, format!("Block at position {} is out of order", i + 1)))
    .collect();
  let passed = per_question.iter().all(|c| *c);
  Ok(Evaluation::finished(per_question, feedback, passed))
}

/// Policy form: passes iff every requirement's token occurs in `text`.
pub fn evaluate_policy(requirements: &[Requirement], text: &str) -> Result<Evaluation, GameError> {
  if text.trim().is_empty() {
    return Err(GameError::IncompleteSubmission("empty document".into()));
  }
  let per_question: Vec<bool> = requirements.iter().map(|r| text.contains(&r.token)).collect();
  let unmet: Vec<String> = requirements
    .iter()
    .zip(&per_question)
    .filter(|(_, ok)| !**ok)
    .map(|(r, _)| r.description.clone())
    .collect();
  let feedback = requirements
    .iter()
    .zip(&per_question)
    .enumerate()
    .filter(|(_, (_, ok))| !**ok)
    .map(|(i, (r, _))| (i, format!("Missing: {}", r.description)))
    .collect();
  let passed = unmet.is_empty();
  let mut eval = Evaluation::finished(per_question, feedback, passed);
  eval.unmet = unmet;
  Ok(eval)
}

#[derive(Clone, Debug, Default)]
struct QuizRun {
  answers: Vec<bool>,
  feedback: BTreeMap<usize, String>,
  finished: bool,
}

impl QuizRun {
  fn correct(&self) -> usize {
    self.answers.iter().filter(|c| **c).count()
  }
}

#[derive(Clone, Debug)]
struct DecodingRun {
  current: usize,
  wrong_attempts: u32,
  solved: Vec<bool>,
  skipped: bool,
  finished: bool,
  feedback: BTreeMap<usize, String>,
}

impl DecodingRun {
  fn new(len: usize) -> Self {
    Self {
      current: 0,
      wrong_attempts: 0,
      solved: vec![false; len],
      skipped: false,
      finished: false,
      feedback: BTreeMap::new(),
    }
  }

  fn can_skip(&self) -> bool {
    !self.finished
      && self.wrong_attempts >= HINT_AFTER_WRONG_ATTEMPTS
      && self.current + 1 < self.solved.len()
  }
}

#[derive(Clone, Debug)]
enum Run {
  Stateless { last: Option<Evaluation> },
  Quiz(QuizRun),
  Decoding(DecodingRun),
}

/// One player's attempt at one challenge.
#[derive(Clone, Debug)]
pub struct ChallengeAttempt {
  spec: ChallengeSpec,
  run: Run,
  passed: Option<Evaluation>,
}

impl ChallengeAttempt {
  pub fn new(spec: ChallengeSpec) -> Self {
    let run = match &spec {
      ChallengeSpec::Quiz { .. } => Run::Quiz(QuizRun::default()),
      ChallengeSpec::Decoding { puzzles } => Run::Decoding(DecodingRun::new(puzzles.len())),
      _ => Run::Stateless { last: None },
    };
    Self { spec, run, passed: None }
  }

  pub fn spec(&self) -> &ChallengeSpec {
    &self.spec
  }

  pub fn is_passed(&self) -> bool {
    self.passed.is_some()
  }

  /// Score a submission. After a pass, returns the passing result unchanged.
  #[instrument(level = "debug", skip(self, submission), fields(kind = self.spec.kind_name(), submission = submission.kind_name()))]
  pub fn submit(&mut self, submission: &Submission) -> Result<Evaluation, GameError> {
    if let Some(pass) = &self.passed {
      debug!(target: "quest", "Submission after pass ignored");
      return Ok(pass.clone());
    }

    let eval = match (&self.spec, &mut self.run, submission) {
      (ChallengeSpec::ChoiceSet { questions }, Run::Stateless { last }, Submission::Choices { selections }) => {
        let eval = evaluate_choice_set(questions, selections)?;
        *last = Some(eval.clone());
        eval
      }
      (ChallengeSpec::Arrangement { blocks, solution, .. }, Run::Stateless { last }, Submission::Sequence { blocks: placed }) => {
        let eval = evaluate_arrangement(blocks, solution, placed)?;
        *last = Some(eval.clone());
        eval
      }
      (ChallengeSpec::PolicyForm { requirements, .. }, Run::Stateless { last }, Submission::Text { text }) => {
        let eval = evaluate_policy(requirements, text)?;
        *last = Some(eval.clone());
        eval
      }
      (ChallengeSpec::Quiz { questions, pass_threshold }, Run::Quiz(run), Submission::Choice { option, question }) => {
        submit_quiz(run, questions, *pass_threshold, option, *question)?
      }
      (ChallengeSpec::Decoding { puzzles }, Run::Decoding(run), Submission::Text { text }) => {
        submit_decoding(run, puzzles, text)?
      }
      (spec, _, other) => {
        return Err(GameError::InvalidSubmissionShape(format!(
          "a '{}' submission does not fit a '{}' challenge",
          other.kind_name(),
          spec.kind_name()
        )));
      }
    };

    if eval.passed {
      self.passed = Some(eval.clone());
    }
    Ok(eval)
  }

  /// Move past the current decoding puzzle without solving it.
  pub fn skip(&mut self) -> Result<Evaluation, GameError> {
    let (ChallengeSpec::Decoding { puzzles }, Run::Decoding(run)) = (&self.spec, &mut self.run) else {
      return Err(GameError::SkipUnavailable("only decoding challenges can skip".into()));
    };
    if run.finished {
      return Err(GameError::SkipUnavailable("the run is over".into()));
    }
    if run.current + 1 >= puzzles.len() {
      return Err(GameError::SkipUnavailable("the last puzzle cannot be skipped".into()));
    }
    if run.wrong_attempts < HINT_AFTER_WRONG_ATTEMPTS {
      return Err(GameError::SkipUnavailable(format!(
        "skipping unlocks after {HINT_AFTER_WRONG_ATTEMPTS} wrong attempts"
      )));
    }
    run.skipped = true;
    run.current += 1;
    run.wrong_attempts = 0;
    Ok(decoding_snapshot(run, puzzles))
  }

  /// Current state without submitting anything.
  pub fn snapshot(&self) -> Evaluation {
    if let Some(pass) = &self.passed {
      return pass.clone();
    }
    match (&self.spec, &self.run) {
      (ChallengeSpec::Quiz { questions, pass_threshold }, Run::Quiz(run)) => quiz_snapshot(run, questions.len(), *pass_threshold),
      (ChallengeSpec::Decoding { puzzles }, Run::Decoding(run)) => decoding_snapshot(run, puzzles),
      (_, Run::Stateless { last: Some(last) }) => last.clone(),
      _ => Evaluation {
        passed: false,
        status: AttemptStatus::InProgress,
        per_question: Vec::new(),
        feedback: BTreeMap::new(),
        correct_count: 0,
        current: None,
        hint: None,
        can_skip: false,
        unmet: Vec::new(),
      },
    }
  }
}

fn quiz_snapshot(run: &QuizRun, total: usize, threshold: usize) -> Evaluation {
  let correct = run.correct();
  let (status, passed) = if run.finished {
    if correct >= threshold { (AttemptStatus::Passed, true) } else { (AttemptStatus::Failed, false) }
  } else {
    (AttemptStatus::InProgress, false)
  };
  Evaluation {
    passed,
    status,
    per_question: run.answers.clone(),
    feedback: run.feedback.clone(),
    correct_count: correct,
    current: (!run.finished && run.answers.len() < total).then_some(run.answers.len()),
    hint: None,
    can_skip: false,
    unmet: Vec::new(),
  }
}

fn submit_quiz(
  run: &mut QuizRun,
  questions: &[ChoiceQuestion],
  threshold: usize,
  option: &str,
  question: Option<usize>,
) -> Result<Evaluation, GameError> {
  // A failed run restarts at question 0, but only once the answer is accepted.
  let restart = run.finished;
  let mut next = if restart { QuizRun::default() } else { run.clone() };
  let index = next.answers.len();
  match question {
    Some(q) if q < index => {
      return Err(GameError::InvalidSubmissionShape(format!("question {q} is already answered")));
    }
    Some(q) if q > index => {
      return Err(GameError::InvalidSubmissionShape(format!("question {q} is not reached yet")));
    }
    _ => {}
  }
  if option.trim().is_empty() {
    return Err(GameError::IncompleteSubmission(format!("question {index} has no answer")));
  }
  let q = &questions[index];
  if q.option(option).is_none() {
    return Err(GameError::InvalidSubmissionShape(format!(
      "question {index} has no option '{option}'"
    )));
  }

  if restart {
    debug!(target: "quest", "Quiz run failed earlier; starting a fresh run");
  }
  next.answers.push(option == q.correct);
  next.feedback.insert(index, q.feedback_for(option));
  if next.answers.len() == questions.len() {
    next.finished = true;
  }
  *run = next;
  Ok(quiz_snapshot(run, questions.len(), threshold))
}

fn decoding_snapshot(run: &DecodingRun, puzzles: &[Puzzle]) -> Evaluation {
  let correct_count = run.solved.iter().filter(|s| **s).count();
  let passed = run.finished && !run.skipped && correct_count == puzzles.len();
  let status = match (run.finished, passed) {
    (false, _) => AttemptStatus::InProgress,
    (true, true) => AttemptStatus::Passed,
    (true, false) => AttemptStatus::Failed,
  };
  let hint = (!run.finished && run.wrong_attempts >= HINT_AFTER_WRONG_ATTEMPTS)
    .then(|| puzzles[run.current].hint.clone());
  Evaluation {
    passed,
    status,
    per_question: run.solved.clone(),
    feedback: run.feedback.clone(),
    correct_count,
    current: (!run.finished).then_some(run.current),
    hint,
    can_skip: run.can_skip(),
    unmet: Vec::new(),
  }
}

fn submit_decoding(run: &mut DecodingRun, puzzles: &[Puzzle], text: &str) -> Result<Evaluation, GameError> {
  if text.trim().is_empty() {
    return Err(GameError::IncompleteSubmission("empty answer".into()));
  }
  if run.finished {
    debug!(target: "quest", "Decoding run ended without a pass; starting a fresh run");
    *run = DecodingRun::new(puzzles.len());
  }

  let index = run.current;
  let puzzle = &puzzles[index];
  if answer_matches(&puzzle.answer, text) {
    run.solved[index] = true;
    run.wrong_attempts = 0;
    run.feedback.insert(index, format!("Decoded: {}", puzzle.answer));
    if index + 1 == puzzles.len() {
      run.finished = true;
    } else {
      run.current += 1;
    }
  } else {
    run.wrong_attempts += 1;
    run.feedback.insert(index, format!("'{}' is not the answer", text.trim()));
  }
  Ok(decoding_snapshot(run, puzzles))
}
