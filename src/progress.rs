//! Reward application for completed levels.

use crate::domain::{LevelDefinition, PlayerProgress};

/// Returns `progress` with `level`'s reward applied when `passed`.
///
/// Replaying a completed level grants its xp again; the badge and completed sets never
/// grow duplicates.
pub fn apply_completion(progress: &PlayerProgress, level: &LevelDefinition, passed: bool) -> PlayerProgress {
  if !passed {
    return progress.clone();
  }
  let mut next = progress.clone();
  next.experience = next.experience.saturating_add(level.xp_reward);
  next.completed_levels.insert(level.id.clone());
  if let Some(badge) = &level.badge {
    next.badges.insert(badge.clone());
  }
  next
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Block, ChallengeSpec, ChallengeType, Difficulty};

  fn level(id: &str, xp: u32, badge: Option<&str>) -> LevelDefinition {
    LevelDefinition {
      id: id.into(),
      title: id.into(),
      description: String::new(),
      difficulty: Difficulty::Intermediate,
      challenge_type: ChallengeType::OrderedArrangement,
      xp_reward: xp,
      badge: badge.map(str::to_string),
      prerequisites: vec![],
      briefing: String::new(),
      debrief: String::new(),
      challenge: ChallengeSpec::Arrangement {
        instructions: String::new(),
        blocks: vec![Block { id: "x".into(), label: "X".into() }],
        solution: vec!["x".into()],
      },
    }
  }

  #[test]
  fn failure_leaves_progress_untouched() {
    let before = apply_completion(&PlayerProgress::new(), &level("a", 50, Some("B")), true);
    let after = apply_completion(&before, &level("b", 70, Some("C")), false);
    assert_eq!(before, after);
  }

  #[test]
  fn pass_adds_exact_reward_and_one_badge() {
    let p = apply_completion(&PlayerProgress::new(), &level("a", 100, Some("Novice")), true);
    assert_eq!(p.experience, 100);
    assert_eq!(p.badges.len(), 1);
    assert!(p.badges.contains("Novice"));
    assert!(p.completed_levels.contains("a"));

    let p = apply_completion(&p, &level("b", 150, None), true);
    assert_eq!(p.experience, 250);
    assert_eq!(p.badges.len(), 1);
    assert_eq!(p.completed_levels.len(), 2);
  }

  #[test]
  fn replay_grants_xp_again_without_duplicates() {
    let a = level("a", 100, Some("Novice"));
    let once = apply_completion(&PlayerProgress::new(), &a, true);
    let twice = apply_completion(&once, &a, true);
    assert_eq!(twice.experience, 200);
    assert_eq!(twice.badges, once.badges);
    assert_eq!(twice.completed_levels, once.completed_levels);
  }

  #[test]
  fn shared_badge_is_granted_once() {
    let p = apply_completion(&PlayerProgress::new(), &level("a", 10, Some("Same")), true);
    let p = apply_completion(&p, &level("b", 10, Some("Same")), true);
    assert_eq!(p.badges.len(), 1);
  }

  #[test]
  fn experience_saturates() {
    let mut start = PlayerProgress::new();
    start.experience = u32::MAX - 5;
    let p = apply_completion(&start, &level("a", 100, None), true);
    assert_eq!(p.experience, u32::MAX);
  }
}
