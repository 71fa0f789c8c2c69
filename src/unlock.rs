//! Which levels are selectable for a given completed set.

use std::collections::BTreeSet;

use crate::domain::LevelDefinition;

/// True when every prerequisite of `level` is in `completed` (vacuously true for none).
pub fn is_unlocked(level: &LevelDefinition, completed: &BTreeSet<String>) -> bool {
  level.prerequisites.iter().all(|p| completed.contains(p))
}

/// Membership test; completed levels stay unlocked and can be replayed.
pub fn is_completed(level_id: &str, completed: &BTreeSet<String>) -> bool {
  completed.contains(level_id)
}
