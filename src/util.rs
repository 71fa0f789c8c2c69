//! Small utility helpers used across modules.

/// Normalize a free-text answer for comparison: trimmed and lowercased.
pub fn normalize_answer(s: &str) -> String {
  s.trim().to_lowercase()
}

/// Log-safe truncation for player-provided text.
/// Avoids spamming logs with whole policy documents.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut end = max;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  format!("{}… ({} bytes total)", &s[..end], s.len())
}
