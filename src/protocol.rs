//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Challenge views never carry answers, reference orderings, hints or required tokens.

use serde::{Deserialize, Serialize};

use crate::domain::{ChallengeSpec, ChallengeType, Difficulty, LevelDefinition, PlayerProgress, XP_PER_PLAYER_LEVEL};
use crate::error::GameError;
use crate::evaluator::{Evaluation, Submission};
use crate::flow::{GameFlow, LevelStatus, Phase};

/// Commands a client can send, over WebSocket or `POST /sessions/{id}/command`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    Ping,
    Start,
    Snapshot,
    ListLevels,
    SelectLevel {
        #[serde(rename = "levelId")]
        level_id: String,
    },
    BeginChallenge,
    SubmitAnswer {
        submission: Submission,
    },
    SkipPuzzle,
    CompleteChallenge,
    AbandonChallenge,
    Progress,
}

/// Replies the server sends back, one per command.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Pong,
    Snapshot(SessionSnapshot),
    Levels {
        levels: Vec<LevelOut>,
    },
    Challenge {
        challenge: ChallengeOut,
    },
    Evaluation {
        evaluation: Evaluation,
        phase: Phase,
    },
    Progress {
        progress: ProgressOut,
        phase: Phase,
    },
    Error {
        kind: String,
        message: String,
    },
}

impl From<GameError> for ServerMessage {
    fn from(e: GameError) -> Self {
        ServerMessage::Error { kind: e.kind().to_string(), message: e.to_string() }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOut {
    pub experience: u32,
    pub player_level: u32,
    pub xp_into_level: u32,
    /// Size of one tier; the bar fills at `xpIntoLevel / xpForNextLevel`.
    pub xp_for_next_level: u32,
    pub badges: Vec<String>,
    pub completed_levels: Vec<String>,
}

impl From<&PlayerProgress> for ProgressOut {
    fn from(p: &PlayerProgress) -> Self {
        Self {
            experience: p.experience,
            player_level: p.player_level(),
            xp_into_level: p.xp_into_level(),
            xp_for_next_level: XP_PER_PLAYER_LEVEL,
            badges: p.badges.iter().cloned().collect(),
            completed_levels: p.completed_levels.iter().cloned().collect(),
        }
    }
}

/// Level card for the selection screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelOut {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub challenge_type: ChallengeType,
    pub xp_reward: u32,
    pub badge: Option<String>,
    pub prerequisites: Vec<String>,
    pub unlocked: bool,
    pub completed: bool,
}

impl From<&LevelStatus<'_>> for LevelOut {
    fn from(s: &LevelStatus<'_>) -> Self {
        let l = s.level;
        Self {
            id: l.id.clone(),
            title: l.title.clone(),
            description: l.description.clone(),
            difficulty: l.difficulty,
            challenge_type: l.challenge_type,
            xp_reward: l.xp_reward,
            badge: l.badge.clone(),
            prerequisites: l.prerequisites.clone(),
            unlocked: s.unlocked,
            completed: s.completed,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionOut {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionOut {
    pub prompt: String,
    pub options: Vec<OptionOut>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PuzzleOut {
    pub scrambled: String,
    pub clue: String,
    pub category: String,
}

/// Playable content of a challenge, stripped of anything that gives the answer away.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChallengeContentOut {
    ChoiceSet {
        questions: Vec<QuestionOut>,
    },
    Quiz {
        questions: Vec<QuestionOut>,
        #[serde(rename = "passThreshold")]
        pass_threshold: usize,
    },
    Arrangement {
        instructions: String,
        blocks: Vec<OptionOut>,
        slots: usize,
    },
    Decoding {
        puzzles: Vec<PuzzleOut>,
    },
    PolicyForm {
        instructions: String,
        template: String,
        /// How many checks the document must satisfy.
        checks: usize,
    },
}

impl From<&ChallengeSpec> for ChallengeContentOut {
    fn from(spec: &ChallengeSpec) -> Self {
        let questions = |qs: &[crate::domain::ChoiceQuestion]| -> Vec<QuestionOut> {
            qs.iter()
                .map(|q| QuestionOut {
                    prompt: q.prompt.clone(),
                    options: q.options.iter().map(|o| OptionOut { id: o.id.clone(), label: o.label.clone() }).collect(),
                })
                .collect()
        };
        match spec {
            ChallengeSpec::ChoiceSet { questions: qs } => ChallengeContentOut::ChoiceSet { questions: questions(qs) },
            ChallengeSpec::Quiz { questions: qs, pass_threshold } => {
                ChallengeContentOut::Quiz { questions: questions(qs), pass_threshold: *pass_threshold }
            }
            ChallengeSpec::Arrangement { instructions, blocks, .. } => ChallengeContentOut::Arrangement {
                instructions: instructions.clone(),
                blocks: blocks.iter().map(|b| OptionOut { id: b.id.clone(), label: b.label.clone() }).collect(),
                slots: spec.item_count(),
            },
            ChallengeSpec::Decoding { puzzles } => ChallengeContentOut::Decoding {
                puzzles: puzzles
                    .iter()
                    .map(|p| PuzzleOut { scrambled: p.scrambled.clone(), clue: p.clue.clone(), category: p.category.clone() })
                    .collect(),
            },
            ChallengeSpec::PolicyForm { instructions, template, .. } => ChallengeContentOut::PolicyForm {
                instructions: instructions.clone(),
                template: template.clone(),
                checks: spec.item_count(),
            },
        }
    }
}

/// DTO for the level being played.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeOut {
    pub level_id: String,
    pub title: String,
    pub briefing: String,
    pub debrief: String,
    pub xp_reward: u32,
    pub badge: Option<String>,
    pub content: ChallengeContentOut,
    /// Where the attempt stands (answered items, hint, skip availability).
    pub state: Evaluation,
}

/// Convert the level in play into the public DTO.
pub fn challenge_out(level: &LevelDefinition, state: Evaluation) -> ChallengeOut {
    ChallengeOut {
        level_id: level.id.clone(),
        title: level.title.clone(),
        briefing: level.briefing.clone(),
        debrief: level.debrief.clone(),
        xp_reward: level.xp_reward,
        badge: level.badge.clone(),
        content: ChallengeContentOut::from(&level.challenge),
        state,
    }
}

/// Everything a client needs to redraw after reconnecting.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub phase: Phase,
    pub progress: ProgressOut,
    pub levels: Vec<LevelOut>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge: Option<ChallengeOut>,
}

pub fn levels_out(flow: &GameFlow) -> Vec<LevelOut> {
    flow.list_levels().iter().map(LevelOut::from).collect()
}

pub fn snapshot(flow: &GameFlow, session_id: Option<String>) -> SessionSnapshot {
    let challenge = match (flow.current_level(), flow.attempt()) {
        (Some(level), Some(attempt)) => Some(challenge_out(level, attempt.snapshot())),
        _ => None,
    };
    SessionSnapshot {
        session_id,
        phase: flow.phase(),
        progress: ProgressOut::from(flow.progress()),
        levels: levels_out(flow),
        challenge,
    }
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub levels: usize,
    pub sessions: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreatedOut {
    pub session_id: String,
    pub snapshot: SessionSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::seed_levels;

    #[test]
    fn progress_reports_position_inside_tier() {
        let mut p = PlayerProgress::new();
        p.experience = 450;
        let json = serde_json::to_value(ProgressOut::from(&p)).unwrap();
        assert_eq!(json["playerLevel"], 3);
        assert_eq!(json["xpIntoLevel"], 50);
        assert_eq!(json["xpForNextLevel"], 200);
    }

    #[test]
    fn content_counts_scored_items() {
        let levels = seed_levels();
        let by_id = |id: &str| levels.iter().find(|l| l.id == id).unwrap();

        match ChallengeContentOut::from(&by_id("terraform-vpc").challenge) {
            ChallengeContentOut::Arrangement { slots, blocks, .. } => {
                assert_eq!(slots, 5);
                assert_eq!(blocks.len(), 5);
            }
            other => panic!("unexpected {other:?}"),
        }
        match ChallengeContentOut::from(&by_id("iam-policy-writer").challenge) {
            ChallengeContentOut::PolicyForm { checks, .. } => assert_eq!(checks, 5),
            other => panic!("unexpected {other:?}"),
        }
    }
}
