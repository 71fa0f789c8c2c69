//! End-to-end progression through the public library API.

use std::sync::Arc;

use skystack_quest::domain::{AnswerOption, ChoiceQuestion};
use skystack_quest::seeds::seed_level_ids;
use skystack_quest::{
    AttemptStatus, ChallengeSpec, ChallengeType, Difficulty, GameError, GameFlow, LevelCatalog, LevelDefinition,
    Phase, Stage, Submission,
};

fn one_question(correct: &str) -> ChallengeSpec {
    ChallengeSpec::ChoiceSet {
        questions: vec![ChoiceQuestion {
            prompt: "Pick one".into(),
            options: ["a", "b", "c"]
                .iter()
                .map(|id| AnswerOption { id: (*id).into(), label: id.to_uppercase(), explanation: None })
                .collect(),
            correct: correct.into(),
            explanation: Some("Because.".into()),
        }],
    }
}

fn level(id: &str, xp: u32, badge: &str, prereqs: &[&str]) -> LevelDefinition {
    LevelDefinition {
        id: id.into(),
        title: id.to_uppercase(),
        description: String::new(),
        difficulty: Difficulty::Beginner,
        challenge_type: ChallengeType::MultipleChoice,
        xp_reward: xp,
        badge: Some(badge.into()),
        prerequisites: prereqs.iter().map(|p| p.to_string()).collect(),
        briefing: format!("{id} briefing"),
        debrief: format!("{id} debrief"),
        challenge: one_question("a"),
    }
}

fn two_level_flow() -> GameFlow {
    let catalog = LevelCatalog::new(vec![level("A", 100, "Novice", &[]), level("B", 150, "Adept", &["A"])]).unwrap();
    GameFlow::new(Arc::new(catalog))
}

fn builtin_flow() -> GameFlow {
    GameFlow::new(Arc::new(LevelCatalog::builtin().unwrap()))
}

fn pick(option: &str) -> Submission {
    Submission::Choices { selections: vec![Some(option.into())] }
}

fn unlocked(flow: &GameFlow, id: &str) -> bool {
    flow.list_levels().iter().any(|s| s.level.id == id && s.unlocked)
}

fn play_to_debrief(flow: &mut GameFlow, id: &str, submissions: &[Submission]) {
    flow.select_level(id).unwrap();
    flow.begin_challenge().unwrap();
    let mut last = None;
    for s in submissions {
        last = Some(flow.submit_answer(s).unwrap());
    }
    assert!(last.map(|e| e.passed).unwrap_or(false), "{id} did not pass");
    assert_eq!(flow.phase(), Phase::Playing { level_id: id.into(), stage: Stage::Debrief });
}

#[test]
fn two_level_progression_with_replay() {
    let mut flow = two_level_flow();
    assert_eq!(flow.phase(), Phase::Intro);
    flow.start().unwrap();

    assert!(unlocked(&flow, "A"));
    assert!(!unlocked(&flow, "B"));
    assert_eq!(flow.select_level("B").unwrap_err(), GameError::LevelLocked("B".into()));
    assert_eq!(flow.phase(), Phase::LevelSelect);

    // A wrong answer keeps the challenge active.
    flow.select_level("A").unwrap();
    flow.begin_challenge().unwrap();
    let miss = flow.submit_answer(&pick("b")).unwrap();
    assert!(!miss.passed);
    assert_eq!(miss.status, AttemptStatus::Failed);
    assert_eq!(flow.phase(), Phase::Playing { level_id: "A".into(), stage: Stage::Active });

    let hit = flow.submit_answer(&pick("a")).unwrap();
    assert!(hit.passed);
    let progress = flow.complete_challenge().unwrap().clone();
    assert_eq!(progress.experience, 100);
    assert_eq!(progress.player_level(), 1);
    assert!(progress.badges.contains("Novice"));
    assert_eq!(flow.phase(), Phase::LevelSelect);
    assert!(unlocked(&flow, "B"));

    play_to_debrief(&mut flow, "B", &[pick("a")]);
    let progress = flow.complete_challenge().unwrap().clone();
    assert_eq!(progress.experience, 250);
    assert_eq!(progress.player_level(), 2);
    assert_eq!(progress.completed_levels.len(), 2);

    // Replaying A grants xp again but never duplicates badges or completions.
    play_to_debrief(&mut flow, "A", &[pick("a")]);
    let progress = flow.complete_challenge().unwrap().clone();
    assert_eq!(progress.experience, 350);
    assert_eq!(progress.badges.len(), 2);
    assert_eq!(progress.completed_levels.len(), 2);
}

#[test]
fn reward_is_applied_once_per_pass() {
    let mut flow = two_level_flow();
    flow.start().unwrap();
    play_to_debrief(&mut flow, "A", &[pick("a")]);

    // Resubmitting in debrief returns the cached pass.
    let again = flow.submit_answer(&pick("c")).unwrap();
    assert!(again.passed);

    flow.complete_challenge().unwrap();
    assert!(matches!(flow.complete_challenge(), Err(GameError::InvalidTransition { .. })));
    assert_eq!(flow.progress().experience, 100);
}

#[test]
fn abandoning_discards_the_attempt() {
    let mut flow = two_level_flow();
    flow.start().unwrap();
    flow.select_level("A").unwrap();
    flow.begin_challenge().unwrap();
    flow.submit_answer(&pick("b")).unwrap();
    flow.abandon_challenge().unwrap();
    assert_eq!(flow.phase(), Phase::LevelSelect);
    assert!(flow.attempt().is_none());
    assert_eq!(flow.progress().experience, 0);
}

#[test]
fn builtin_arrangement_and_policy_levels() {
    let mut flow = builtin_flow();
    flow.start().unwrap();
    play_to_debrief(
        &mut flow,
        "ec2-basics",
        &[Submission::Choices {
            selections: vec![Some("amazon-linux".into()), Some("t3.micro".into()), Some("http-https".into())],
        }],
    );
    flow.complete_challenge().unwrap();

    let iam: Vec<Submission> = ["1", "1", "1", "1", "2"]
        .iter()
        .enumerate()
        .map(|(i, o)| Submission::Choice { option: (*o).into(), question: Some(i) })
        .collect();
    play_to_debrief(&mut flow, "iam-policy", &iam);
    flow.complete_challenge().unwrap();

    // Wrong order stays active, the reference order passes.
    flow.select_level("terraform-vpc").unwrap();
    flow.begin_challenge().unwrap();
    let order = |ids: &[&str]| Submission::Sequence { blocks: ids.iter().map(|s| s.to_string()).collect() };
    let wrong = flow.submit_answer(&order(&["vpc", "provider", "igw", "subnet", "route-table"])).unwrap();
    assert!(!wrong.passed);
    assert_eq!(wrong.per_question, vec![false, false, true, true, true]);
    let short = flow.submit_answer(&order(&["provider", "vpc"]));
    assert!(matches!(short, Err(GameError::InvalidSubmissionShape(_))));
    let right = flow.submit_answer(&order(&["provider", "vpc", "igw", "subnet", "route-table"])).unwrap();
    assert!(right.passed);
    flow.complete_challenge().unwrap();

    flow.select_level("iam-policy-writer").unwrap();
    flow.begin_challenge().unwrap();
    let partial = flow
        .submit_answer(&Submission::Text { text: r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow"}]}"#.into() })
        .unwrap();
    assert!(!partial.passed);
    assert_eq!(partial.unmet.len(), 3);
    let policy = r#"{
      "Version": "2012-10-17",
      "Statement": [{
        "Effect": "Allow",
        "Action": ["s3:GetObject", "s3:PutObject"],
        "Resource": "arn:aws:s3:::dev-bucket/*"
      }]
    }"#;
    assert!(flow.submit_answer(&Submission::Text { text: policy.into() }).unwrap().passed);
    let progress = flow.complete_challenge().unwrap();
    assert_eq!(progress.experience, 100 + 150 + 200 + 175);
    assert!(progress.badges.contains("Policy Author"));
}

#[test]
fn quiz_below_threshold_restarts() {
    let mut flow = builtin_flow();
    flow.start().unwrap();
    play_to_debrief(
        &mut flow,
        "ec2-basics",
        &[Submission::Choices {
            selections: vec![Some("amazon-linux".into()), Some("t3.micro".into()), Some("http-https".into())],
        }],
    );
    flow.complete_challenge().unwrap();

    flow.select_level("iam-policy").unwrap();
    flow.begin_challenge().unwrap();
    let mut last = None;
    for _ in 0..5 {
        last = Some(flow.submit_answer(&Submission::Choice { option: "3".into(), question: None }).unwrap());
    }
    let last = last.unwrap();
    assert_eq!(last.status, AttemptStatus::Failed);
    assert_eq!(last.correct_count, 0);

    // The next answer opens a fresh run at question 0.
    let fresh = flow.submit_answer(&Submission::Choice { option: "1".into(), question: Some(0) }).unwrap();
    assert_eq!(fresh.status, AttemptStatus::InProgress);
    assert_eq!(fresh.per_question, vec![true]);
    assert_eq!(fresh.current, Some(1));
}

#[test]
fn decoding_hint_skip_and_retry() {
    let mut flow = builtin_flow();
    flow.start().unwrap();
    play_to_debrief(
        &mut flow,
        "ec2-basics",
        &[Submission::Choices {
            selections: vec![Some("amazon-linux".into()), Some("t3.micro".into()), Some("http-https".into())],
        }],
    );
    flow.complete_challenge().unwrap();

    flow.select_level("word-puzzle").unwrap();
    flow.begin_challenge().unwrap();
    assert!(matches!(flow.skip_puzzle(), Err(GameError::SkipUnavailable(_))));

    let text = |t: &str| Submission::Text { text: t.into() };
    let first = flow.submit_answer(&text("ecs")).unwrap();
    assert!(first.hint.is_none());
    let second = flow.submit_answer(&text("eks")).unwrap();
    assert!(second.hint.is_some());
    assert!(second.can_skip);

    let skipped = flow.skip_puzzle().unwrap();
    assert_eq!(skipped.current, Some(1));
    for answer in ["iam", "s3", "vpc"] {
        flow.submit_answer(&text(answer)).unwrap();
    }
    let end = flow.submit_answer(&text(" Lambda ")).unwrap();
    assert_eq!(end.status, AttemptStatus::Failed);
    assert!(!end.passed);
    assert_eq!(flow.phase(), Phase::Playing { level_id: "word-puzzle".into(), stage: Stage::Active });

    // A clean run passes.
    let mut last = None;
    for answer in ["ec2", "IAM", "s3", "vpc", "lambda"] {
        last = Some(flow.submit_answer(&text(answer)).unwrap());
    }
    assert!(last.unwrap().passed);
    let progress = flow.complete_challenge().unwrap();
    assert!(progress.badges.contains("Code Breaker"));
}

#[test]
fn builtin_catalog_order_is_stable() {
    let flow = builtin_flow();
    let listed: Vec<String> = flow.list_levels().iter().map(|s| s.level.id.clone()).collect();
    assert_eq!(listed, seed_level_ids());
    let open: Vec<&str> = flow.list_levels().iter().filter(|s| s.unlocked).map(|s| s.level.id.as_str()).collect();
    assert_eq!(open, vec!["ec2-basics"]);
}
