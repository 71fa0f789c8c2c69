//! Command dispatch shared by both HTTP and WebSocket handlers.
//!
//! Each command maps to one `GameFlow` operation and produces exactly one reply.
//! Errors become `ServerMessage::Error` and never alter the session.

use tracing::{debug, instrument};

use crate::evaluator::Submission;
use crate::flow::GameFlow;
use crate::protocol::{challenge_out, levels_out, snapshot, ChallengeOut, ClientCommand, ProgressOut, ServerMessage};
use crate::util::trunc_for_log;

fn current_challenge(flow: &GameFlow) -> Option<ChallengeOut> {
  let level = flow.current_level()?;
  let attempt = flow.attempt()?;
  Some(challenge_out(level, attempt.snapshot()))
}

fn challenge_reply(flow: &GameFlow) -> ServerMessage {
  match current_challenge(flow) {
    Some(challenge) => ServerMessage::Challenge { challenge },
    None => ServerMessage::Snapshot(snapshot(flow, None)),
  }
}

fn describe(submission: &Submission) -> String {
  match submission {
    Submission::Choices { selections } => format!("choices({})", selections.len()),
    Submission::Choice { option, .. } => format!("choice({})", trunc_for_log(option, 32)),
    Submission::Sequence { blocks } => format!("sequence({})", blocks.len()),
    Submission::Text { text } => format!("text({} bytes)", text.len()),
  }
}

#[instrument(level = "info", skip_all)]
pub fn handle_command(flow: &mut GameFlow, cmd: ClientCommand) -> ServerMessage {
  match cmd {
    ClientCommand::Ping => ServerMessage::Pong,

    ClientCommand::Snapshot => ServerMessage::Snapshot(snapshot(flow, None)),

    ClientCommand::Start => match flow.start() {
      Ok(()) => ServerMessage::Snapshot(snapshot(flow, None)),
      Err(e) => e.into(),
    },

    ClientCommand::ListLevels => ServerMessage::Levels { levels: levels_out(flow) },

    ClientCommand::SelectLevel { level_id } => match flow.select_level(&level_id) {
      Ok(_) => challenge_reply(flow),
      Err(e) => e.into(),
    },

    ClientCommand::BeginChallenge => match flow.begin_challenge() {
      Ok(()) => challenge_reply(flow),
      Err(e) => e.into(),
    },

    ClientCommand::SubmitAnswer { submission } => {
      debug!(target: "quest", submission = %describe(&submission), "Answer received");
      match flow.submit_answer(&submission) {
        Ok(evaluation) => ServerMessage::Evaluation { evaluation, phase: flow.phase() },
        Err(e) => e.into(),
      }
    }

    ClientCommand::SkipPuzzle => match flow.skip_puzzle() {
      Ok(evaluation) => ServerMessage::Evaluation { evaluation, phase: flow.phase() },
      Err(e) => e.into(),
    },

    ClientCommand::CompleteChallenge => match flow.complete_challenge() {
      Ok(progress) => {
        let progress = ProgressOut::from(progress);
        ServerMessage::Progress { progress, phase: flow.phase() }
      }
      Err(e) => e.into(),
    },

    ClientCommand::AbandonChallenge => match flow.abandon_challenge() {
      Ok(()) => ServerMessage::Snapshot(snapshot(flow, None)),
      Err(e) => e.into(),
    },

    ClientCommand::Progress => ServerMessage::Progress { progress: ProgressOut::from(flow.progress()), phase: flow.phase() },
  }
}
