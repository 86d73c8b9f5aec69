//! Quiz engine: part planning, question generation and study sessions.
//!
//! # Flow
//!
//! 1. `planner::plan` splits every level of the index into parts
//! 2. `generator::generate_queue` turns a part into a shuffled queue of
//!    `QuizItem`s, using `distractors` to fill each option set
//! 3. `QuizSession` walks the queue and produces a `SessionSummary`
//!
//! All randomness goes through `RandomSource`.

pub mod distractors;
pub mod generator;
pub mod planner;
pub mod random;
pub mod session;

pub use distractors::{select_character_options, select_word_options, CharacterReading, SimilarityTier};
pub use generator::generate_queue;
pub use planner::{find_part, group_parts, plan, plan_with_progress, PlanProgress};
pub use random::RandomSource;
pub use session::{
  accuracy, summarize, AccuracyBand, QuizSession, SessionSnapshot, SessionState, SessionSummary, SubmitOutcome,
};

/// Quiz errors.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizError {
  /// No usable items for the part (part id)
  EmptyLevel(String),
  /// No part with this id
  UnknownPart(String),
  /// No live session with this id
  UnknownSession(String),
  /// Submitted value is not one of the current options
  UnknownOption(String),
  /// Operation not allowed in the current state
  InvalidState {
    action: &'static str,
    state: SessionState,
  },
}

impl std::fmt::Display for QuizError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      QuizError::EmptyLevel(part) => write!(f, "No usable quiz items in part {}", part),
      QuizError::UnknownPart(part) => write!(f, "Unknown part: {}", part),
      QuizError::UnknownSession(id) => write!(f, "Unknown session: {}", id),
      QuizError::UnknownOption(value) => write!(f, "Not an option for this item: {}", value),
      QuizError::InvalidState { action, state } => {
        write!(f, "Cannot {} while session is {}", action, state.as_str())
      }
    }
  }
}

impl QuizError {
  /// Short message suitable for showing to the learner
  pub fn user_message(&self) -> String {
    match self {
      QuizError::EmptyLevel(_) => "This part has nothing to quiz yet. Try another part.".to_string(),
      QuizError::UnknownPart(_) => "That part does not exist.".to_string(),
      QuizError::UnknownSession(_) => "Your session has expired. Start a new one.".to_string(),
      QuizError::UnknownOption(_) => "That answer is not one of the choices.".to_string(),
      QuizError::InvalidState { state, .. } => match state {
        SessionState::AwaitingAnswer => "Answer the current question first.".to_string(),
        SessionState::Answered => "Move on to the next question.".to_string(),
        SessionState::Finished => "This session is already finished.".to_string(),
      },
    }
  }
}

impl std::error::Error for QuizError {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_messages() {
    let err = QuizError::InvalidState {
      action: "advance",
      state: SessionState::AwaitingAnswer,
    };
    assert_eq!(err.to_string(), "Cannot advance while session is awaiting_answer");
    assert_eq!(err.user_message(), "Answer the current question first.");

    assert_eq!(QuizError::EmptyLevel("jlpt1_9".to_string()).to_string(), "No usable quiz items in part jlpt1_9");
  }
}
