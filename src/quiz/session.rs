//! Quiz session state machine.
//!
//! A session walks a pre-shuffled queue. Each item starts in
//! `AwaitingAnswer`; wrong picks are remembered and cost accuracy, the
//! correct pick records timing and moves to `Answered`, and `advance` moves
//! on until the queue is exhausted (`Finished`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::QuizError;
use crate::config;
use crate::domain::{QuizItem, QuizMode, SessionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
  /// Current item shown, waiting for the correct pick
  AwaitingAnswer,
  /// Correct option revealed, waiting for `advance`
  Answered,
  /// Queue exhausted, summary available
  Finished,
}

impl SessionState {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::AwaitingAnswer => "awaiting_answer",
      Self::Answered => "answered",
      Self::Finished => "finished",
    }
  }
}

/// Result of submitting an option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmitOutcome {
  Correct,
  Wrong,
  /// The option was already tried; nothing changes
  AlreadyTried,
}

/// Coarse accuracy rating for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccuracyBand {
  High,
  Medium,
  Low,
}

impl AccuracyBand {
  pub fn from_accuracy(accuracy: u8) -> Self {
    if accuracy >= config::ACCURACY_HIGH_THRESHOLD {
      Self::High
    } else if accuracy >= config::ACCURACY_MEDIUM_THRESHOLD {
      Self::Medium
    } else {
      Self::Low
    }
  }
}

/// Immutable view of a session for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
  pub part_id: String,
  pub mode: QuizMode,
  pub state: SessionState,
  /// None once finished
  pub item: Option<QuizItem>,
  /// 0-based position of the current item
  pub item_index: usize,
  pub total: usize,
  pub progress_percent: f64,
  pub accuracy: u8,
  pub accuracy_band: AccuracyBand,
  pub tried_wrong: Vec<String>,
  pub correct_count: u32,
  pub wrong_count: u32,
}

/// End-of-session statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
  pub accuracy: u8,
  pub total_time_seconds: u64,
  pub hardest: Vec<SessionRecord>,
  pub fastest: Vec<SessionRecord>,
}

/// Live accuracy: share of "life points" left, one point per wrong option of
/// every item in the queue.
pub fn accuracy(item_count: usize, option_count: usize, wrong_count: u32) -> u8 {
  let life_points = item_count * option_count.saturating_sub(1);
  if life_points == 0 {
    return 100;
  }
  let remaining = life_points as f64 - wrong_count as f64;
  let percent = (remaining / life_points as f64 * 100.0).round();
  percent.clamp(0.0, 100.0) as u8
}

/// Summarize completed records: hardest by (wrong desc, time desc), fastest
/// among flawless answers by time.
pub fn summarize(records: &[SessionRecord], accuracy: u8) -> SessionSummary {
  let total_ms: u64 = records.iter().map(|r| r.elapsed_ms).sum();

  let mut hardest = records.to_vec();
  hardest.sort_by(|a, b| b.wrong.cmp(&a.wrong).then(b.elapsed_ms.cmp(&a.elapsed_ms)));
  hardest.truncate(config::HARDEST_LIMIT);

  let mut fastest: Vec<SessionRecord> = records.iter().filter(|r| r.wrong == 0).cloned().collect();
  fastest.sort_by_key(|r| r.elapsed_ms);
  fastest.truncate(config::FASTEST_LIMIT);

  SessionSummary {
    accuracy,
    total_time_seconds: total_ms / 1000,
    hardest,
    fastest,
  }
}

/// One study session over a generated queue.
#[derive(Debug, Clone)]
pub struct QuizSession {
  part_id: String,
  mode: QuizMode,
  option_count: usize,
  queue: Vec<QuizItem>,
  position: usize,
  state: SessionState,
  /// Wrong values tried on the current item, in pick order
  tried_wrong: Vec<String>,
  shown_at: DateTime<Utc>,
  correct_count: u32,
  wrong_count: u32,
  records: Vec<SessionRecord>,
  summary: Option<SessionSummary>,
}

impl QuizSession {
  /// Start a session; the first item is shown at `now`.
  pub fn start(
    part_id: impl Into<String>,
    mode: QuizMode,
    queue: Vec<QuizItem>,
    option_count: usize,
    now: DateTime<Utc>,
  ) -> Result<Self, QuizError> {
    let part_id = part_id.into();
    if queue.is_empty() {
      return Err(QuizError::EmptyLevel(part_id));
    }

    Ok(Self {
      part_id,
      mode,
      option_count,
      queue,
      position: 0,
      state: SessionState::AwaitingAnswer,
      tried_wrong: Vec::new(),
      shown_at: now,
      correct_count: 0,
      wrong_count: 0,
      records: Vec::new(),
      summary: None,
    })
  }

  pub fn state(&self) -> SessionState {
    self.state
  }

  /// Current item, None once finished
  pub fn current_item(&self) -> Option<&QuizItem> {
    match self.state {
      SessionState::Finished => None,
      _ => self.queue.get(self.position),
    }
  }

  pub fn summary(&self) -> Option<&SessionSummary> {
    self.summary.as_ref()
  }

  pub fn accuracy(&self) -> u8 {
    accuracy(self.queue.len(), self.option_count, self.wrong_count)
  }

  pub fn progress_percent(&self) -> f64 {
    match self.state {
      SessionState::Finished => 100.0,
      _ => self.position as f64 / self.queue.len() as f64 * 100.0,
    }
  }

  /// Submit an option for the current item at the current time
  pub fn submit(&mut self, value: &str) -> Result<SubmitOutcome, QuizError> {
    self.submit_at(value, Utc::now())
  }

  /// Submit an option for the current item at `now`.
  pub fn submit_at(&mut self, value: &str, now: DateTime<Utc>) -> Result<SubmitOutcome, QuizError> {
    if self.state != SessionState::AwaitingAnswer {
      return Err(QuizError::InvalidState {
        action: "submit",
        state: self.state,
      });
    }
    let item = &self.queue[self.position];
    if !item.has_option(value) {
      return Err(QuizError::UnknownOption(value.to_string()));
    }

    if value == item.correct_value {
      let elapsed_ms = (now - self.shown_at).num_milliseconds().max(0) as u64;
      self.records.push(SessionRecord {
        key: item.prompt.clone(),
        elapsed_ms,
        wrong: self.tried_wrong.len() as u32,
        gloss: item.gloss.clone(),
      });
      self.correct_count += 1;
      self.state = SessionState::Answered;
      return Ok(SubmitOutcome::Correct);
    }

    if self.tried_wrong.iter().any(|v| v == value) {
      return Ok(SubmitOutcome::AlreadyTried);
    }
    self.tried_wrong.push(value.to_string());
    self.wrong_count += 1;
    Ok(SubmitOutcome::Wrong)
  }

  /// Move past an answered item at the current time
  pub fn advance(&mut self) -> Result<SessionState, QuizError> {
    self.advance_at(Utc::now())
  }

  /// Move past an answered item; the next item is shown at `now`.
  pub fn advance_at(&mut self, now: DateTime<Utc>) -> Result<SessionState, QuizError> {
    if self.state != SessionState::Answered {
      return Err(QuizError::InvalidState {
        action: "advance",
        state: self.state,
      });
    }

    if self.position + 1 < self.queue.len() {
      self.position += 1;
      self.tried_wrong.clear();
      self.shown_at = now;
      self.state = SessionState::AwaitingAnswer;
    } else {
      self.state = SessionState::Finished;
      let summary = summarize(&self.records, self.accuracy());
      tracing::debug!(
        "Session {} finished: accuracy {}%, {}s",
        self.part_id,
        summary.accuracy,
        summary.total_time_seconds
      );
      self.summary = Some(summary);
    }
    Ok(self.state)
  }

  pub fn snapshot(&self) -> SessionSnapshot {
    let accuracy = self.accuracy();
    SessionSnapshot {
      part_id: self.part_id.clone(),
      mode: self.mode,
      state: self.state,
      item: self.current_item().cloned(),
      item_index: self.position,
      total: self.queue.len(),
      progress_percent: self.progress_percent(),
      accuracy,
      accuracy_band: AccuracyBand::from_accuracy(accuracy),
      tried_wrong: self.tried_wrong.clone(),
      correct_count: self.correct_count,
      wrong_count: self.wrong_count,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::QuizOption;
  use chrono::Duration;

  fn item(prompt: &str, correct: &str, wrong: &[&str]) -> QuizItem {
    let mut options = vec![QuizOption::plain(correct)];
    options.extend(wrong.iter().map(|w| QuizOption::plain(*w)));
    QuizItem {
      prompt: prompt.to_string(),
      correct_value: correct.to_string(),
      contextual_reading: correct.to_string(),
      gloss: format!("gloss {}", prompt),
      options,
    }
  }

  fn record(key: &str, wrong: u32, elapsed_ms: u64) -> SessionRecord {
    SessionRecord {
      key: key.to_string(),
      elapsed_ms,
      wrong,
      gloss: String::new(),
    }
  }

  fn session(items: usize, now: DateTime<Utc>) -> QuizSession {
    let queue = (0..items)
      .map(|i| item(&format!("q{}", i), "right", &["a", "b", "c"]))
      .collect();
    QuizSession::start("jlpt5_1", QuizMode::Kanji, queue, 4, now).unwrap()
  }

  #[test]
  fn test_empty_queue_is_empty_level() {
    let err = QuizSession::start("jlpt5_1", QuizMode::Kanji, vec![], 6, Utc::now()).unwrap_err();
    assert_eq!(err, QuizError::EmptyLevel("jlpt5_1".to_string()));
  }

  #[test]
  fn test_accuracy_formula() {
    assert_eq!(accuracy(0, 6, 0), 100);
    assert_eq!(accuracy(10, 1, 3), 100);
    assert_eq!(accuracy(2, 6, 0), 100);
    assert_eq!(accuracy(2, 6, 3), 70);
    assert_eq!(accuracy(2, 6, 10), 0);
    assert_eq!(accuracy(2, 6, 25), 0);
    // 1/3 remaining rounds to 33
    assert_eq!(accuracy(1, 4, 2), 33);
  }

  #[test]
  fn test_accuracy_monotone_in_wrong_count() {
    for items in 1..6 {
      let mut previous = 100;
      for wrong in 0..40 {
        let a = accuracy(items, 6, wrong);
        assert!(a <= previous);
        assert!(a <= 100);
        previous = a;
      }
    }
  }

  #[test]
  fn test_accuracy_band() {
    assert_eq!(AccuracyBand::from_accuracy(100), AccuracyBand::High);
    assert_eq!(AccuracyBand::from_accuracy(70), AccuracyBand::High);
    assert_eq!(AccuracyBand::from_accuracy(69), AccuracyBand::Medium);
    assert_eq!(AccuracyBand::from_accuracy(40), AccuracyBand::Medium);
    assert_eq!(AccuracyBand::from_accuracy(39), AccuracyBand::Low);
  }

  #[test]
  fn test_summary_hardest_and_fastest() {
    let records = vec![record("a", 0, 100), record("b", 2, 50), record("c", 0, 30)];
    let summary = summarize(&records, 90);

    let fastest: Vec<u64> = summary.fastest.iter().map(|r| r.elapsed_ms).collect();
    assert_eq!(fastest, vec![30, 100]);
    assert_eq!(summary.hardest[0].key, "b");
    assert_eq!(summary.hardest[0].wrong, 2);
    // Ties on wrong count break by slower first
    assert_eq!(summary.hardest[1].key, "a");
    assert_eq!(summary.accuracy, 90);
  }

  #[test]
  fn test_summary_limits_and_total_time() {
    let records: Vec<SessionRecord> = (0..15).map(|i| record(&format!("k{}", i), i % 3, 700)).collect();
    let summary = summarize(&records, 50);

    assert_eq!(summary.hardest.len(), config::HARDEST_LIMIT);
    assert_eq!(summary.fastest.len(), config::FASTEST_LIMIT);
    assert!(summary.fastest.iter().all(|r| r.wrong == 0));
    // 15 * 700ms = 10.5s, floored
    assert_eq!(summary.total_time_seconds, 10);
  }

  #[test]
  fn test_wrong_then_correct() {
    let start = Utc::now();
    let mut s = session(2, start);

    assert_eq!(s.submit_at("a", start).unwrap(), SubmitOutcome::Wrong);
    assert_eq!(s.submit_at("a", start).unwrap(), SubmitOutcome::AlreadyTried);
    assert_eq!(s.submit_at("b", start).unwrap(), SubmitOutcome::Wrong);
    assert_eq!(s.snapshot().wrong_count, 2);
    assert_eq!(s.snapshot().tried_wrong, vec!["a", "b"]);
    assert_eq!(s.state(), SessionState::AwaitingAnswer);

    let answered_at = start + Duration::milliseconds(1500);
    assert_eq!(s.submit_at("right", answered_at).unwrap(), SubmitOutcome::Correct);
    assert_eq!(s.state(), SessionState::Answered);
    assert_eq!(s.records, vec![SessionRecord {
      key: "q0".to_string(),
      elapsed_ms: 1500,
      wrong: 2,
      gloss: "gloss q0".to_string(),
    }]);
    // 2 items * 3 wrong options = 6 points, 2 lost
    assert_eq!(s.accuracy(), 67);
  }

  #[test]
  fn test_submit_rejected_outside_awaiting_answer() {
    let now = Utc::now();
    let mut s = session(1, now);
    s.submit_at("right", now).unwrap();

    let err = s.submit_at("a", now).unwrap_err();
    assert_eq!(err, QuizError::InvalidState { action: "submit", state: SessionState::Answered });
    assert_eq!(s.snapshot().wrong_count, 0);
  }

  #[test]
  fn test_unknown_option_rejected() {
    let now = Utc::now();
    let mut s = session(1, now);
    assert_eq!(s.submit_at("zzz", now).unwrap_err(), QuizError::UnknownOption("zzz".to_string()));
    assert_eq!(s.snapshot().wrong_count, 0);
  }

  #[test]
  fn test_advance_requires_answer() {
    let now = Utc::now();
    let mut s = session(2, now);
    let err = s.advance_at(now).unwrap_err();
    assert_eq!(err, QuizError::InvalidState { action: "advance", state: SessionState::AwaitingAnswer });
  }

  #[test]
  fn test_full_session_flow() {
    let start = Utc::now();
    let mut s = session(3, start);

    // q0: flawless, 4s
    s.submit_at("right", start + Duration::seconds(4)).unwrap();
    let next_shown = start + Duration::seconds(5);
    assert_eq!(s.advance_at(next_shown).unwrap(), SessionState::AwaitingAnswer);
    let snap = s.snapshot();
    assert_eq!(snap.item_index, 1);
    assert!(snap.tried_wrong.is_empty());
    assert!((snap.progress_percent - 100.0 / 3.0).abs() < 1e-9);

    // q1: one mistake, 2s
    s.submit_at("c", next_shown).unwrap();
    s.submit_at("right", next_shown + Duration::seconds(2)).unwrap();
    let last_shown = next_shown + Duration::seconds(3);
    s.advance_at(last_shown).unwrap();

    // q2: flawless, 1s
    s.submit_at("right", last_shown + Duration::seconds(1)).unwrap();
    assert!(s.summary().is_none());
    assert_eq!(s.advance_at(last_shown + Duration::seconds(2)).unwrap(), SessionState::Finished);

    let summary = s.summary().unwrap();
    assert_eq!(summary.total_time_seconds, 7);
    assert_eq!(summary.hardest[0].key, "q1");
    assert_eq!(summary.fastest.iter().map(|r| r.key.as_str()).collect::<Vec<_>>(), vec!["q2", "q0"]);
    // 9 points, 1 lost
    assert_eq!(summary.accuracy, 89);

    let snap = s.snapshot();
    assert_eq!(snap.state, SessionState::Finished);
    assert!(snap.item.is_none());
    assert_eq!(snap.progress_percent, 100.0);
    assert!(s.advance_at(Utc::now()).is_err());
    assert!(s.submit_at("right", Utc::now()).is_err());
  }

  #[test]
  fn test_snapshot_serializes_camel_case() {
    let s = session(1, Utc::now());
    let json = serde_json::to_value(s.snapshot()).unwrap();
    assert_eq!(json["state"], "awaitingAnswer");
    assert_eq!(json["partId"], "jlpt5_1");
    assert_eq!(json["accuracyBand"], "high");
    assert_eq!(json["item"]["correctValue"], "right");
  }
}
