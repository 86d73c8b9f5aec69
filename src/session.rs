//! Simple in-memory storage for quiz sessions.
//!
//! Stores QuizSession state keyed by a random session ID.
//! Sessions expire after a configurable duration of inactivity.

use crate::config;
use crate::quiz::{QuizError, QuizSession};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Session entry with last access time for expiration
struct SessionEntry {
  session: QuizSession,
  last_access: DateTime<Utc>,
}

/// Session store shared through the app state
#[derive(Default)]
pub struct SessionStore {
  sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
    // A panicked holder cannot leave a half-applied transition behind
    self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  /// Store a new session and return its ID
  pub fn insert(&self, session: QuizSession) -> String {
    self.insert_at(session, Utc::now())
  }

  pub fn insert_at(&self, session: QuizSession, now: DateTime<Utc>) -> String {
    let mut sessions = self.lock();

    // Clean up expired sessions occasionally (~10% chance)
    if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
      cleanup_expired(&mut sessions, now);
    }

    let session_id = generate_session_id();
    sessions.insert(
      session_id.clone(),
      SessionEntry {
        session,
        last_access: now,
      },
    );
    session_id
  }

  /// Swap in a new session under an existing live ID, returning the old one
  pub fn replace(&self, session_id: &str, session: QuizSession) -> Result<QuizSession, QuizError> {
    self.replace_at(session_id, session, Utc::now())
  }

  pub fn replace_at(
    &self,
    session_id: &str,
    session: QuizSession,
    now: DateTime<Utc>,
  ) -> Result<QuizSession, QuizError> {
    let mut sessions = self.lock();
    let expiry = now - Duration::hours(config::SESSION_EXPIRY_HOURS);

    match sessions.get_mut(session_id) {
      Some(entry) if entry.last_access > expiry => {
        entry.last_access = now;
        Ok(std::mem::replace(&mut entry.session, session))
      }
      _ => Err(QuizError::UnknownSession(session_id.to_string())),
    }
  }

  /// Run `f` against a live session, refreshing its last access time
  pub fn with_session<T, F>(&self, session_id: &str, f: F) -> Result<T, QuizError>
  where
    F: FnOnce(&mut QuizSession) -> Result<T, QuizError>,
  {
    self.with_session_at(session_id, Utc::now(), f)
  }

  pub fn with_session_at<T, F>(&self, session_id: &str, now: DateTime<Utc>, f: F) -> Result<T, QuizError>
  where
    F: FnOnce(&mut QuizSession) -> Result<T, QuizError>,
  {
    let mut sessions = self.lock();
    let expiry = now - Duration::hours(config::SESSION_EXPIRY_HOURS);

    let Some(entry) = sessions.get_mut(session_id) else {
      return Err(QuizError::UnknownSession(session_id.to_string()));
    };
    if entry.last_access <= expiry {
      sessions.remove(session_id);
      tracing::debug!("Session {} expired", session_id);
      return Err(QuizError::UnknownSession(session_id.to_string()));
    }

    entry.last_access = now;
    f(&mut entry.session)
  }

  /// Drop sessions idle past the expiry window, returning how many were dropped
  pub fn cleanup_expired_at(&self, now: DateTime<Utc>) -> usize {
    let mut sessions = self.lock();
    let before = sessions.len();
    cleanup_expired(&mut sessions, now);
    before - sessions.len()
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Clean up expired sessions
fn cleanup_expired(sessions: &mut HashMap<String, SessionEntry>, now: DateTime<Utc>) {
  let expiry = now - Duration::hours(config::SESSION_EXPIRY_HOURS);
  sessions.retain(|_, entry| entry.last_access > expiry);
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}
