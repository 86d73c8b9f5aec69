//! Quiz session handlers.
//!
//! A session is created from a part and a mode, then driven by
//! answer / next requests until it finishes and its summary is available.

use axum::{
  extract::{Path, State},
  Json,
};
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::domain::QuizMode;
use crate::quiz::{generate_queue, QuizError, QuizSession, SessionSnapshot, SessionSummary, SubmitOutcome};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
  pub part_id: String,
  pub mode: QuizMode,
  /// Restart under this session ID instead of creating a new one
  #[serde(default)]
  pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
  pub session_id: String,
  pub snapshot: SessionSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
  pub value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
  pub outcome: SubmitOutcome,
  pub snapshot: SessionSnapshot,
}

/// Generate a queue for the part and start a session over it
fn build_session(state: &AppState, part_id: &str, mode: QuizMode) -> Result<QuizSession, QuizError> {
  let part = state
    .part(part_id)
    .ok_or_else(|| QuizError::UnknownPart(part_id.to_string()))?;

  let mut rng = rand::rng();
  let queue = generate_queue(&state.index, part, mode, state.config.option_count, &mut rng)?;
  QuizSession::start(part_id, mode, queue, state.config.option_count, chrono::Utc::now())
}

/// Start a quiz session.
///
/// POST /sessions
pub async fn start_session(
  State(state): State<AppState>,
  Json(request): Json<StartRequest>,
) -> Result<Json<StartResponse>, ApiError> {
  let session = build_session(&state, &request.part_id, request.mode)?;
  let snapshot = session.snapshot();
  let session_id = match request.session_id {
    Some(id) => {
      state.sessions.replace(&id, session)?;
      id
    }
    None => state.sessions.insert(session),
  };

  tracing::info!(
    "Started {} session {} for {} ({} items)",
    request.mode.as_str(),
    session_id,
    request.part_id,
    snapshot.total
  );

  Ok(Json(StartResponse { session_id, snapshot }))
}

/// GET /sessions/{id}
pub async fn get_session(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
  let snapshot = state.sessions.with_session(&id, |s| Ok(s.snapshot()))?;
  Ok(Json(snapshot))
}

/// Submit an option for the current item.
///
/// POST /sessions/{id}/answer
pub async fn submit_answer(
  State(state): State<AppState>,
  Path(id): Path<String>,
  Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
  let response = state.sessions.with_session(&id, |s| {
    let outcome = s.submit(&request.value)?;
    Ok(AnswerResponse {
      outcome,
      snapshot: s.snapshot(),
    })
  })?;
  Ok(Json(response))
}

/// Move to the next item.
///
/// POST /sessions/{id}/next
pub async fn advance(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
  let snapshot = state.sessions.with_session(&id, |s| {
    s.advance()?;
    Ok(s.snapshot())
  })?;
  Ok(Json(snapshot))
}

/// Summary of a finished session.
///
/// GET /sessions/{id}/summary
pub async fn summary(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<SessionSummary>, ApiError> {
  let summary = state.sessions.with_session(&id, |s| {
    s.summary().cloned().ok_or(QuizError::InvalidState {
      action: "summarize",
      state: s.state(),
    })
  })?;
  Ok(Json(summary))
}
