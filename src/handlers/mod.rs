//! JSON HTTP surface over the quiz engine.

pub mod parts;
pub mod quiz;

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{get, post},
  Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::quiz::QuizError;
use crate::state::AppState;

pub use parts::list_parts;
pub use quiz::{advance, get_session, start_session, submit_answer, summary};

/// Build the application router
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/parts", get(list_parts))
    .route("/sessions", post(start_session))
    .route("/sessions/{id}", get(get_session))
    .route("/sessions/{id}/answer", post(submit_answer))
    .route("/sessions/{id}/next", post(advance))
    .route("/sessions/{id}/summary", get(summary))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
  error: String,
  message: String,
}

/// Error response: status code plus a JSON body with a client-safe message
#[derive(Debug)]
pub struct ApiError(pub QuizError);

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self.0 {
      QuizError::UnknownPart(_) | QuizError::UnknownSession(_) => StatusCode::NOT_FOUND,
      QuizError::InvalidState { .. } => StatusCode::CONFLICT,
      QuizError::EmptyLevel(_) | QuizError::UnknownOption(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
  }
}

impl From<QuizError> for ApiError {
  fn from(err: QuizError) -> Self {
    Self(err)
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    tracing::debug!("Request failed ({}): {}", status, self.0);
    let body = ErrorBody {
      error: self.0.to_string(),
      message: self.0.user_message(),
    };
    (status, Json(body)).into_response()
  }
}
