use axum::{extract::State, Json};

use crate::domain::LevelGroup;
use crate::quiz::group_parts;
use crate::state::AppState;

/// Planned parts grouped by level, easiest first.
///
/// GET /parts
pub async fn list_parts(State(state): State<AppState>) -> Json<Vec<LevelGroup>> {
  Json(group_parts(&state.parts))
}
