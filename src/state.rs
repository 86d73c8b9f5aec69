//! Application state shared by all handlers.

use std::sync::Arc;

use crate::config::QuizConfig;
use crate::content::DictionaryIndex;
use crate::domain::LevelPart;
use crate::quiz::planner;
use crate::session::SessionStore;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable dictionary index
    pub index: Arc<DictionaryIndex>,

    /// Planned parts, easiest level first
    pub parts: Arc<Vec<LevelPart>>,

    pub config: Arc<QuizConfig>,

    /// Live quiz sessions
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Build state, planning parts from the index.
    pub fn new(index: DictionaryIndex, config: QuizConfig) -> Self {
        let parts = planner::plan(&index, &config);
        Self::with_parts(index, parts, config)
    }

    pub fn with_parts(index: DictionaryIndex, parts: Vec<LevelPart>, config: QuizConfig) -> Self {
        Self {
            index: Arc::new(index),
            parts: Arc::new(parts),
            config: Arc::new(config),
            sessions: Arc::new(SessionStore::new()),
        }
    }

    /// Look up a planned part by id
    pub fn part(&self, id: &str) -> Option<&LevelPart> {
        planner::find_part(&self.parts, id)
    }
}
