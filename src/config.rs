//! Application configuration constants and the runtime quiz configuration.
//!
//! Values resolve with priority: config.toml > environment (.env) > default.

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::JlptLevel;

// ==================== Quiz Defaults ====================

/// Characters per part for every level except the hardest
pub const MAX_KANJI_PER_PART_DEFAULT: usize = 45;

/// The hardest level is split into this many roughly equal parts
pub const TARGET_PARTS_HARDEST_LEVEL: usize = 9;

/// Options per question (one correct answer plus distractors)
pub const NUM_QUIZ_OPTIONS: usize = 6;

/// A question needs at least one distractor
pub const MIN_QUIZ_OPTIONS: usize = 2;

/// Records listed as hardest in the session summary
pub const HARDEST_LIMIT: usize = 10;

/// Records listed as fastest in the session summary
pub const FASTEST_LIMIT: usize = 5;

/// Accuracy at or above this is shown as good
pub const ACCURACY_HIGH_THRESHOLD: u8 = 70;

/// Accuracy at or above this (and below high) is shown as fair
pub const ACCURACY_MEDIUM_THRESHOLD: u8 = 40;

/// Default dictionary location
pub const DEFAULT_DICTIONARY_PATH: &str = "data/kanjiapi_small.json";

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Get the full server bind address
pub fn server_bind_addr() -> String {
    format!("{}:{}", SERVER_ADDR, SERVER_PORT)
}

// ==================== Session Configuration ====================

/// Quiz session expiration time in hours of inactivity
pub const SESSION_EXPIRY_HOURS: i64 = 1;

/// Probability threshold for session cleanup (0-255, lower = more frequent)
/// Value of 25 means ~10% chance (25/256) on each session access
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

// ==================== Word Complexity ====================

/// Visual complexity ceiling for words of a level (applied to the flat word
/// shape, whose level is derived from its kanji)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordComplexityLimits {
    pub max_strokes_per_kanji: u32,
    pub max_grade_per_kanji: u8,
    pub max_total_strokes: u32,
}

/// Stroke count assumed for kanji with no recorded strokes
pub const UNKNOWN_STROKE_COUNT: u32 = 99;

/// Grade assumed for kanji outside the school grade system
pub const UNKNOWN_GRADE: u8 = 9;

/// Get the complexity ceiling for a level
pub fn word_complexity_limits(level: JlptLevel) -> WordComplexityLimits {
    let (max_strokes_per_kanji, max_grade_per_kanji, max_total_strokes) = match level {
        JlptLevel::N5 => (6, 1, 10),
        JlptLevel::N4 => (8, 2, 15),
        JlptLevel::N3 => (10, 4, 20),
        JlptLevel::N2 => (12, 6, 24),
        JlptLevel::N1 => (14, 8, 28),
    };
    WordComplexityLimits {
        max_strokes_per_kanji,
        max_grade_per_kanji,
        max_total_strokes,
    }
}

// ==================== Runtime Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct AppConfig {
    quiz: Option<QuizSection>,
    dictionary: Option<DictionarySection>,
}

#[derive(Debug, Default, Deserialize)]
struct QuizSection {
    max_kanji_per_part: Option<usize>,
    hardest_level_parts: Option<usize>,
    option_count: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct DictionarySection {
    path: Option<String>,
}

/// Resolved quiz configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    pub max_kanji_per_part: usize,
    pub hardest_level_parts: usize,
    pub option_count: usize,
    pub dictionary_path: PathBuf,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            max_kanji_per_part: MAX_KANJI_PER_PART_DEFAULT,
            hardest_level_parts: TARGET_PARTS_HARDEST_LEVEL,
            option_count: NUM_QUIZ_OPTIONS,
            dictionary_path: PathBuf::from(DEFAULT_DICTIONARY_PATH),
        }
    }
}

impl QuizConfig {
    /// Load configuration from config.toml, .env and the process environment
    pub fn load() -> Self {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let contents = std::fs::read_to_string("config.toml").ok();
        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Resolve configuration from explicit sources.
    ///
    /// `toml_contents` wins over `env`, which wins over the defaults.
    pub fn from_sources<F>(toml_contents: Option<&str>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match toml_contents.map(toml::from_str::<AppConfig>) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                tracing::warn!("Ignoring invalid config.toml: {}", e);
                AppConfig::default()
            }
            None => AppConfig::default(),
        };
        let quiz = file.quiz.unwrap_or_default();
        let dictionary = file.dictionary.unwrap_or_default();

        let env_usize = |key: &str| env(key).and_then(|v| v.trim().parse::<usize>().ok());
        let defaults = Self::default();

        let max_kanji_per_part = quiz
            .max_kanji_per_part
            .or_else(|| env_usize("KANJI_MAX_PER_PART"))
            .unwrap_or(defaults.max_kanji_per_part)
            .max(1);

        let hardest_level_parts = quiz
            .hardest_level_parts
            .or_else(|| env_usize("KANJI_HARDEST_PARTS"))
            .unwrap_or(defaults.hardest_level_parts)
            .max(1);

        let option_count = quiz
            .option_count
            .or_else(|| env_usize("KANJI_OPTION_COUNT"))
            .unwrap_or(defaults.option_count)
            .max(MIN_QUIZ_OPTIONS);

        let dictionary_path = dictionary
            .path
            .or_else(|| env("KANJI_DICTIONARY_PATH"))
            .map(PathBuf::from)
            .unwrap_or(defaults.dictionary_path);

        tracing::info!(
            "Quiz config: {} kanji per part, {} hardest-level parts, {} options, dictionary {}",
            max_kanji_per_part,
            hardest_level_parts,
            option_count,
            dictionary_path.display()
        );

        Self {
            max_kanji_per_part,
            hardest_level_parts,
            option_count,
            dictionary_path,
        }
    }
}
