use serde::{Deserialize, Serialize};

use super::{JlptLevel, WordEntry};

/// What the learner is quizzed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
  /// Single kanji prompt, answer is a reading
  Kanji,
  /// Word prompt, answer is the full reading
  #[serde(alias = "vocab", alias = "kotoba")]
  Vocabulary,
}

impl QuizMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Kanji => "kanji",
      Self::Vocabulary => "vocabulary",
    }
  }
}

/// One answer button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
  pub value: String,
  /// Kun'yomi with the marker removed (kanji mode only)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub display_primary: Option<String>,
  /// On'yomi in katakana (kanji mode only)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub display_secondary: Option<String>,
}

impl QuizOption {
  pub fn plain(value: impl Into<String>) -> Self {
    Self {
      value: value.into(),
      display_primary: None,
      display_secondary: None,
    }
  }
}

/// One question in a session queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizItem {
  /// The kanji or word shown to the learner
  pub prompt: String,
  pub correct_value: String,
  /// Reading as it appears in context (okurigana attached)
  pub contextual_reading: String,
  pub gloss: String,
  pub options: Vec<QuizOption>,
}

impl QuizItem {
  pub fn has_option(&self, value: &str) -> bool {
    self.options.iter().any(|o| o.value == value)
  }
}

/// A bounded study unit within one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelPart {
  pub id: String,
  pub level: JlptLevel,
  /// 1-based position within the level
  pub part_index: usize,
  pub total_parts: usize,
  pub characters: Vec<String>,
  pub words: Vec<WordEntry>,
}

impl LevelPart {
  pub fn summary(&self) -> LevelPartSummary {
    LevelPartSummary {
      id: self.id.clone(),
      display_name: self.level.display_name(),
      original_level: self.level,
      character_count: self.characters.len(),
      word_count: self.words.len(),
      part_index: self.part_index,
      total_parts: self.total_parts,
    }
  }
}

/// Menu entry for a part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelPartSummary {
  pub id: String,
  pub display_name: String,
  pub original_level: JlptLevel,
  pub character_count: usize,
  pub word_count: usize,
  pub part_index: usize,
  pub total_parts: usize,
}

/// Parts of one level, grouped for menus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelGroup {
  pub level: JlptLevel,
  pub display_name: String,
  pub parts: Vec<LevelPartSummary>,
}

/// Outcome of one correctly answered item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
  pub key: String,
  pub elapsed_ms: u64,
  /// Wrong attempts before the correct answer
  pub wrong: u32,
  pub gloss: String,
}
