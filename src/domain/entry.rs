use serde::{Deserialize, Serialize};

use super::JlptLevel;
use crate::kana;

/// Meanings shown with a character prompt
const CHARACTER_GLOSS_MEANINGS: usize = 3;

/// A single kanji with its normalized readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterEntry {
  pub character: String,
  pub level: JlptLevel,
  /// School grade (None for kanji taught outside the grade system)
  pub grade: Option<u8>,
  pub stroke_count: Option<u32>,
  pub meanings: Vec<String>,
  /// Kun'yomi in hiragana, may contain the inflection marker
  pub primary_readings: Vec<String>,
  /// On'yomi in katakana
  pub secondary_readings: Vec<String>,
}

impl CharacterEntry {
  pub fn gloss(&self) -> String {
    self
      .meanings
      .iter()
      .take(CHARACTER_GLOSS_MEANINGS)
      .map(String::as_str)
      .collect::<Vec<_>>()
      .join("; ")
  }
}

/// A vocabulary word with its full reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
  pub written: String,
  pub reading: String,
  pub level: JlptLevel,
  /// One list of short meanings per sense
  pub glosses: Vec<Vec<String>>,
  /// Trailing hiragana of the written form (phonetic-ending class)
  pub ending: String,
}

impl WordEntry {
  pub fn new(written: String, reading: String, level: JlptLevel, glosses: Vec<Vec<String>>) -> Self {
    let ending = kana::okurigana_ending(&written);
    Self {
      written,
      reading,
      level,
      glosses,
      ending,
    }
  }

  pub fn reading_len(&self) -> usize {
    self.reading.chars().count()
  }

  pub fn first_gloss(&self) -> Option<&str> {
    self.glosses.first().and_then(|g| g.first()).map(String::as_str)
  }

  /// First sense's meanings joined for display
  pub fn gloss(&self) -> String {
    self.glosses.first().map(|g| g.join(", ")).unwrap_or_default()
  }
}
