//! Test utilities for building dictionaries and entries.
//!
//! Records are built in the same JSON shapes the dictionary file uses and go
//! through the real indexer, so tests exercise the normalization path instead
//! of duplicating it.

use serde_json::{json, Map, Value};

use crate::config::QuizConfig;
use crate::content::{DictionaryIndex, RawDictionary};
use crate::domain::{CharacterEntry, JlptLevel, WordEntry};
use crate::kana;
use crate::quiz::RandomSource;
use crate::state::AppState;

/// Deterministic random source: constant scan offset, identity shuffle.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRandom {
    pub offset: usize,
}

impl RandomSource for FixedRandom {
    fn random_offset(&mut self, len: usize) -> usize {
        if len == 0 { 0 } else { self.offset % len }
    }

    fn shuffle<T>(&mut self, _items: &mut [T]) {}
}

/// A character entry with cleaned readings and a placeholder meaning.
pub fn character(ch: &str, level: JlptLevel, kun: &[&str], on: &[&str]) -> CharacterEntry {
    CharacterEntry {
        character: ch.to_string(),
        level,
        grade: Some(1),
        stroke_count: Some(4),
        meanings: vec!["meaning".to_string()],
        primary_readings: kana::clean_readings(kun.iter().copied()),
        secondary_readings: kana::clean_readings(on.iter().copied()),
    }
}

pub fn word(written: &str, reading: &str, level: JlptLevel, gloss: &str) -> WordEntry {
    WordEntry::new(
        written.to_string(),
        reading.to_string(),
        level,
        vec![vec![gloss.to_string()]],
    )
}

/// Tuple-form character record: grade 1, 4 strokes, meaning "meaning".
pub fn kanji_record(level: i64, kun: &[&str], on: &[&str]) -> Value {
    json!([level, 1, 4, "meaning", kun, on])
}

/// `[written, reading, meaning]` word record
pub fn word_triple(written: &str, reading: &str, meaning: &str) -> Value {
    json!([written, reading, meaning])
}

/// Index a dictionary built from character records and a word section.
///
/// `words` must be a JSON object (level -> groups, or key -> flat list).
pub fn index_with(characters: Vec<(String, Value)>, words: Value) -> DictionaryIndex {
    let characters: Map<String, Value> = characters.into_iter().collect();
    let raw: RawDictionary = serde_json::from_value(json!({"k": characters, "v": words}))
        .expect("test dictionary should deserialize");
    DictionaryIndex::build(&raw).0
}

/// Small N5 dictionary: seven kanji with readings, one without, and a
/// six-word "る" bucket.
pub const SAMPLE_DICTIONARY: &str = r#"{
  "k": {
    "食": [5, 2, 9, "eat; food", ["た.べる", "く.う"], ["ショク"]],
    "山": [5, 1, 3, "mountain", ["やま"], ["サン"]],
    "川": [5, 1, 3, "river", ["かわ"], ["セン"]],
    "木": [5, 1, 4, "tree; wood", ["き"], ["モク", "ボク"]],
    "日": [5, 1, 4, "day; sun", ["ひ"], ["ニチ", "ジツ"]],
    "月": [5, 1, 4, "month; moon", ["つき"], ["ゲツ", "ガツ"]],
    "火": [5, 1, 4, "fire", ["ひ"], ["カ"]],
    "〆": [5, null, 2, "tie", [], []]
  },
  "v": {
    "5": {
      "verbs": [
        ["見る", "みる", "to see"],
        ["来る", "くる", "to come"],
        ["帰る", "かえる", "to return"],
        ["入る", "はいる", "to enter"],
        ["走る", "はしる", "to run"],
        ["切る", "きる", "to cut"]
      ],
      "adjectives": [
        ["高い", "たかい", "tall"]
      ]
    }
  }
}"#;

pub fn sample_index() -> DictionaryIndex {
    let raw = RawDictionary::from_json_str(SAMPLE_DICTIONARY).expect("sample dictionary should parse");
    DictionaryIndex::build(&raw).0
}

/// App state over the sample dictionary with default quiz settings.
pub fn sample_state() -> AppState {
    AppState::new(sample_index(), QuizConfig::default())
}
