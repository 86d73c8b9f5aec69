//! Normalized, immutable view of a raw dictionary.
//!
//! Characters are keyed by the character itself. Words are grouped by level
//! and then by their phonetic-ending class, which is the pool vocabulary
//! distractors are drawn from.

use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

use super::dictionary::{DictionaryError, RawCharacterObject, RawDictionary, RawWordEntry};
use crate::config::{self, UNKNOWN_GRADE, UNKNOWN_STROKE_COUNT};
use crate::domain::{CharacterEntry, JlptLevel, WordEntry};
use crate::kana;

/// Word buckets of one level, keyed by phonetic-ending class
pub type EndingBuckets = BTreeMap<String, Vec<WordEntry>>;

/// Progress reported between indexing batches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexProgress {
    /// Character section finished
    Characters { indexed: usize },
    /// One level of the grouped word shape finished
    WordLevel { level: JlptLevel, indexed: usize },
    /// The flat word shape finished
    FlatWords { indexed: usize },
}

/// What indexing skipped, and why
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexReport {
    /// Records missing a required field
    pub malformed: Vec<DictionaryError>,
    /// Words filtered out (phrase readings, unlevelled or too complex)
    pub rejected_words: usize,
    /// Words dropped as duplicates of an earlier entry
    pub duplicate_words: usize,
}

/// Queryable dictionary, built once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct DictionaryIndex {
    characters: BTreeMap<String, CharacterEntry>,
    words: BTreeMap<JlptLevel, EndingBuckets>,
}

impl DictionaryIndex {
    /// Build an index, skipping malformed records.
    pub fn build(raw: &RawDictionary) -> (Self, IndexReport) {
        Self::build_with_progress(raw, |_| {})
    }

    /// Build an index, calling `on_progress` after each batch.
    pub fn build_with_progress<F>(raw: &RawDictionary, mut on_progress: F) -> (Self, IndexReport)
    where
        F: FnMut(IndexProgress),
    {
        let mut index = Self::default();
        let mut report = IndexReport::default();

        for (key, value) in &raw.characters {
            match parse_character(key, value) {
                Ok(entry) => {
                    index.characters.insert(entry.character.clone(), entry);
                }
                Err(e) => {
                    tracing::debug!("Skipping character: {}", e);
                    report.malformed.push(e);
                }
            }
        }
        on_progress(IndexProgress::Characters {
            indexed: index.characters.len(),
        });

        let mut seen: HashSet<(String, String, String)> = HashSet::new();
        let mut flat_indexed = 0;
        let mut saw_flat = false;

        for (key, value) in &raw.words {
            match value {
                Value::Object(groups) => {
                    let Some(level) = JlptLevel::from_str(key) else {
                        report.malformed.push(DictionaryError::MalformedRecord(
                            key.clone(),
                            "word group key is not a level".to_string(),
                        ));
                        continue;
                    };
                    let mut indexed = 0;
                    for (group, entries) in groups {
                        let Value::Array(entries) = entries else {
                            report.malformed.push(DictionaryError::MalformedRecord(
                                format!("{}/{}", key, group),
                                "word group is not a list".to_string(),
                            ));
                            continue;
                        };
                        for (i, entry) in entries.iter().enumerate() {
                            let record_key = format!("{}/{}/{}", key, group, i);
                            match parse_word_triple(&record_key, entry, level) {
                                Ok(word) => {
                                    if index.insert_word(word, &mut seen, &mut report) {
                                        indexed += 1;
                                    }
                                }
                                Err(e) => {
                                    tracing::debug!("Skipping word: {}", e);
                                    report.malformed.push(e);
                                }
                            }
                        }
                    }
                    on_progress(IndexProgress::WordLevel { level, indexed });
                }
                Value::Array(entries) => {
                    saw_flat = true;
                    for (i, entry) in entries.iter().enumerate() {
                        let record_key = format!("{}/{}", key, i);
                        match index.parse_flat_word(&record_key, entry) {
                            Ok(Some(word)) => {
                                if index.insert_word(word, &mut seen, &mut report) {
                                    flat_indexed += 1;
                                }
                            }
                            Ok(None) => report.rejected_words += 1,
                            Err(e) => {
                                tracing::debug!("Skipping word: {}", e);
                                report.malformed.push(e);
                            }
                        }
                    }
                }
                _ => report.malformed.push(DictionaryError::MalformedRecord(
                    key.clone(),
                    "word section entry is neither a level map nor a list".to_string(),
                )),
            }
        }
        if saw_flat {
            on_progress(IndexProgress::FlatWords {
                indexed: flat_indexed,
            });
        }

        tracing::info!(
            "Indexed {} characters and {} words ({} malformed, {} rejected, {} duplicate)",
            index.character_count(),
            index.word_count(),
            report.malformed.len(),
            report.rejected_words,
            report.duplicate_words
        );

        (index, report)
    }

    /// Insert a word unless its reading is a phrase or it duplicates an earlier entry.
    fn insert_word(
        &mut self,
        word: WordEntry,
        seen: &mut HashSet<(String, String, String)>,
        report: &mut IndexReport,
    ) -> bool {
        if !kana::is_quizzable_reading(&word.reading) {
            report.rejected_words += 1;
            return false;
        }

        let key = (
            word.written.clone(),
            word.reading.clone(),
            word.first_gloss().unwrap_or_default().to_string(),
        );
        if !seen.insert(key) {
            report.duplicate_words += 1;
            return false;
        }

        self.words
            .entry(word.level)
            .or_default()
            .entry(word.ending.clone())
            .or_default()
            .push(word);
        true
    }

    /// Parse a flat-shape word, deriving its level from its kanji.
    ///
    /// Returns `Ok(None)` for well-formed words that are filtered out.
    fn parse_flat_word(&self, key: &str, value: &Value) -> Result<Option<WordEntry>, DictionaryError> {
        let entry: RawWordEntry = serde_json::from_value(value.clone())
            .map_err(|e| DictionaryError::MalformedRecord(key.to_string(), e.to_string()))?;

        let variant = entry
            .variants
            .first()
            .ok_or_else(|| DictionaryError::MalformedRecord(key.to_string(), "no variants".to_string()))?;
        let written = variant
            .written
            .as_deref()
            .map(kana::normalize)
            .filter(|w| !w.is_empty())
            .ok_or_else(|| DictionaryError::MalformedRecord(key.to_string(), "missing written form".to_string()))?;
        let reading = variant
            .pronounced
            .as_deref()
            .map(kana::normalize)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| DictionaryError::MalformedRecord(key.to_string(), "missing reading".to_string()))?;

        let glosses: Vec<Vec<String>> = entry
            .meanings
            .into_iter()
            .map(|m| m.glosses.iter().map(|g| kana::normalize(g)).filter(|g| !g.is_empty()).collect::<Vec<_>>())
            .filter(|g| !g.is_empty())
            .collect();
        if glosses.is_empty() {
            return Ok(None);
        }

        if !kana::contains_kanji(&written) || kana::is_katakana_kanji_compound(&written) || written == reading {
            return Ok(None);
        }

        let Some(level) = self.word_level(&written) else {
            return Ok(None);
        };
        if !self.meets_complexity(&written, level) {
            return Ok(None);
        }

        Ok(Some(WordEntry::new(written, reading, level, glosses)))
    }

    /// Hardest level among a word's kanji; None if any kanji is unknown.
    fn word_level(&self, written: &str) -> Option<JlptLevel> {
        let mut level: Option<JlptLevel> = None;
        for c in written.chars().filter(|c| kana::is_kanji(*c)) {
            let entry = self.characters.get(c.to_string().as_str())?;
            level = Some(level.map_or(entry.level, |l| l.hardest_of(entry.level)));
        }
        level
    }

    fn meets_complexity(&self, written: &str, level: JlptLevel) -> bool {
        let limits = config::word_complexity_limits(level);
        let mut total_strokes = 0;

        for c in written.chars() {
            let Some(entry) = self.characters.get(c.to_string().as_str()) else {
                continue;
            };
            let strokes = entry.stroke_count.unwrap_or(UNKNOWN_STROKE_COUNT);
            if strokes > limits.max_strokes_per_kanji {
                return false;
            }
            total_strokes += strokes;

            if entry.grade.unwrap_or(UNKNOWN_GRADE) > limits.max_grade_per_kanji {
                return false;
            }
        }

        total_strokes <= limits.max_total_strokes
    }

    pub fn character(&self, character: &str) -> Option<&CharacterEntry> {
        self.characters.get(character)
    }

    /// Characters of a level in lexicographic order
    pub fn characters_in_level(&self, level: JlptLevel) -> Vec<&str> {
        // BTreeMap iteration is already sorted by key
        self.characters
            .values()
            .filter(|c| c.level == level)
            .map(|c| c.character.as_str())
            .collect()
    }

    /// All ending buckets of a level
    pub fn word_buckets(&self, level: JlptLevel) -> Option<&EndingBuckets> {
        self.words.get(&level)
    }

    /// Words of a level sharing an ending class
    pub fn bucket(&self, level: JlptLevel, ending: &str) -> &[WordEntry] {
        self.words
            .get(&level)
            .and_then(|buckets| buckets.get(ending))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    pub fn word_count(&self) -> usize {
        self.words.values().flat_map(|b| b.values()).map(Vec::len).sum()
    }
}

/// Parse a character record in either tuple or object form.
///
/// A missing or non-integer level makes the record malformed.
fn parse_character(key: &str, value: &Value) -> Result<CharacterEntry, DictionaryError> {
    let character = kana::normalize(key);
    if character.is_empty() {
        return Err(DictionaryError::MalformedRecord(key.to_string(), "empty character".to_string()));
    }

    let (level, grade, stroke_count, meanings, kun, on) = match value {
        Value::Array(fields) => {
            let level = fields.first().and_then(Value::as_i64);
            let grade = fields.get(1).and_then(Value::as_u64).and_then(|g| u8::try_from(g).ok());
            let strokes = fields.get(2).and_then(Value::as_u64).and_then(|s| u32::try_from(s).ok());
            let meanings: Vec<String> = fields
                .get(3)
                .and_then(Value::as_str)
                .map(|m| m.split(';').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect())
                .unwrap_or_default();
            (level, grade, strokes, meanings, string_list(fields.get(4)), string_list(fields.get(5)))
        }
        Value::Object(_) => {
            let obj: RawCharacterObject = serde_json::from_value(value.clone())
                .map_err(|e| DictionaryError::MalformedRecord(key.to_string(), e.to_string()))?;
            let meanings: Vec<String> = obj.meanings.iter().map(|m| m.trim().to_string()).filter(|m| !m.is_empty()).collect();
            (obj.jlpt, obj.grade, obj.stroke_count, meanings, obj.kun_readings, obj.on_readings)
        }
        _ => {
            return Err(DictionaryError::MalformedRecord(
                key.to_string(),
                "character record is neither a list nor an object".to_string(),
            ));
        }
    };

    let level =
        level.ok_or_else(|| DictionaryError::MalformedRecord(key.to_string(), "missing level".to_string()))?;
    let level = JlptLevel::from_number(level)
        .ok_or_else(|| DictionaryError::MalformedRecord(key.to_string(), format!("unknown level {}", level)))?;

    Ok(CharacterEntry {
        character,
        level,
        grade,
        stroke_count,
        meanings,
        primary_readings: kana::clean_readings(kun),
        secondary_readings: kana::clean_readings(on),
    })
}

/// Strings of a JSON list, ignoring non-string members
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default()
}

/// Parse a `[written, reading, meaning]` triple from the grouped word shape.
fn parse_word_triple(key: &str, value: &Value, level: JlptLevel) -> Result<WordEntry, DictionaryError> {
    let fields = value
        .as_array()
        .ok_or_else(|| DictionaryError::MalformedRecord(key.to_string(), "word is not a list".to_string()))?;

    let field = |i: usize| fields.get(i).and_then(Value::as_str).map(kana::normalize).filter(|s| !s.is_empty());

    let written =
        field(0).ok_or_else(|| DictionaryError::MalformedRecord(key.to_string(), "missing written form".to_string()))?;
    let reading =
        field(1).ok_or_else(|| DictionaryError::MalformedRecord(key.to_string(), "missing reading".to_string()))?;
    let glosses = field(2).map(|m| vec![vec![m]]).unwrap_or_default();

    Ok(WordEntry::new(written, reading, level, glosses))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawDictionary {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_character_tuple_is_normalized() {
        let (index, report) = DictionaryIndex::build(&raw(json!({
            "k": {"食": [4, 2, 9, "eat; food ;", ["-く.う", "く.う", "た.べる"], ["ショク", "ジキ"]]}
        })));

        assert!(report.malformed.is_empty());
        let entry = index.character("食").unwrap();
        assert_eq!(entry.level, JlptLevel::N4);
        assert_eq!(entry.grade, Some(2));
        assert_eq!(entry.stroke_count, Some(9));
        assert_eq!(entry.meanings, vec!["eat", "food"]);
        assert_eq!(entry.primary_readings, vec!["く.う", "た.べる"]);
        assert_eq!(entry.secondary_readings, vec!["ショク", "ジキ"]);
    }

    #[test]
    fn test_character_object_form() {
        let (index, _) = DictionaryIndex::build(&raw(json!({
            "kanjis": {"山": {"jlpt": 5, "grade": 1, "stroke_count": 3, "meanings": ["mountain"],
                               "kun_readings": ["やま"], "on_readings": ["サン"]}}
        })));

        let entry = index.character("山").unwrap();
        assert_eq!(entry.level, JlptLevel::N5);
        assert_eq!(entry.gloss(), "mountain");
    }

    #[test]
    fn test_malformed_characters_are_skipped() {
        let (index, report) = DictionaryIndex::build(&raw(json!({
            "k": {
                "山": [5, 1, 3, "mountain", ["やま"], ["サン"]],
                "川": [7, 1, 3, "river", ["かわ"], ["セン"]],
                "火": "fire",
                "水": [null, 1, 4, "water", ["みず"], ["スイ"]],
                "木": ["5", 1, 4, "tree", ["き"], ["モク"]],
                "金": {"grade": 1, "kun_readings": ["かね"], "on_readings": ["キン"]}
            }
        })));

        assert_eq!(index.character_count(), 1);
        assert!(index.character("山").is_some());
        assert_eq!(report.malformed.len(), 5);
        assert!(index.character("水").is_none());

        let missing_level: Vec<&DictionaryError> = report
            .malformed
            .iter()
            .filter(|e| matches!(e, DictionaryError::MalformedRecord(_, reason) if reason == "missing level"))
            .collect();
        assert_eq!(missing_level.len(), 3);
        assert!(missing_level.contains(&&DictionaryError::MalformedRecord("水".to_string(), "missing level".to_string())));
    }

    #[test]
    fn test_grouped_words_bucket_by_ending() {
        let (index, report) = DictionaryIndex::build(&raw(json!({
            "v": {"5": {"verbs": [
                ["食べる", "たべる", "to eat"],
                ["調べる", "しらべる", "to investigate"],
                ["高い", "たかい", "tall"]
            ]}}
        })));

        assert!(report.malformed.is_empty());
        assert_eq!(index.bucket(JlptLevel::N5, "べる").len(), 2);
        assert_eq!(index.bucket(JlptLevel::N5, "い").len(), 1);
        assert_eq!(index.bucket(JlptLevel::N4, "べる").len(), 0);
        assert_eq!(index.word_count(), 3);
    }

    #[test]
    fn test_phrase_readings_and_duplicates_are_dropped() {
        let (index, report) = DictionaryIndex::build(&raw(json!({
            "v": {"4": {"a": [
                ["気を付ける", "きをつける", "to be careful"],
                ["お早う", "お はよう", "good morning"],
                ["始める", "はじめる", "to begin"],
                ["始める", "はじめる", "to begin"],
                ["始める", "はじめる", "to start"]
            ]}}
        })));

        assert_eq!(report.rejected_words, 2);
        assert_eq!(report.duplicate_words, 1);
        assert_eq!(index.bucket(JlptLevel::N4, "める").len(), 2);
    }

    #[test]
    fn test_word_missing_reading_is_malformed() {
        let (index, report) = DictionaryIndex::build(&raw(json!({
            "v": {"5": {"a": [["食べる"], ["高い", "たかい"]]}}
        })));

        assert_eq!(report.malformed.len(), 1);
        assert_eq!(index.word_count(), 1);
        assert_eq!(index.bucket(JlptLevel::N5, "い")[0].glosses.len(), 0);
    }

    #[test]
    fn test_flat_words_take_hardest_kanji_level() {
        let (index, report) = DictionaryIndex::build(&raw(json!({
            "k": {
                "日": [5, 1, 4, "day", ["ひ"], ["ニチ"]],
                "本": [5, 1, 5, "book", ["もと"], ["ホン"]],
                "化": [3, 3, 4, "change", ["ば.ける"], ["カ"]]
            },
            "words": {
                "日本": [{"variants": [{"written": "日本", "pronounced": "にほん"}],
                          "meanings": [{"glosses": ["Japan"]}]}],
                "日化": [{"variants": [{"written": "日化", "pronounced": "にっか"}],
                          "meanings": [{"glosses": ["daily change"]}]}]
            }
        })));

        assert!(report.malformed.is_empty());
        assert_eq!(index.bucket(JlptLevel::N5, "").len(), 1);
        assert_eq!(index.bucket(JlptLevel::N3, "")[0].written, "日化");
    }

    #[test]
    fn test_flat_words_filters() {
        let (index, report) = DictionaryIndex::build(&raw(json!({
            "k": {
                "日": [5, 1, 4, "day", ["ひ"], ["ニチ"]],
                "曜": [5, 2, 18, "weekday", [], ["ヨウ"]]
            },
            "words": {
                "ひらがな": [{"variants": [{"written": "ひらがな", "pronounced": "ひらがな"}],
                             "meanings": [{"glosses": ["hiragana"]}]}],
                "日曜": [{"variants": [{"written": "日曜", "pronounced": "にちよう"}],
                          "meanings": [{"glosses": ["Sunday"]}]}],
                "日ヒ": [{"variants": [{"written": "日ヒ", "pronounced": "ひひ"}],
                          "meanings": [{"glosses": ["?"]}]}],
                "月": [{"variants": [{"written": "月", "pronounced": "つき"}],
                        "meanings": [{"glosses": ["moon"]}]}],
                "日": [{"variants": [], "meanings": [{"glosses": ["sun"]}]}]
            }
        })));

        // No kanji, too complex, katakana compound, unknown kanji
        assert_eq!(report.rejected_words, 4);
        // No variants
        assert_eq!(report.malformed.len(), 1);
        assert_eq!(index.word_count(), 0);
    }

    #[test]
    fn test_progress_is_reported_per_batch() {
        let mut events = Vec::new();
        DictionaryIndex::build_with_progress(
            &raw(json!({
                "k": {"山": [5, 1, 3, "mountain", ["やま"], ["サン"]]},
                "v": {
                    "5": {"a": [["高い", "たかい", "tall"]]},
                    "4": {"a": [["始める", "はじめる", "to begin"]]}
                }
            })),
            |p| events.push(p),
        );

        assert_eq!(
            events,
            vec![
                IndexProgress::Characters { indexed: 1 },
                IndexProgress::WordLevel { level: JlptLevel::N4, indexed: 1 },
                IndexProgress::WordLevel { level: JlptLevel::N5, indexed: 1 },
            ]
        );
    }

    #[test]
    fn test_characters_in_level_sorted() {
        let (index, _) = DictionaryIndex::build(&raw(json!({
            "k": {
                "山": [5, 1, 3, "mountain", ["やま"], ["サン"]],
                "一": [5, 1, 1, "one", ["ひと"], ["イチ"]],
                "化": [3, 3, 4, "change", ["ば.ける"], ["カ"]]
            }
        })));

        assert_eq!(index.characters_in_level(JlptLevel::N5), vec!["一", "山"]);
        assert_eq!(index.characters_in_level(JlptLevel::N1), Vec::<&str>::new());
    }
}
