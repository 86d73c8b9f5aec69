//! Raw dictionary file loading.
//!
//! The dictionary is a single JSON document with a character section and a
//! word section. Individual records are kept as untyped JSON here so a single
//! bad record can be skipped during indexing instead of failing the whole load.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Parsed but not yet normalized dictionary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDictionary {
    /// Character -> `[level, grade, strokes, "m1;m2", kun[], on[]]` or an object record
    #[serde(default, rename = "k", alias = "kanjis")]
    pub characters: BTreeMap<String, Value>,
    /// Either level -> group -> `[[written, reading, meaning]]`,
    /// or key -> `[{variants, meanings}]`
    #[serde(default, rename = "v", alias = "words")]
    pub words: BTreeMap<String, Value>,
}

impl RawDictionary {
    pub fn from_json_str(content: &str) -> Result<Self, DictionaryError> {
        serde_json::from_str(content)
            .map_err(|e| DictionaryError::SourceUnavailable("<inline>".to_string(), e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.words.is_empty()
    }
}

/// Object form of a character record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCharacterObject {
    pub jlpt: Option<i64>,
    #[serde(default)]
    pub grade: Option<u8>,
    #[serde(default)]
    pub stroke_count: Option<u32>,
    #[serde(default)]
    pub meanings: Vec<String>,
    #[serde(default)]
    pub kun_readings: Vec<String>,
    #[serde(default)]
    pub on_readings: Vec<String>,
}

/// One entry of the flat word shape.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWordEntry {
    #[serde(default)]
    pub variants: Vec<RawVariant>,
    #[serde(default)]
    pub meanings: Vec<RawMeaning>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVariant {
    pub written: Option<String>,
    pub pronounced: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMeaning {
    #[serde(default)]
    pub glosses: Vec<String>,
}

/// Load and parse the dictionary file.
///
/// Any failure here means nothing can be indexed, so it is reported as
/// `SourceUnavailable` and the caller may retry.
pub fn load_dictionary(path: &Path) -> Result<RawDictionary, DictionaryError> {
    if !path.exists() {
        return Err(DictionaryError::SourceUnavailable(
            path.display().to_string(),
            "file not found".to_string(),
        ));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| DictionaryError::SourceUnavailable(path.display().to_string(), e.to_string()))?;

    let raw: RawDictionary = serde_json::from_str(&content)
        .map_err(|e| DictionaryError::SourceUnavailable(path.display().to_string(), e.to_string()))?;

    tracing::debug!(
        "Loaded dictionary {}: {} character records, {} word groups",
        path.display(),
        raw.characters.len(),
        raw.words.len()
    );

    Ok(raw)
}

/// Dictionary errors.
#[derive(Debug, Clone, PartialEq)]
pub enum DictionaryError {
    /// The dictionary could not be read or parsed (source, reason)
    SourceUnavailable(String, String),
    /// A record is missing a required field (record key, reason)
    MalformedRecord(String, String),
}

impl std::fmt::Display for DictionaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DictionaryError::SourceUnavailable(source, err) => {
                write!(f, "Dictionary unavailable ({}): {}", source, err)
            }
            DictionaryError::MalformedRecord(key, err) => {
                write!(f, "Malformed record {}: {}", key, err)
            }
        }
    }
}

impl DictionaryError {
    /// Returns a user-facing error message without exposing filesystem paths.
    pub fn user_message(&self) -> &'static str {
        match self {
            DictionaryError::SourceUnavailable(_, _) => "The dictionary could not be loaded",
            DictionaryError::MalformedRecord(_, _) => "A dictionary entry is incomplete",
        }
    }
}

impl std::error::Error for DictionaryError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_source_unavailable() {
        let temp = TempDir::new().unwrap();
        let err = load_dictionary(&temp.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, DictionaryError::SourceUnavailable(_, _)));
        assert_eq!(err.user_message(), "The dictionary could not be loaded");
    }

    #[test]
    fn test_load_invalid_json_is_source_unavailable() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dict.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_dictionary(&path).unwrap_err();
        assert!(matches!(err, DictionaryError::SourceUnavailable(_, _)));
    }

    #[test]
    fn test_load_short_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dict.json");
        fs::write(
            &path,
            r#"{"k": {"日": [5, 1, 4, "day;sun", ["ひ"], ["ニチ"]]}, "v": {"5": {"a": [["日本", "にほん", "Japan"]]}}}"#,
        )
        .unwrap();

        let raw = load_dictionary(&path).unwrap();
        assert_eq!(raw.characters.len(), 1);
        assert_eq!(raw.words.len(), 1);
    }

    #[test]
    fn test_long_key_aliases() {
        let raw = RawDictionary::from_json_str(r#"{"kanjis": {"日": {"jlpt": 5}}, "words": {}}"#).unwrap();
        assert!(raw.characters.contains_key("日"));
        assert!(!raw.is_empty());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let raw = RawDictionary::from_json_str("{}").unwrap();
        assert!(raw.is_empty());
    }
}
