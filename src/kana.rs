//! Kana and kanji text helpers shared by indexing and distractor selection.
//!
//! Readings arrive in two phonetic systems: kun'yomi in hiragana (possibly
//! carrying an okurigana marker, e.g. `た.べる`) and on'yomi in katakana.

use unicode_normalization::UnicodeNormalization;

/// Separates a kun'yomi stem from its okurigana (`た.べる`)
pub const INFLECTION_MARKER: char = '.';

/// Affix marker found at either end of prefix/suffix readings (`-ちゃん`)
const AFFIX_MARKER: char = '-';

/// Particle that marks a phrase reading rather than a single word
const OBJECT_PARTICLE: char = 'を';

pub fn is_hiragana(c: char) -> bool {
    ('\u{3041}'..='\u{3096}').contains(&c)
}

pub fn is_katakana(c: char) -> bool {
    ('\u{30A1}'..='\u{30F6}').contains(&c)
}

/// CJK unified ideographs in the range the dictionary uses
pub fn is_kanji(c: char) -> bool {
    ('\u{4E00}'..='\u{9FAF}').contains(&c)
}

pub fn contains_kanji(s: &str) -> bool {
    s.chars().any(is_kanji)
}

/// Words mixing katakana and kanji (e.g. "サボる" style slang compounds)
pub fn is_katakana_kanji_compound(s: &str) -> bool {
    s.chars().any(is_katakana) && contains_kanji(s)
}

/// Convert katakana to hiragana, leaving every other character untouched.
pub fn kata_to_hira(s: &str) -> String {
    s.chars()
        .map(|c| {
            if is_katakana(c) {
                char::from_u32(c as u32 - 0x60).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// The maximal trailing run of hiragana in a written form.
///
/// Words sharing this ending share grammatical shape (same conjugation tail),
/// which makes them convincing distractors for each other.
pub fn okurigana_ending(word: &str) -> String {
    let mut tail: Vec<char> = word.chars().rev().take_while(|c| is_hiragana(*c)).collect();
    tail.reverse();
    tail.into_iter().collect()
}

/// NFC-normalize and trim a dictionary string.
pub fn normalize(s: &str) -> String {
    s.trim().nfc().collect()
}

/// Normalize raw readings: strip one leading and one trailing affix marker,
/// drop empties, and dedupe while keeping first-seen order.
pub fn clean_readings<I, S>(readings: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cleaned: Vec<String> = Vec::new();
    for raw in readings {
        let normalized = normalize(raw.as_ref());
        let stripped = normalized.strip_prefix(AFFIX_MARKER).unwrap_or(&normalized);
        let stripped = stripped.strip_suffix(AFFIX_MARKER).unwrap_or(stripped);
        if !stripped.is_empty() && !cleaned.iter().any(|r| r == stripped) {
            cleaned.push(stripped.to_string());
        }
    }
    cleaned
}

/// Reading up to the inflection marker: `た.べる` -> `た`
pub fn reading_stem(reading: &str) -> &str {
    reading.split(INFLECTION_MARKER).next().unwrap_or(reading)
}

/// Reading with the inflection marker removed: `た.べる` -> `たべる`
pub fn strip_marker(reading: &str) -> String {
    reading.replacen(INFLECTION_MARKER, "", 1)
}

/// Length in characters, ignoring the inflection marker
pub fn reading_length(reading: &str) -> usize {
    strip_marker(reading).chars().count()
}

/// Readings with whitespace or the object particle are phrases, not quiz answers.
pub fn is_quizzable_reading(reading: &str) -> bool {
    !reading.chars().any(|c| c.is_whitespace() || c == OBJECT_PARTICLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kata_to_hira() {
        assert_eq!(kata_to_hira("ショク"), "しょく");
        assert_eq!(kata_to_hira("ニチ"), "にち");
        // Long vowel mark is outside the converted range
        assert_eq!(kata_to_hira("コーヒー"), "こーひー");
        assert_eq!(kata_to_hira("abc"), "abc");
    }

    #[test]
    fn test_okurigana_ending() {
        assert_eq!(okurigana_ending("食べる"), "べる");
        assert_eq!(okurigana_ending("高い"), "い");
        assert_eq!(okurigana_ending("学校"), "");
        assert_eq!(okurigana_ending(""), "");
        // Only the trailing run counts
        assert_eq!(okurigana_ending("お茶"), "");
    }

    #[test]
    fn test_clean_readings_strips_affixes_and_dedupes() {
        let raw = vec!["-ちゃん", "た.べる", "た.べる", "", "-", "く-"];
        assert_eq!(clean_readings(raw), vec!["ちゃん", "た.べる", "く"]);
    }

    #[test]
    fn test_clean_readings_only_strips_one_marker_each_side() {
        assert_eq!(clean_readings(["--か--"]), vec!["-か-"]);
    }

    #[test]
    fn test_reading_stem_and_length() {
        assert_eq!(reading_stem("た.べる"), "た");
        assert_eq!(reading_stem("やま"), "やま");
        assert_eq!(strip_marker("た.べる"), "たべる");
        assert_eq!(reading_length("た.べる"), 3);
        assert_eq!(reading_length("ショク"), 3);
    }

    #[test]
    fn test_is_quizzable_reading() {
        assert!(is_quizzable_reading("たべる"));
        assert!(!is_quizzable_reading("きを つける"));
        assert!(!is_quizzable_reading("きをつける"));
        assert!(!is_quizzable_reading("き\u{3000}つける"));
    }

    #[test]
    fn test_script_detection() {
        assert!(contains_kanji("食べる"));
        assert!(!contains_kanji("たべる"));
        assert!(is_katakana_kanji_compound("サボ日"));
        assert!(!is_katakana_kanji_compound("日本"));
    }
}
