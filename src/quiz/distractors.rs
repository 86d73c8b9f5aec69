//! Similarity-based distractor selection.
//!
//! Wrong options are chosen to look like the right one, so a question tests
//! recognition rather than elimination.
//!
//! Kanji mode ranks candidates into three tiers by reading length:
//! 1. **Perfect**: kun'yomi and on'yomi lengths both match the target
//! 2. **Strong**: exact length match in the reading system of the answer
//! 3. **Loose**: within one character in either system
//!
//! Vocabulary mode draws from words sharing the target's okurigana ending,
//! preferring equal reading length, then a length off by one.

use std::collections::{HashMap, HashSet};

use super::random::RandomSource;
use crate::domain::{CharacterEntry, QuizOption, WordEntry};
use crate::kana;

/// Which reading system supplied an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingSystem {
  /// Kun'yomi
  Primary,
  /// On'yomi
  Secondary,
}

/// How closely a candidate's readings resemble the target's
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SimilarityTier {
  Perfect,
  Strong,
  Loose,
}

/// Answer value and display forms derived from a character's first readings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterReading {
  /// Kun'yomi stem, or the on'yomi converted to hiragana
  pub value: String,
  pub system: ReadingSystem,
  /// Full reading as displayed after answering
  pub contextual: String,
  pub primary_display: Option<String>,
  pub secondary_display: Option<String>,
  /// Kun'yomi length without the marker (0 when absent)
  pub primary_len: usize,
  /// On'yomi length (0 when absent)
  pub secondary_len: usize,
}

impl CharacterReading {
  /// None when the character has no usable reading.
  pub fn of(entry: &CharacterEntry) -> Option<Self> {
    let primary = entry.primary_readings.first();
    let secondary = entry.secondary_readings.first();

    // A kun'yomi with an empty stem cannot be the answer; use the on'yomi instead
    let kun = primary.filter(|kun| !kana::reading_stem(kun).is_empty());
    let (value, system, contextual) = match (kun, secondary) {
      (Some(kun), _) => (kana::reading_stem(kun).to_string(), ReadingSystem::Primary, kana::strip_marker(kun)),
      (None, Some(on)) => (kana::kata_to_hira(on), ReadingSystem::Secondary, on.clone()),
      (None, None) => return None,
    };
    if value.is_empty() {
      return None;
    }

    Some(Self {
      value,
      system,
      contextual,
      primary_display: primary.map(|kun| kana::strip_marker(kun)),
      secondary_display: secondary.cloned(),
      primary_len: primary.map_or(0, |kun| kana::reading_length(kun)),
      secondary_len: secondary.map_or(0, |on| kana::reading_length(on)),
    })
  }

  pub fn to_option(&self) -> QuizOption {
    QuizOption {
      value: self.value.clone(),
      display_primary: self.primary_display.clone(),
      display_secondary: self.secondary_display.clone(),
    }
  }

  /// Tier of `candidate` relative to this (target) reading, None if too different
  pub fn similarity(&self, candidate: &CharacterReading) -> Option<SimilarityTier> {
    let primary_diff = self.primary_len.abs_diff(candidate.primary_len);
    let secondary_diff = self.secondary_len.abs_diff(candidate.secondary_len);

    let answer_system_diff = match self.system {
      ReadingSystem::Primary => primary_diff,
      ReadingSystem::Secondary => secondary_diff,
    };

    if primary_diff == 0 && secondary_diff == 0 {
      Some(SimilarityTier::Perfect)
    } else if answer_system_diff == 0 {
      Some(SimilarityTier::Strong)
    } else if primary_diff <= 1 || secondary_diff <= 1 {
      Some(SimilarityTier::Loose)
    } else {
      None
    }
  }
}

/// Build the option set for a kanji question.
///
/// `pool` is the level's characters; the target itself is skipped. Returns
/// None when the target has no reading or the pool cannot supply enough
/// distinct distractors.
pub fn select_character_options<R: RandomSource>(
  target: &CharacterEntry,
  pool: &[&CharacterEntry],
  option_count: usize,
  rng: &mut R,
) -> Option<Vec<QuizOption>> {
  let answer = CharacterReading::of(target)?;
  let needed = option_count.saturating_sub(1);

  let candidates: Vec<&CharacterEntry> = pool
    .iter()
    .copied()
    .filter(|c| c.character != target.character)
    .collect();

  let mut distractors = tiered_distractors(&answer, &candidates, needed, rng);

  // Last resort: any distinct reading, in pool order
  if distractors.len() < needed {
    for candidate in &candidates {
      if distractors.len() >= needed {
        break;
      }
      let Some(reading) = CharacterReading::of(candidate) else {
        continue;
      };
      if reading.value == answer.value || distractors.iter().any(|d| d.value == reading.value) {
        continue;
      }
      distractors.push(reading);
    }
  }

  if distractors.len() < needed {
    return None;
  }

  let mut options: Vec<QuizOption> = std::iter::once(answer.to_option())
    .chain(distractors.iter().map(CharacterReading::to_option))
    .collect();
  rng.shuffle(&mut options);
  Some(options)
}

/// Scan candidates once from a random offset, ranking each distinct value by
/// the best tier any candidate gives it, and return up to `needed` readings
/// drained Perfect, then Strong, then Loose.
fn tiered_distractors<R: RandomSource>(
  answer: &CharacterReading,
  candidates: &[&CharacterEntry],
  needed: usize,
  rng: &mut R,
) -> Vec<CharacterReading> {
  if candidates.is_empty() || needed == 0 {
    return Vec::new();
  }

  // (tier, reading) per value, in first-seen scan order
  let mut ranked: Vec<(SimilarityTier, CharacterReading)> = Vec::new();
  let mut positions: HashMap<String, usize> = HashMap::new();
  let mut perfect = 0;

  let start = rng.random_offset(candidates.len());
  for i in 0..candidates.len() {
    let candidate = candidates[(start + i) % candidates.len()];
    let Some(reading) = CharacterReading::of(candidate) else {
      continue;
    };
    if reading.value == answer.value {
      continue;
    }
    let Some(tier) = answer.similarity(&reading) else {
      continue;
    };

    match positions.get(&reading.value) {
      Some(&pos) => {
        if tier >= ranked[pos].0 {
          continue;
        }
        ranked[pos] = (tier, reading);
      }
      None => {
        positions.insert(reading.value.clone(), ranked.len());
        ranked.push((tier, reading));
      }
    }
    if tier == SimilarityTier::Perfect {
      perfect += 1;
      if perfect >= needed {
        break;
      }
    }
  }

  // Stable: scan order is kept within a tier
  ranked.sort_by_key(|(tier, _)| *tier);
  ranked.into_iter().map(|(_, reading)| reading).take(needed).collect()
}

/// Build the option set for a vocabulary question.
///
/// `bucket` is the target's ending class within its level. Returns None when
/// fewer than `option_count - 1` distinct other readings exist.
pub fn select_word_options<R: RandomSource>(
  target: &WordEntry,
  bucket: &[WordEntry],
  option_count: usize,
  rng: &mut R,
) -> Option<Vec<QuizOption>> {
  let needed = option_count.saturating_sub(1);
  let target_len = target.reading_len();

  let mut seen: HashSet<&str> = HashSet::new();
  let readings: Vec<&WordEntry> = bucket
    .iter()
    .filter(|w| w.reading != target.reading && seen.insert(w.reading.as_str()))
    .collect();

  let mut preferred: Vec<&WordEntry> = readings.iter().copied().filter(|w| w.reading_len() == target_len).collect();
  if preferred.len() < needed {
    preferred.extend(readings.iter().copied().filter(|w| w.reading_len().abs_diff(target_len) == 1));
  }
  if preferred.len() < needed {
    preferred = readings;
  }
  if preferred.len() < needed {
    return None;
  }

  rng.shuffle(&mut preferred);
  let mut options: Vec<QuizOption> = std::iter::once(QuizOption::plain(target.reading.clone()))
    .chain(preferred.iter().take(needed).map(|w| QuizOption::plain(w.reading.clone())))
    .collect();
  rng.shuffle(&mut options);
  Some(options)
}
