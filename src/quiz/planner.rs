//! Splits each level into ordered, bounded-size study parts.
//!
//! Planning is deterministic: the same index and config always yield the same
//! parts, so "Part 3 of N5" refers to the same characters across sessions.

use crate::config::QuizConfig;
use crate::content::{DictionaryIndex, EndingBuckets};
use crate::domain::{JlptLevel, LevelGroup, LevelPart, WordEntry};

/// Progress reported after each planned level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanProgress {
  pub level: JlptLevel,
  pub parts: usize,
}

/// Plan parts for every level, easiest level first.
pub fn plan(index: &DictionaryIndex, config: &QuizConfig) -> Vec<LevelPart> {
  plan_with_progress(index, config, |_| {})
}

/// Plan parts, calling `on_progress` after each level.
pub fn plan_with_progress<F>(index: &DictionaryIndex, config: &QuizConfig, mut on_progress: F) -> Vec<LevelPart>
where
  F: FnMut(PlanProgress),
{
  let mut parts = Vec::new();

  for level in JlptLevel::ALL {
    let level_parts = plan_level(index, config, level);
    if level_parts.is_empty() {
      continue;
    }
    on_progress(PlanProgress {
      level,
      parts: level_parts.len(),
    });
    parts.extend(level_parts);
  }

  tracing::info!("Planned {} parts", parts.len());
  parts
}

/// Characters per part for a level holding `count` characters
pub fn part_capacity(level: JlptLevel, count: usize, config: &QuizConfig) -> usize {
  if level.is_hardest() {
    count.div_ceil(config.hardest_level_parts.max(1)).max(1)
  } else {
    config.max_kanji_per_part.max(1)
  }
}

fn plan_level(index: &DictionaryIndex, config: &QuizConfig, level: JlptLevel) -> Vec<LevelPart> {
  let characters = index.characters_in_level(level);
  if characters.is_empty() {
    return Vec::new();
  }

  let capacity = part_capacity(level, characters.len(), config);
  let total_parts = characters.len().div_ceil(capacity);

  let words = eligible_words(index.word_buckets(level), config.option_count);
  let words_per_part = words.len().div_ceil(total_parts);

  (0..total_parts)
    .map(|i| {
      let chars = slice_window(&characters, i, capacity);
      let part_words = slice_window(&words, i, words_per_part);
      LevelPart {
        id: format!("{}_{}", level.as_str(), i + 1),
        level,
        part_index: i + 1,
        total_parts,
        characters: chars.iter().map(|c| c.to_string()).collect(),
        words: part_words.iter().map(|w| (*w).clone()).collect(),
      }
    })
    .collect()
}

/// The `i`-th window of `size` items, clamped to the slice
fn slice_window<T>(items: &[T], i: usize, size: usize) -> &[T] {
  let start = (i * size).min(items.len());
  let end = ((i + 1) * size).min(items.len());
  &items[start..end]
}

/// A word qualifies if its ending bucket can supply a full option set.
pub fn is_eligible_bucket(bucket: &[WordEntry], option_count: usize) -> bool {
  bucket.len() >= option_count
}

/// All words of a level from buckets large enough to quiz, in bucket order.
fn eligible_words(buckets: Option<&EndingBuckets>, option_count: usize) -> Vec<&WordEntry> {
  let Some(buckets) = buckets else {
    return Vec::new();
  };
  buckets
    .values()
    .filter(|bucket| is_eligible_bucket(bucket, option_count))
    .flat_map(|bucket| bucket.iter())
    .collect()
}

/// Find a part by its id
pub fn find_part<'a>(parts: &'a [LevelPart], id: &str) -> Option<&'a LevelPart> {
  parts.iter().find(|p| p.id == id)
}

/// Group parts per level for menus, easiest level first
pub fn group_parts(parts: &[LevelPart]) -> Vec<LevelGroup> {
  let mut groups: Vec<LevelGroup> = Vec::new();
  for part in parts {
    match groups.iter_mut().find(|g| g.level == part.level) {
      Some(group) => group.parts.push(part.summary()),
      None => groups.push(LevelGroup {
        level: part.level,
        display_name: part.level.display_name(),
        parts: vec![part.summary()],
      }),
    }
  }
  groups.sort_by_key(|g| g.level);
  groups
}
