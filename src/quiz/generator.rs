//! Builds the question queue for a part in a given mode.

use super::distractors::{select_character_options, select_word_options, CharacterReading};
use super::random::RandomSource;
use super::QuizError;
use crate::content::DictionaryIndex;
use crate::domain::{CharacterEntry, LevelPart, QuizItem, QuizMode, WordEntry};

/// Generate a shuffled question queue for `part`.
///
/// Items that cannot be built are skipped; an empty result is `EmptyLevel`.
pub fn generate_queue<R: RandomSource>(
  index: &DictionaryIndex,
  part: &LevelPart,
  mode: QuizMode,
  option_count: usize,
  rng: &mut R,
) -> Result<Vec<QuizItem>, QuizError> {
  let mut queue = match mode {
    QuizMode::Kanji => kanji_queue(index, part, option_count, rng),
    QuizMode::Vocabulary => vocabulary_queue(index, part, option_count, rng),
  };

  if queue.is_empty() {
    tracing::warn!("No usable {} items in part {}", mode.as_str(), part.id);
    return Err(QuizError::EmptyLevel(part.id.clone()));
  }

  rng.shuffle(&mut queue);
  tracing::debug!("Generated {} {} items for {}", queue.len(), mode.as_str(), part.id);
  Ok(queue)
}

fn kanji_queue<R: RandomSource>(
  index: &DictionaryIndex,
  part: &LevelPart,
  option_count: usize,
  rng: &mut R,
) -> Vec<QuizItem> {
  // Distractors come from the whole level, not only this part
  let pool: Vec<&CharacterEntry> = index
    .characters_in_level(part.level)
    .into_iter()
    .filter_map(|c| index.character(c))
    .collect();

  part
    .characters
    .iter()
    .filter_map(|c| {
      let Some(entry) = index.character(c) else {
        tracing::debug!("Part {} references unknown character {}", part.id, c);
        return None;
      };
      let item = kanji_item(entry, &pool, option_count, rng);
      if item.is_none() {
        tracing::debug!("Dropping unusable kanji item {}", c);
      }
      item
    })
    .collect()
}

/// Build one kanji question, or None if the character is unusable.
pub fn kanji_item<R: RandomSource>(
  entry: &CharacterEntry,
  pool: &[&CharacterEntry],
  option_count: usize,
  rng: &mut R,
) -> Option<QuizItem> {
  let answer = CharacterReading::of(entry)?;
  let options = select_character_options(entry, pool, option_count, rng)?;

  Some(QuizItem {
    prompt: entry.character.clone(),
    correct_value: answer.value,
    contextual_reading: answer.contextual,
    gloss: entry.gloss(),
    options,
  })
}

fn vocabulary_queue<R: RandomSource>(
  index: &DictionaryIndex,
  part: &LevelPart,
  option_count: usize,
  rng: &mut R,
) -> Vec<QuizItem> {
  part
    .words
    .iter()
    .filter_map(|w| {
      let bucket = index.bucket(w.level, &w.ending);
      let item = vocabulary_item(w, bucket, option_count, rng);
      if item.is_none() {
        tracing::debug!("Dropping vocabulary item {} ({})", w.written, w.reading);
      }
      item
    })
    .collect()
}

/// Build one vocabulary question from the word's ending bucket.
pub fn vocabulary_item<R: RandomSource>(
  word: &WordEntry,
  bucket: &[WordEntry],
  option_count: usize,
  rng: &mut R,
) -> Option<QuizItem> {
  // A bucket smaller than a full option set never yields a question
  if bucket.len() < option_count {
    return None;
  }
  let options = select_word_options(word, bucket, option_count, rng)?;

  Some(QuizItem {
    prompt: word.written.clone(),
    correct_value: word.reading.clone(),
    contextual_reading: word.reading.clone(),
    gloss: word.gloss(),
    options,
  })
}
