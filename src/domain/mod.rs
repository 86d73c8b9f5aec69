pub mod entry;
pub mod level;
pub mod quiz;

pub use entry::{CharacterEntry, WordEntry};
pub use level::JlptLevel;
pub use quiz::{
  LevelGroup, LevelPart, LevelPartSummary, QuizItem, QuizMode, QuizOption, SessionRecord,
};
