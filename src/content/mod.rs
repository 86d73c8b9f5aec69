//! Dictionary content: loading the raw JSON file and indexing it.
//!
//! # Pipeline
//!
//! 1. **Load**: `load_dictionary` reads the JSON file into a `RawDictionary`
//! 2. **Index**: `DictionaryIndex::build` normalizes characters and words,
//!    skipping malformed records and reporting them in an `IndexReport`
//!
//! The resulting index is immutable and is passed explicitly to planning and
//! quiz generation.

pub mod dictionary;
pub mod index;

pub use dictionary::{load_dictionary, DictionaryError, RawDictionary};
pub use index::{DictionaryIndex, EndingBuckets, IndexProgress, IndexReport};
