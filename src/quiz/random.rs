//! Injectable randomness for quiz generation.
//!
//! Queue shuffling, option shuffling and the distractor scan offset all go
//! through `RandomSource`, so tests can run generation with a seeded
//! `StdRng` or a fully fixed source.

use rand::rngs::{StdRng, ThreadRng};
use rand::seq::SliceRandom;
use rand::Rng;

pub trait RandomSource {
  /// Uniform index in `0..len` (0 when `len` is 0)
  fn random_offset(&mut self, len: usize) -> usize;

  /// Shuffle in place
  fn shuffle<T>(&mut self, items: &mut [T]);
}

macro_rules! impl_random_source {
  ($rng:ty) => {
    impl RandomSource for $rng {
      fn random_offset(&mut self, len: usize) -> usize {
        if len == 0 {
          0
        } else {
          self.random_range(0..len)
        }
      }

      fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(self);
      }
    }
  };
}

impl_random_source!(ThreadRng);
impl_random_source!(StdRng);
