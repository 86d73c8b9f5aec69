use serde::{Deserialize, Serialize};

/// JLPT proficiency level. Declaration order runs easiest to hardest, so the
/// derived `Ord` sorts N5 first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JlptLevel {
  #[serde(rename = "jlpt5")]
  N5,
  #[serde(rename = "jlpt4")]
  N4,
  #[serde(rename = "jlpt3")]
  N3,
  #[serde(rename = "jlpt2")]
  N2,
  #[serde(rename = "jlpt1")]
  N1,
}

impl JlptLevel {
  /// All levels, easiest first
  pub const ALL: [JlptLevel; 5] = [Self::N5, Self::N4, Self::N3, Self::N2, Self::N1];

  /// Parse the numeric level used by the dictionary (5 = easiest, 1 = hardest)
  pub fn from_number(n: i64) -> Option<Self> {
    match n {
      5 => Some(Self::N5),
      4 => Some(Self::N4),
      3 => Some(Self::N3),
      2 => Some(Self::N2),
      1 => Some(Self::N1),
      _ => None,
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    let s = s.trim().to_lowercase();
    let digits = s
      .strip_prefix("jlpt")
      .or_else(|| s.strip_prefix('n'))
      .unwrap_or(&s);
    digits.parse::<i64>().ok().and_then(Self::from_number)
  }

  pub fn number(&self) -> u8 {
    match self {
      Self::N5 => 5,
      Self::N4 => 4,
      Self::N3 => 3,
      Self::N2 => 2,
      Self::N1 => 1,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::N5 => "jlpt5",
      Self::N4 => "jlpt4",
      Self::N3 => "jlpt3",
      Self::N2 => "jlpt2",
      Self::N1 => "jlpt1",
    }
  }

  /// Menu label, e.g. "JLPT N5"
  pub fn display_name(&self) -> String {
    format!("JLPT N{}", self.number())
  }

  pub fn is_hardest(&self) -> bool {
    *self == Self::N1
  }

  /// The harder of two levels (lower JLPT number)
  pub fn hardest_of(self, other: Self) -> Self {
    self.max(other)
  }
}

impl std::fmt::Display for JlptLevel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "N{}", self.number())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_order_is_easiest_first() {
    let mut levels = vec![JlptLevel::N1, JlptLevel::N5, JlptLevel::N3];
    levels.sort();
    assert_eq!(levels, vec![JlptLevel::N5, JlptLevel::N3, JlptLevel::N1]);
  }

  #[test]
  fn test_from_number_out_of_range() {
    assert_eq!(JlptLevel::from_number(0), None);
    assert_eq!(JlptLevel::from_number(6), None);
    assert_eq!(JlptLevel::from_number(3), Some(JlptLevel::N3));
  }

  #[test]
  fn test_from_str_accepts_common_spellings() {
    assert_eq!(JlptLevel::from_str("jlpt2"), Some(JlptLevel::N2));
    assert_eq!(JlptLevel::from_str("N4"), Some(JlptLevel::N4));
    assert_eq!(JlptLevel::from_str("5"), Some(JlptLevel::N5));
    assert_eq!(JlptLevel::from_str("beginner"), None);
  }

  #[test]
  fn test_hardest_of() {
    assert_eq!(JlptLevel::N5.hardest_of(JlptLevel::N2), JlptLevel::N2);
    assert_eq!(JlptLevel::N1.hardest_of(JlptLevel::N4), JlptLevel::N1);
  }

  #[test]
  fn test_serde_uses_level_keys() {
    let json = serde_json::to_string(&JlptLevel::N3).unwrap();
    assert_eq!(json, "\"jlpt3\"");
    assert_eq!(JlptLevel::N3.display_name(), "JLPT N3");
  }
}
