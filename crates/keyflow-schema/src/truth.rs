use serde::{Deserialize, Serialize};

/// Outcome of evaluating a condition during static verification.
///
/// `Unknown` means the outcome depends on a value that only exists at
/// runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Truth {
  True,
  False,
  Unknown,
}

impl Truth {
  /// Kleene conjunction.
  pub fn and(self, other: Truth) -> Truth {
    match (self, other) {
      (Truth::False, _) | (_, Truth::False) => Truth::False,
      (Truth::True, Truth::True) => Truth::True,
      _ => Truth::Unknown,
    }
  }

  /// Kleene disjunction.
  pub fn or(self, other: Truth) -> Truth {
    match (self, other) {
      (Truth::True, _) | (_, Truth::True) => Truth::True,
      (Truth::False, Truth::False) => Truth::False,
      _ => Truth::Unknown,
    }
  }

  /// Conjunction of every item. An empty iterator is `True`.
  pub fn all(items: impl IntoIterator<Item = Truth>) -> Truth {
    items.into_iter().fold(Truth::True, Truth::and)
  }

  /// Disjunction of every item. An empty iterator is `False`.
  pub fn any(items: impl IntoIterator<Item = Truth>) -> Truth {
    items.into_iter().fold(Truth::False, Truth::or)
  }

  pub fn is_true(self) -> bool {
    self == Truth::True
  }

  pub fn is_false(self) -> bool {
    self == Truth::False
  }

  /// True unless the outcome is provably `False`.
  pub fn may_hold(self) -> bool {
    self != Truth::False
  }
}

impl From<bool> for Truth {
  fn from(value: bool) -> Self {
    if value { Truth::True } else { Truth::False }
  }
}
