use serde::{Deserialize, Serialize};

/// Key produced by [`KeyRule::Any`].
pub const ANY_KEY: &str = "Any";

/// How an available input key maps to an output key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum KeyRule {
  /// Produces the literal key `"Any"`.
  Any,
  /// Consumes the input key.
  Never,
  /// Carries the input key through unchanged.
  Identity,
  /// Produces the given key regardless of the input key's name.
  Fixed(String),
  /// Produces `prefix + input_key`.
  IdWithPrefix(String),
}

impl KeyRule {
  /// The output key this rule derives from `key`, if any.
  pub fn apply(&self, key: &str) -> Option<String> {
    match self {
      KeyRule::Any => Some(ANY_KEY.to_string()),
      KeyRule::Never => None,
      KeyRule::Identity => Some(key.to_string()),
      KeyRule::Fixed(fixed) => Some(fixed.clone()),
      KeyRule::IdWithPrefix(prefix) => Some(format!("{prefix}{key}")),
    }
  }

  /// Whether the produced key holds the same value as the input key.
  pub fn preserves_value(&self) -> bool {
    matches!(self, KeyRule::Identity | KeyRule::IdWithPrefix(_))
  }

  /// Whether the rule can produce anything at all.
  pub fn produces(&self) -> bool {
    !matches!(self, KeyRule::Never)
  }
}
