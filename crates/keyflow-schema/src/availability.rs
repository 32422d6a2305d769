//! Symbolic knowledge about which keys are present at a point in a workflow.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// An ordered set of key names.
pub type KeySet = BTreeSet<String>;

/// Statically known values, keyed by key name.
pub type KnownValues = BTreeMap<String, String>;

/// Anything that can answer "is this key present".
pub trait KeyLookup {
  fn contains_key(&self, key: &str) -> bool;
}

impl KeyLookup for KeySet {
  fn contains_key(&self, key: &str) -> bool {
    self.contains(key)
  }
}

/// Keys available at some point, split into two tiers.
///
/// `guaranteed` keys are present on every execution. `possible` keys may be
/// present depending on runtime values; the two sets never overlap. When
/// `open` is set, any key outside `guaranteed` may be present as well (the
/// possible tier could not be enumerated, e.g. a renaming rule inside a
/// cycle).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
  pub guaranteed: KeySet,
  #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
  pub possible: KeySet,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub known_values: KnownValues,
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub open: bool,
}

impl Availability {
  /// Availability where exactly `keys` are present.
  pub fn guaranteed<I, S>(keys: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      guaranteed: keys.into_iter().map(Into::into).collect(),
      ..Default::default()
    }
  }

  /// Add keys to the possible tier. Keys already guaranteed are ignored.
  pub fn with_possible<I, S>(mut self, keys: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    for key in keys {
      let key = key.into();
      if !self.guaranteed.contains(&key) {
        self.possible.insert(key);
      }
    }
    self
  }

  /// Bind a guaranteed key to a statically known value.
  pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    let key = key.into();
    self.possible.remove(&key);
    self.guaranteed.insert(key.clone());
    self.known_values.insert(key, value.into());
    self
  }

  /// Presence of `key` in three-valued terms.
  pub fn key_truth(&self, key: &str) -> crate::Truth {
    if self.guaranteed.contains(key) {
      crate::Truth::True
    } else if self.open || self.possible.contains(key) {
      crate::Truth::Unknown
    } else {
      crate::Truth::False
    }
  }

  /// The value of `key`, if it is guaranteed and statically known.
  pub fn value_of(&self, key: &str) -> Option<&str> {
    self.known_values.get(key).map(String::as_str)
  }

  /// Every enumerable key, paired with whether it is guaranteed.
  /// Guaranteed keys come first.
  pub fn keys(&self) -> impl Iterator<Item = (&str, bool)> {
    self
      .guaranteed
      .iter()
      .map(|k| (k.as_str(), true))
      .chain(self.possible.iter().map(|k| (k.as_str(), false)))
  }

  /// Upper bound view: every key that may be present.
  pub fn upper(&self) -> UpperBound<'_> {
    UpperBound(self)
  }

  /// Combine the availability of two alternative routes into one node.
  ///
  /// A key stays guaranteed only if both routes guarantee it, and a value
  /// stays known only if both routes agree on it.
  pub fn merge(&self, other: &Availability) -> Availability {
    let guaranteed: KeySet = self
      .guaranteed
      .intersection(&other.guaranteed)
      .cloned()
      .collect();
    let open = self.open || other.open;
    let possible = if open {
      KeySet::new()
    } else {
      self
        .keys()
        .chain(other.keys())
        .map(|(k, _)| k)
        .filter(|k| !guaranteed.contains(*k))
        .map(str::to_string)
        .collect()
    };
    let known_values = self
      .known_values
      .iter()
      .filter(|(k, v)| guaranteed.contains(*k) && other.known_values.get(*k) == Some(*v))
      .map(|(k, v)| (k.clone(), v.clone()))
      .collect();

    Availability {
      guaranteed,
      possible,
      known_values,
      open,
    }
  }

  /// Give up enumerating the possible tier.
  pub fn widen(&mut self) {
    self.open = true;
    self.possible.clear();
  }
}

/// Presence test against `guaranteed ∪ possible` (or everything, when open).
#[derive(Debug, Clone, Copy)]
pub struct UpperBound<'a>(&'a Availability);

impl KeyLookup for UpperBound<'_> {
  fn contains_key(&self, key: &str) -> bool {
    self.0.open || self.0.guaranteed.contains(key) || self.0.possible.contains(key)
  }
}
