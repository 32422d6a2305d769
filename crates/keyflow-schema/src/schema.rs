use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

use crate::availability::{Availability, KeySet, KnownValues};
use crate::cond::InputCond;
use crate::rule::KeyRule;
use crate::truth::Truth;

/// Declares which keys a node produces.
///
/// `fixed_keys` and `fixed_values` are always produced. Every available
/// input key is additionally run through `dynamic_keys`: the first pair
/// whose condition holds decides what that key contributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSchema {
  #[serde(default)]
  fixed_keys: KeySet,
  /// Fixed keys whose value is a known constant.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  fixed_values: KnownValues,
  #[serde(default)]
  dynamic_keys: Vec<(KeyRule, InputCond)>,
}

/// Builder for [`OutputSchema`].
#[derive(Debug, Default)]
pub struct OutputSchemaBuilder {
  fixed_keys: KeySet,
  fixed_values: KnownValues,
  dynamic_keys: Vec<(KeyRule, InputCond)>,
}

impl OutputSchemaBuilder {
  pub fn add_fixed(mut self, key: impl Into<String>) -> Self {
    self.fixed_keys.insert(key.into());
    self
  }

  /// Add a fixed key whose value is known ahead of execution.
  pub fn add_fixed_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.fixed_values.insert(key.into(), value.into());
    self
  }

  pub fn add_rule_for_every_input(mut self, rule: KeyRule, cond: InputCond) -> Self {
    self.dynamic_keys.push((rule, cond));
    self
  }

  /// Carry every available input key through unchanged.
  pub fn carry_all(self) -> Self {
    self.add_rule_for_every_input(KeyRule::Identity, InputCond::Always)
  }

  pub fn build(self) -> OutputSchema {
    OutputSchema {
      fixed_keys: self.fixed_keys,
      fixed_values: self.fixed_values,
      dynamic_keys: self.dynamic_keys,
    }
  }
}

impl OutputSchema {
  pub fn builder() -> OutputSchemaBuilder {
    OutputSchemaBuilder::default()
  }

  /// Schema that carries every input through and adds nothing.
  pub fn carry_all() -> Self {
    Self::builder().carry_all().build()
  }

  pub fn fixed_keys(&self) -> impl Iterator<Item = &str> {
    self
      .fixed_keys
      .iter()
      .chain(self.fixed_values.keys())
      .map(String::as_str)
  }

  pub fn fixed_values(&self) -> &KnownValues {
    &self.fixed_values
  }

  pub fn dynamic_keys(&self) -> &[(KeyRule, InputCond)] {
    &self.dynamic_keys
  }

  /// Compute the keys this node produces when `input` is available.
  pub fn propagate(&self, input: &Availability) -> Availability {
    let mut produced = Produced::default();

    for key in &self.fixed_keys {
      produced.guarantee(key.clone(), None);
    }
    for (key, value) in &self.fixed_values {
      produced.guarantee(key.clone(), Some(value.clone()));
    }
    for (key, guaranteed) in input.keys() {
      self.propagate_key(key, guaranteed, input, &mut produced);
    }
    if input.open {
      self.propagate_unenumerated(input, &mut produced);
    }

    produced.finish()
  }

  fn propagate_key(&self, key: &str, guaranteed: bool, input: &Availability, out: &mut Produced) {
    // An undecided earlier pair may win at runtime, so a later match is
    // only one alternative.
    let mut undecided = false;

    for (rule, cond) in &self.dynamic_keys {
      match cond.evaluate_in(input, Some(key)) {
        Truth::False => {}
        Truth::Unknown => {
          undecided = true;
          if let Some(derived) = rule.apply(key) {
            out.allow(derived);
          }
        }
        Truth::True => {
          if let Some(derived) = rule.apply(key) {
            if guaranteed && !undecided {
              let value = if rule.preserves_value() {
                input.value_of(key).map(str::to_string)
              } else {
                None
              };
              out.guarantee(derived, value);
            } else {
              out.allow(derived);
            }
          }
          return;
        }
      }
    }
  }

  /// Account for input keys that cannot be enumerated.
  fn propagate_unenumerated(&self, input: &Availability, out: &mut Produced) {
    for (rule, cond) in &self.dynamic_keys {
      if cond.evaluate_in(input, None).is_false() {
        continue;
      }
      match rule {
        KeyRule::Identity | KeyRule::IdWithPrefix(_) => out.open = true,
        KeyRule::Any | KeyRule::Fixed(_) | KeyRule::Never => {
          if let Some(derived) = rule.apply("") {
            out.allow(derived);
          }
        }
      }
    }
  }
}

#[derive(Default)]
struct Produced {
  /// Guaranteed key -> value, `None` when unknown or conflicting.
  guaranteed: BTreeMap<String, Option<String>>,
  possible: KeySet,
  open: bool,
}

impl Produced {
  fn guarantee(&mut self, key: String, value: Option<String>) {
    match self.guaranteed.entry(key) {
      Entry::Vacant(entry) => {
        entry.insert(value);
      }
      Entry::Occupied(mut entry) => {
        if *entry.get() != value {
          entry.insert(None);
        }
      }
    }
  }

  fn allow(&mut self, key: String) {
    self.possible.insert(key);
  }

  fn finish(self) -> Availability {
    let mut guaranteed = KeySet::new();
    let mut known_values = KnownValues::new();

    for (key, value) in self.guaranteed {
      // Another route, or an unenumerated carried key, may overwrite the
      // key with a different value.
      if let Some(value) = value {
        if !self.open && !self.possible.contains(&key) {
          known_values.insert(key.clone(), value);
        }
      }
      guaranteed.insert(key);
    }

    let possible = if self.open {
      KeySet::new()
    } else {
      self
        .possible
        .into_iter()
        .filter(|k| !guaranteed.contains(k))
        .collect()
    };

    Availability {
      guaranteed,
      possible,
      known_values,
      open: self.open,
    }
  }
}
