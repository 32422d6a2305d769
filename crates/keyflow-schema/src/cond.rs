use serde::{Deserialize, Serialize};

use crate::availability::{Availability, KeyLookup, KnownValues};
use crate::truth::Truth;

/// Predicate gating an edge or a key rule.
///
/// A list of conditions is conjunctive; `Or` supplies disjunction within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum InputCond {
  Always,
  /// Holds iff the key is present.
  MatchesKey(String),
  /// Holds iff the subject key is known to hold exactly this value.
  MatchesValue(String),
  Or(Vec<InputCond>),
}

impl InputCond {
  /// `[MatchesKey(key), MatchesValue(value)]`: the key must be present and
  /// hold `value`.
  pub fn matches_key_value(key: impl Into<String>, value: impl Into<String>) -> Vec<InputCond> {
    vec![
      InputCond::MatchesKey(key.into()),
      InputCond::MatchesValue(value.into()),
    ]
  }

  /// Evaluate against a single, definite key set.
  ///
  /// `subject` names the key that `MatchesValue` tests. Key presence is
  /// never `Unknown` here; only values can be.
  pub fn evaluate<K>(&self, available: &K, known: &KnownValues, subject: Option<&str>) -> Truth
  where
    K: KeyLookup + ?Sized,
  {
    match self {
      InputCond::Always => Truth::True,
      InputCond::MatchesKey(key) => available.contains_key(key).into(),
      InputCond::MatchesValue(value) => match subject {
        None => Truth::Unknown,
        Some(subject) if !available.contains_key(subject) => Truth::False,
        Some(subject) => match known.get(subject) {
          Some(bound) => (bound == value).into(),
          None => Truth::Unknown,
        },
      },
      InputCond::Or(conds) => Truth::any(
        conds
          .iter()
          .map(|c| c.evaluate(available, known, subject)),
      ),
    }
  }

  /// Evaluate against two-tier availability.
  ///
  /// The condition is evaluated on the lower bound (guaranteed keys) and
  /// the upper bound (every key that may be present). Agreement is final,
  /// disagreement is `Unknown`.
  pub fn evaluate_in(&self, availability: &Availability, subject: Option<&str>) -> Truth {
    bounded(availability, |available: &dyn KeyLookup| {
      self.evaluate(available, &availability.known_values, subject)
    })
  }
}

/// The key tested by `MatchesValue` in an edge condition list: the first
/// top-level `MatchesKey`.
pub fn subject_of(conds: &[InputCond]) -> Option<&str> {
  conds.iter().find_map(|c| match c {
    InputCond::MatchesKey(key) => Some(key.as_str()),
    _ => None,
  })
}

/// Evaluate a conjunctive condition list against a definite key set.
pub fn evaluate_all<K>(conds: &[InputCond], available: &K, known: &KnownValues) -> Truth
where
  K: KeyLookup + ?Sized,
{
  let subject = subject_of(conds);
  Truth::all(conds.iter().map(|c| c.evaluate(available, known, subject)))
}

/// Evaluate a conjunctive condition list against two-tier availability.
pub fn evaluate_all_in(conds: &[InputCond], availability: &Availability) -> Truth {
  bounded(availability, |available: &dyn KeyLookup| {
    evaluate_all(conds, available, &availability.known_values)
  })
}

fn bounded<F>(availability: &Availability, eval: F) -> Truth
where
  F: Fn(&dyn KeyLookup) -> Truth,
{
  let guaranteed: &dyn KeyLookup = &availability.guaranteed;
  let lower = eval(guaranteed);
  if !availability.open && availability.possible.is_empty() {
    return lower;
  }
  let upper_bound: &dyn KeyLookup = &availability.upper();
  let upper = eval(upper_bound);
  if lower == upper { lower } else { Truth::Unknown }
}
