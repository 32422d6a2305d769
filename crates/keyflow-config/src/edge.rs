use keyflow_schema::InputCond;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDef {
  pub from: String,
  pub to: String,
  /// Conjunctive conditions gating the edge. Empty means unconditional.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub conditions: Vec<InputCond>,
}

impl EdgeDef {
  pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
    Self {
      from: from.into(),
      to: to.into(),
      conditions: Vec::new(),
    }
  }

  pub fn when(mut self, conditions: Vec<InputCond>) -> Self {
    self.conditions = conditions;
    self
  }
}
