use keyflow_schema::OutputSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDef {
  pub name: String,
  /// Keys that must be available whenever the node runs.
  #[serde(default)]
  pub required_inputs: Vec<String>,
  #[serde(default)]
  pub output: OutputSchema,
}
