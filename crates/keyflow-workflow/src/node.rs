use keyflow_schema::{KeySet, OutputSchema};

/// A processing step and its declared data-flow contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
  pub name: String,
  /// Keys that must be available whenever the node runs.
  pub required_inputs: KeySet,
  pub output_schema: OutputSchema,
}

impl Node {
  pub fn new<I, S>(name: impl Into<String>, required_inputs: I, output_schema: OutputSchema) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      name: name.into(),
      required_inputs: required_inputs.into_iter().map(Into::into).collect(),
      output_schema,
    }
  }
}
