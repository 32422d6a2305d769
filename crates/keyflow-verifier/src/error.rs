use serde::Serialize;
use thiserror::Error;

/// A declared data-flow contract the verifier could not prove.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaViolation {
  /// A reachable node may run while some required inputs are absent.
  #[error("node '{node}' may run without required inputs: {}", .missing.join(", "))]
  MissingInputs { node: String, missing: Vec<String> },

  /// Nothing can run because no start node was set.
  #[error("workflow has no start node")]
  MissingStartNode,
}
