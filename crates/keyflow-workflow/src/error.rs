use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
  #[error("duplicate node: {name}")]
  DuplicateNode { name: String },

  #[error("unknown node: {name}")]
  UnknownNode { name: String },
}
