use serde::{Deserialize, Serialize};

/// Options for the verifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
  #[serde(default)]
  pub branch_policy: BranchPolicy,
}

impl VerifierConfig {
  pub fn strict() -> Self {
    Self {
      branch_policy: BranchPolicy::Strict,
    }
  }
}

/// How liveness treats a node none of whose outgoing edges is provably
/// taken. A single undecided edge may always fail to fire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchPolicy {
  /// Two or more undecided edges testing values of the same key cover
  /// every runtime outcome, so execution continues along one of them.
  /// Any other node without a provably taken edge may stall.
  #[default]
  Exhaustive,
  /// Execution may stall when no outgoing edge is provably taken.
  Strict,
}
