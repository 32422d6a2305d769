//! Keyflow Config
//!
//! This crate contains the serializable workflow definition types for keyflow.
//! These types describe a workflow before it is loaded into a graph and
//! verified.
//!
//! Definitions are loaded from JSON files (via the CLI with
//! `keyflow check workflow.json`). The workflow crate turns a [`WorkflowDef`]
//! into a graph, rejecting duplicate names and dangling edges.

mod edge;
mod node;
mod verifier;
mod workflow;

pub use edge::EdgeDef;
pub use node::NodeDef;
pub use verifier::{BranchPolicy, VerifierConfig};
pub use workflow::WorkflowDef;
