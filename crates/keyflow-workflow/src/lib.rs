//! Keyflow Workflow
//!
//! This crate provides the graph a workflow is verified on: named nodes with
//! their data-flow contract, conditional edges between them, and a single
//! start node.
//!
//! Construction is incremental and checked:
//! - Node names are unique
//! - Edges and the start node reference registered nodes only
//! - A failed call leaves the graph unchanged
//!
//! Once built, the graph is handed to the verifier read-only.

mod error;
mod graph;
mod node;

pub use error::WorkflowError;
pub use graph::{Edge, NodeId, WorkflowGraph};
pub use node::Node;
