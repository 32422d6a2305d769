//! Static verifier for keyflow workflows.
//!
//! Nothing is executed: node bodies are described only by their
//! [`OutputSchema`](keyflow_schema::OutputSchema), and edge conditions that
//! depend on runtime values evaluate to [`Truth::Unknown`].
//!
//! # Architecture
//!
//! ```text
//! Verifier::new(&graph, config)
//! ├── availability dataflow  - guaranteed/possible keys per node (fixed point)
//! ├── edge evaluation        - True / False / Unknown per edge
//! └── reachability           - BFS over edges that are not provably False
//!
//! queries
//! ├── is_reachable(name)             - some path can reach the node
//! ├── is_eventually_reached(targets) - every path is forced into the targets
//! └── validate()                     - required inputs provably available
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use keyflow_verifier::Verifier;
//!
//! let verifier = Verifier::new(&graph, VerifierConfig::default());
//! assert!(verifier.is_reachable("buy"));
//! assert!(verifier.is_eventually_reached(&["report_result"]));
//! for violation in verifier.validate() {
//!     eprintln!("{violation}");
//! }
//! ```

mod dataflow;
mod error;
mod liveness;
mod reachability;
mod validate;
mod verifier;

pub use error::SchemaViolation;
pub use keyflow_config::{BranchPolicy, VerifierConfig};
pub use keyflow_schema::Truth;
pub use verifier::Verifier;
