//! Keyflow Schema
//!
//! The closed vocabulary used to describe a workflow node's data-flow
//! contract without running it:
//!
//! - [`InputCond`] gates an edge or a key rule.
//! - [`KeyRule`] derives an output key name from an input key name.
//! - [`OutputSchema`] combines fixed keys with ordered `(KeyRule, InputCond)`
//!   pairs and can be propagated over an [`Availability`] to learn which keys
//!   a node is guaranteed (or merely able) to produce.
//!
//! Conditions are evaluated in three-valued logic ([`Truth`]) because values
//! produced at runtime are generally not known during verification.

mod availability;
mod cond;
mod rule;
mod schema;
mod truth;

pub use availability::{Availability, KeyLookup, KeySet, KnownValues, UpperBound};
pub use cond::{InputCond, evaluate_all, evaluate_all_in, subject_of};
pub use rule::{ANY_KEY, KeyRule};
pub use schema::{OutputSchema, OutputSchemaBuilder};
pub use truth::Truth;
