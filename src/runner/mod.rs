//! Check execution orchestration.
//!
//! - [`policy`] - what a run does: mode plus skip and warn lists
//! - [`executor`] - the [`Runner`] that applies a policy to a registry
//! - [`report`] - per-check outcomes and the aggregated [`RunReport`]

pub mod executor;
pub mod policy;
pub mod report;

pub use executor::Runner;
pub use policy::{RunMode, RunPolicy};
pub use report::{CheckOutcome, Outcome, OutcomeCounts, RunReport};
