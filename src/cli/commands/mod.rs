//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations and owns the real host.

pub mod check;
pub mod cleanup;
pub mod completions;
pub mod config;
pub mod dispatcher;
pub mod display;
pub mod fix;
pub mod list;

pub use dispatcher::{Command, CommandDispatcher, CommandResult, EXIT_FAILURE, EXIT_USAGE};
