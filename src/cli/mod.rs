//! Command-line interface for hostcheck.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    CheckArgs, CleanupArgs, Cli, Commands, CompletionsArgs, ConfigArgs, FixArgs, ListArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult, EXIT_FAILURE, EXIT_USAGE};
