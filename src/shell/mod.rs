//! External command execution and platform probes.

pub mod command;
pub mod platform;

pub use command::{display_command, execute, execute_privileged, CommandOptions, CommandResult};
pub use platform::{is_ci, is_elevated};
