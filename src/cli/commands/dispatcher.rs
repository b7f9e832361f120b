//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::checks::CheckRegistry;
use crate::cli::args::{Cli, Commands};
use crate::config::{load_config, validate_config, DnsBackend, HostcheckConfig};
use crate::error::{HostcheckError, Result};
use crate::host::{Host, SystemHost};
use crate::ui::{OutputMode, UserInterface};

/// Exit code when a check, fix or cleanup fails.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code for usage and configuration errors.
pub const EXIT_USAGE: i32 = 2;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Success or [`EXIT_FAILURE`].
    pub fn from_success(success: bool) -> Self {
        if success {
            Self::success()
        } else {
            Self::failure(EXIT_FAILURE)
        }
    }
}

/// Load the configuration for a run and fold in command-line overrides.
///
/// Applies the configured output mode when no flag chose one and reports
/// validation findings as warnings. Fails if two built-in checks share an
/// id.
pub fn load_run_config(
    config_path: Option<&Path>,
    skip: &[String],
    backend: Option<DnsBackend>,
    ui: &mut dyn UserInterface,
) -> Result<HostcheckConfig> {
    let loaded = load_config(config_path)?;
    let config = loaded.config.with_overrides(skip, backend);

    if ui.output_mode() == OutputMode::Normal {
        ui.set_output_mode(config.settings.default_output.into());
    }

    let registry = CheckRegistry::with_builtins();
    registry.validate()?;

    for warning in validate_config(&config, &registry) {
        tracing::warn!("Config rule '{}' on {}", warning.rule, warning.check);
        ui.warning(&warning.message);
    }

    Ok(config)
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    config_path: Option<PathBuf>,
    host: Box<dyn Host>,
}

impl CommandDispatcher {
    /// Create a dispatcher acting on the real host.
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self::with_host(config_path, Box::new(SystemHost::new()))
    }

    /// Create a dispatcher acting on `host`.
    pub fn with_host(config_path: Option<PathBuf>, host: Box<dyn Host>) -> Self {
        Self { config_path, host }
    }

    /// Explicit config file, if any.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Dispatch and execute a command.
    ///
    /// Configuration errors are reported through `ui` and turned into
    /// [`EXIT_USAGE`]; every other error is returned.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let host = self.host.as_ref();
        let config = self.config_path();

        let result = match &cli.command {
            Commands::Check(args) => {
                super::check::CheckCommand::new(host, config, args.clone()).execute(ui)
            }
            Commands::Fix(args) => {
                super::fix::FixCommand::new(host, config, args.clone()).execute(ui)
            }
            Commands::Cleanup(args) => {
                super::cleanup::CleanupCommand::new(host, config, args.clone()).execute(ui)
            }
            Commands::List(args) => super::list::ListCommand::new(args.clone()).execute(ui),
            Commands::Config(args) => {
                super::config::ConfigCommand::new(config, args.clone()).execute(ui)
            }
            Commands::Completions(args) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
        };

        match result {
            Err(
                e @ (HostcheckError::ConfigNotFound { .. }
                | HostcheckError::ConfigParseError { .. }
                | HostcheckError::UnknownCheck { .. }),
            ) => {
                ui.error(&e.to_string());
                Ok(CommandResult::failure(EXIT_USAGE))
            }
            other => other,
        }
    }
}
