//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::{DnsBackend, CONFIG_ENV_VAR};

/// hostcheck - Verify, fix and clean up host networking for split DNS.
#[derive(Debug, Parser)]
#[command(name = "hostcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides /etc/hostcheck/config.yml)
    #[arg(short, long, global = true, env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Verify the host without changing it
    Check(CheckArgs),

    /// Verify the host and repair what can be repaired
    Fix(FixArgs),

    /// Remove everything `fix` installed
    Cleanup(CleanupArgs),

    /// List known checks
    List(ListArgs),

    /// Show resolved configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip specified checks (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// DNS backend to verify (overrides config)
    #[arg(long, value_enum)]
    pub backend: Option<DnsBackend>,
}

/// Arguments for the `fix` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FixArgs {
    /// Skip specified checks (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// DNS backend to set up (overrides config)
    #[arg(long, value_enum)]
    pub backend: Option<DnsBackend>,
}

/// Arguments for the `cleanup` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CleanupArgs {
    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Only clean up this backend's files (default: all)
    #[arg(long, value_enum)]
    pub backend: Option<DnsBackend>,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show a single check in detail
    pub id: Option<String>,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Print the JSON schema of the config file instead
    #[arg(long)]
    pub schema: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
