//! hostcheck - Detect, fix and undo host configuration for split DNS.
//!
//! A host property is a [`checks::Check`]: a read-only detection, an
//! optional remediation and an optional undo. Checks act on the machine
//! only through the [`host::Host`] traits, so every check runs the same
//! against the real system and against [`host::MemoryHost`].
//!
//! # Modules
//!
//! - [`checks`] - Check definitions, reusable patterns and the network checks
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`host`] - Privileged filesystem, service manager and tool lookup
//! - [`runner`] - Check, fix and cleanup orchestration
//! - [`shell`] - Command execution and privilege detection
//! - [`ui`] - Prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use hostcheck::checks::CheckRegistry;
//! use hostcheck::config::DnsBackend;
//! use hostcheck::host::MemoryHost;
//! use hostcheck::runner::{RunMode, RunPolicy, Runner};
//! use hostcheck::ui::MockUI;
//!
//! let host = MemoryHost::new().with_tool("nmcli");
//! let registry = CheckRegistry::for_backend(DnsBackend::Dnsmasq);
//! let mut ui = MockUI::new();
//!
//! let report = Runner::new(&host, RunPolicy::new(RunMode::Fix)).run(&registry, &mut ui);
//! assert!(report.get("check-crc-dnsmasq-file").is_some());
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod runner;
pub mod shell;
pub mod ui;

pub use error::{HostcheckError, Result};
