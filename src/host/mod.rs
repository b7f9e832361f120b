//! Host primitives consumed by checks.
//!
//! Checks never touch the filesystem, the service manager or `PATH`
//! directly. They go through the traits defined here, so the same check
//! runs against the real machine ([`SystemHost`]) or an in-memory
//! stand-in ([`MemoryHost`]).
//!
//! # Modules
//!
//! - [`system`] - Real host: sudo-escalated file operations and PATH lookup
//! - [`systemd`] - `systemctl`-backed service manager
//! - [`memory`] - In-memory host with failure injection, for tests

pub mod memory;
pub mod system;
pub mod systemd;

pub use memory::{MemoryHost, Mutation};
pub use system::{parse_system_path, resolve_tool_path, SystemHost};
pub use systemd::{parse_show_output, SystemdServiceManager};

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;

/// State of a service unit as reported by the service manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceState {
    /// Unit is active.
    Running,
    /// Unit is loaded but inactive.
    Stopped,
    /// Unit entered the failed state.
    Error,
    /// No such unit.
    NotFound,
    /// Anything the manager reported that we do not model.
    Unknown,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceState::Running => "running",
            ServiceState::Stopped => "stopped",
            ServiceState::Error => "failed",
            ServiceState::NotFound => "not found",
            ServiceState::Unknown => "in an unknown state",
        };
        f.write_str(s)
    }
}

/// File operations that may need elevated privileges.
pub trait PrivilegedFs {
    /// Create or overwrite `path` with `content` and permission `mode`.
    ///
    /// `description` says why root is needed and is shown if escalation
    /// prompts for a password.
    fn write_file_as_privileged(
        &self,
        description: &str,
        content: &[u8],
        path: &Path,
        mode: u32,
    ) -> Result<()>;

    /// Remove `path`. Succeeds if it is already absent.
    fn remove_file_as_privileged(&self, description: &str, path: &Path) -> Result<()>;

    /// Compare `path` with `expected`.
    ///
    /// Fails with `FileAbsent` or `FileContentDiffers`.
    fn file_content_equals(&self, path: &Path, expected: &[u8]) -> Result<()>;

    /// Whether anything exists at `path`.
    fn file_exists(&self, path: &Path) -> bool;
}

/// Queries and reloads service units.
pub trait ServiceManager {
    /// Current state of `unit`.
    fn status(&self, unit: &str) -> Result<ServiceState>;

    /// Ask `unit` to reload its configuration.
    fn reload(&self, unit: &str) -> Result<()>;
}

/// Resolves executables.
pub trait ToolLocator {
    /// Full path of `tool` if it is on the search path.
    fn look_path(&self, tool: &str) -> Result<PathBuf>;
}

/// Everything a check may touch on the host.
pub trait Host: PrivilegedFs + ServiceManager + ToolLocator {}

impl<T: PrivilegedFs + ServiceManager + ToolLocator> Host for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_state_display() {
        assert_eq!(ServiceState::Running.to_string(), "running");
        assert_eq!(ServiceState::Stopped.to_string(), "stopped");
        assert_eq!(ServiceState::NotFound.to_string(), "not found");
    }

    #[test]
    fn service_state_serializes_kebab_case() {
        let json = serde_json::to_string(&ServiceState::NotFound).unwrap();
        assert_eq!(json, "\"not-found\"");
    }

    #[test]
    fn memory_host_is_a_host() {
        fn takes_host(_: &dyn Host) {}
        takes_host(&MemoryHost::new());
    }
}
