//! Reusable building blocks for check functions.
//!
//! - [`ConfigFile`] - a file with fixed content that a service reads
//! - [`service_running`] / [`service_not_running`] - unit state checks
//! - [`tool_installed`] / [`require_tool`] - executable lookups

use std::path::{Path, PathBuf};

use crate::error::{HostcheckError, Result};
use crate::host::{Host, ServiceState};

/// A configuration file with fixed content consumed by a service.
#[derive(Debug, Clone, Copy)]
pub struct ConfigFile {
    /// Absolute path of the file.
    pub path: &'static str,
    /// Exact expected content.
    pub content: &'static str,
    /// Permission mode to write it with.
    pub mode: u32,
    /// Unit to reload after the file changes.
    pub service: &'static str,
}

impl ConfigFile {
    /// Path as a [`Path`].
    pub fn path(&self) -> &'static Path {
        Path::new(self.path)
    }

    /// Succeeds if the file exists with exactly the expected bytes.
    pub fn detect(&self, host: &dyn Host) -> Result<()> {
        host.file_content_equals(self.path(), self.content.as_bytes())
            .inspect_err(|e| match e {
                HostcheckError::FileAbsent { .. } => {
                    tracing::debug!("{} is absent", self.path)
                }
                HostcheckError::FileContentDiffers { .. } => {
                    tracing::debug!("{} exists with unexpected content", self.path)
                }
                _ => {}
            })
    }

    /// Write the expected content, then reload the service.
    ///
    /// A reload failure after a successful write is still a failure: the
    /// file changed but the service has not picked it up.
    pub fn apply(&self, host: &dyn Host) -> Result<()> {
        tracing::info!("Writing {}", self.path);
        host.write_file_as_privileged(
            &format!("write {} configuration to {}", self.service, self.path),
            self.content.as_bytes(),
            self.path(),
            self.mode,
        )?;

        tracing::debug!("Reloading {}", self.service);
        host.reload(self.service)?;
        Ok(())
    }

    /// Remove the file if present, then reload the service.
    ///
    /// When `precondition` reports `PreconditionUnavailable` the service
    /// is not installed, so the file cannot exist and this succeeds
    /// without touching the host.
    pub fn remove(&self, host: &dyn Host, precondition: fn(&dyn Host) -> Result<()>) -> Result<()> {
        match precondition(host) {
            Ok(()) => {}
            Err(HostcheckError::PreconditionUnavailable { what, reason }) => {
                tracing::debug!("Nothing to remove at {}: {} ({})", self.path, what, reason);
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        if !host.file_exists(self.path()) {
            tracing::debug!("{} already absent", self.path);
            return Ok(());
        }

        tracing::info!("Removing {}", self.path);
        host.remove_file_as_privileged(
            &format!("remove {} configuration file {}", self.service, self.path),
            self.path(),
        )?;

        tracing::debug!("Reloading {}", self.service);
        host.reload(self.service)?;
        Ok(())
    }
}

/// Succeeds only if `unit` is running.
pub fn service_running(host: &dyn Host, unit: &str) -> Result<()> {
    tracing::debug!("Checking if {} is running", unit);
    let state = host.status(unit)?;
    if state != ServiceState::Running {
        return Err(HostcheckError::ServiceState {
            unit: unit.to_string(),
            expected: "running".to_string(),
            actual: state,
        });
    }
    tracing::debug!("{} is running", unit);
    Ok(())
}

/// Succeeds only if `unit` is not running (stopped, failed or absent).
pub fn service_not_running(host: &dyn Host, unit: &str) -> Result<()> {
    tracing::debug!("Checking that {} is not running", unit);
    let state = host.status(unit)?;
    if state == ServiceState::Running {
        return Err(HostcheckError::ServiceState {
            unit: unit.to_string(),
            expected: "not running".to_string(),
            actual: state,
        });
    }
    tracing::debug!("{} is {}", unit, state);
    Ok(())
}

/// Resolve `tool` on the search path.
pub fn tool_installed(host: &dyn Host, tool: &str) -> Result<PathBuf> {
    tracing::debug!("Checking if '{}' is available", tool);
    let path = host.look_path(tool)?;
    tracing::debug!("'{}' was found in {}", tool, path.display());
    Ok(path)
}

/// Like [`tool_installed`], but a missing tool means `what` is not
/// installed, reported as `PreconditionUnavailable`.
pub fn require_tool(host: &dyn Host, tool: &str, what: &str) -> Result<()> {
    match tool_installed(host, tool) {
        Ok(_) => Ok(()),
        Err(e @ HostcheckError::ToolNotFound { .. }) => Err(HostcheckError::PreconditionUnavailable {
            what: what.to_string(),
            reason: e.to_string(),
        }),
        Err(e) => Err(e),
    }
}
