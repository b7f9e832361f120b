//! Error types for hostcheck operations.
//!
//! This module defines [`HostcheckError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Host primitives (file writes, unit reloads, PATH lookups) report the
//!   resource they touched and the underlying cause
//! - [`Check`](crate::checks::Check) wraps those into the check-level
//!   variants (`DetectionFailed`, `RemediationFailed`, `UndoFailed`)
//! - Use `anyhow::Error` (via `HostcheckError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

use crate::host::ServiceState;

/// Core error type for hostcheck operations.
#[derive(Debug, Error)]
pub enum HostcheckError {
    /// The host does not (yet) have the property a check verifies.
    #[error("{check}: {reason}")]
    DetectionFailed { check: String, reason: String },

    /// A fix was attempted and failed, possibly after partially applying.
    #[error("Failed to fix '{check}': {reason}")]
    RemediationFailed { check: String, reason: String },

    /// A cleanup was attempted and failed.
    #[error("Failed to clean up '{check}': {reason}")]
    UndoFailed { check: String, reason: String },

    /// A subsystem a cleanup depends on is not installed.
    #[error("{what} is not available: {reason}")]
    PreconditionUnavailable { what: String, reason: String },

    /// Remediation was requested for a check that cannot be fixed.
    #[error("'{check}' cannot be fixed automatically")]
    NoFix { check: String },

    /// Expected file does not exist.
    #[error("{path} does not exist")]
    FileAbsent { path: PathBuf },

    /// File exists but its content is not the expected content.
    #[error("{path} has unexpected content")]
    FileContentDiffers { path: PathBuf },

    /// Privileged write failed.
    #[error("Failed to write {path}: {message}")]
    PrivilegedWrite { path: PathBuf, message: String },

    /// Privileged removal failed.
    #[error("Failed to remove {path}: {message}")]
    PrivilegedRemove { path: PathBuf, message: String },

    /// The service manager could not be queried.
    #[error("Failed to query {unit}: {message}")]
    ServiceQuery { unit: String, message: String },

    /// A unit reload failed.
    #[error("Failed to reload {unit}: {message}")]
    ServiceReload { unit: String, message: String },

    /// A unit is not in the state a check requires.
    #[error("{unit} is {actual}, expected {expected}")]
    ServiceState {
        unit: String,
        expected: String,
        actual: ServiceState,
    },

    /// Executable could not be found on PATH.
    #[error("{tool} was not found in PATH")]
    ToolNotFound { tool: String },

    /// External command failed.
    #[error("Command failed with exit code {code:?}: {command}{}", format_stderr(.stderr))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Explicitly requested configuration file not found.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// No check is registered under this id.
    #[error("Unknown check: {id}")]
    UnknownCheck { id: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(" ({})", trimmed)
    }
}

/// Result type alias for hostcheck operations.
pub type Result<T> = std::result::Result<T, HostcheckError>;
