//! External command execution.
//!
//! Commands are run from an argument vector, never through a shell, so
//! paths and unit names are passed verbatim.

use crate::error::{HostcheckError, Result};
use std::collections::HashMap;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::platform::is_elevated;

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Turn a non-zero exit into `CommandFailed`.
    pub fn into_checked(self, command: &str) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(HostcheckError::CommandFailed {
                command: command.to_string(),
                code: self.exit_code,
                stderr: self.stderr,
            })
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,
}

impl CommandOptions {
    /// Capture both streams with a C locale, for output we parse.
    pub fn captured() -> Self {
        let mut env = HashMap::new();
        env.insert("LC_ALL".to_string(), "C".to_string());
        Self {
            env,
            capture_stdout: true,
            capture_stderr: true,
        }
    }
}

/// Render an argument vector for messages and logs.
pub fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Execute `program` with `args`.
///
/// A non-zero exit is returned as a failed [`CommandResult`]; only a
/// failure to spawn is an error.
pub fn execute(program: &str, args: &[&str], options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args);

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    if options.capture_stdout {
        cmd.stdout(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
    }

    if options.capture_stderr {
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stderr(Stdio::inherit());
    }

    tracing::debug!("Running: {}", display_command(program, args));

    let output = cmd.output().map_err(|e| HostcheckError::CommandFailed {
        command: display_command(program, args),
        code: None,
        stderr: e.to_string(),
    })?;

    let duration = start.elapsed();

    let stdout = if options.capture_stdout {
        String::from_utf8_lossy(&output.stdout).to_string()
    } else {
        String::new()
    };

    let stderr = if options.capture_stderr {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::new()
    };

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Execute a command as root, going through `sudo` when not already root.
///
/// `description` is logged before escalation so an unexpected password
/// prompt can be traced back to the operation that caused it. Fails with
/// `CommandFailed` on a non-zero exit.
pub fn execute_privileged(description: &str, program: &str, args: &[&str]) -> Result<CommandResult> {
    let options = CommandOptions::captured();
    if is_elevated() {
        let result = execute(program, args, &options)?;
        return result.into_checked(&display_command(program, args));
    }

    tracing::info!("Using root access: {}", description);
    let mut sudo_args = vec!["--", program];
    sudo_args.extend_from_slice(args);
    let result = execute("sudo", &sudo_args, &options)?;
    result.into_checked(&display_command("sudo", &sudo_args))
}
