//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{HostcheckError, Result};

use super::theme::HostcheckTheme;
use super::{OutputMode, SpinnerHandle, UserInterface};

/// Prefix of environment variables that answer prompts.
const PROMPT_ENV_PREFIX: &str = "HOSTCHECK_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `HOSTCHECK_PROMPT_<KEY>` environment
/// variables; a prompt without an answer is an error.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn output(&mut self, text: &str) {
        println!("{}", text);
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("  → {}", hint);
        }
    }

    fn confirm(&mut self, key: &str, question: &str, _default: bool) -> Result<bool> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, key.to_uppercase());
        if let Some(value) = self.env_overrides.get(&env_key) {
            return Ok(matches!(
                value.to_lowercase().as_str(),
                "true" | "yes" | "y" | "1"
            ));
        }

        Err(HostcheckError::Other(anyhow::anyhow!(
            "Cannot ask '{}' in non-interactive mode (set {} or pass --yes)",
            question,
            env_key
        )))
    }

    fn start_spinner(&mut self, _message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(NoopSpinner {
            visible: self.mode.shows_status(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that only prints the final line (for non-interactive mode).
struct NoopSpinner {
    visible: bool,
}

impl NoopSpinner {
    fn print(&self, line: String) {
        if self.visible {
            println!("{}", line);
        }
    }
}

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        self.print(HostcheckTheme::plain().format_success(msg));
    }

    fn finish_warning(&mut self, msg: &str) {
        self.print(HostcheckTheme::plain().format_warning(msg));
    }

    fn finish_error(&mut self, msg: &str) {
        self.print(HostcheckTheme::plain().format_error(msg));
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.print(HostcheckTheme::plain().format_skipped(msg));
    }
}
