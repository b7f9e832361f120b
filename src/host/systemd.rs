//! `systemctl`-backed service manager.

use crate::error::{HostcheckError, Result};
use crate::shell::{display_command, execute, execute_privileged, CommandOptions};

use super::{ServiceManager, ServiceState};

/// Talks to the system instance of systemd.
#[derive(Debug, Clone, Default)]
pub struct SystemdServiceManager;

impl SystemdServiceManager {
    /// Create a new service manager client.
    pub fn new() -> Self {
        Self
    }
}

impl ServiceManager for SystemdServiceManager {
    fn status(&self, unit: &str) -> Result<ServiceState> {
        let args = ["show", "--property=LoadState", "--property=ActiveState", unit];
        let query_err = |message: String| HostcheckError::ServiceQuery {
            unit: unit.to_string(),
            message,
        };

        let result = execute("systemctl", &args, &CommandOptions::captured())
            .map_err(|e| query_err(e.to_string()))?
            .into_checked(&display_command("systemctl", &args))
            .map_err(|e| query_err(e.to_string()))?;

        let state = parse_show_output(&result.stdout);
        tracing::debug!("{} is {}", unit, state);
        Ok(state)
    }

    fn reload(&self, unit: &str) -> Result<()> {
        tracing::debug!("Reloading {}", unit);
        execute_privileged(
            &format!("reload {}", unit),
            "systemctl",
            &["reload", unit],
        )
        .map_err(|e| HostcheckError::ServiceReload {
            unit: unit.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

/// Map `systemctl show -p LoadState -p ActiveState` output to a state.
pub fn parse_show_output(output: &str) -> ServiceState {
    let mut load_state = None;
    let mut active_state = None;

    for line in output.lines() {
        match line.trim().split_once('=') {
            Some(("LoadState", value)) => load_state = Some(value),
            Some(("ActiveState", value)) => active_state = Some(value),
            _ => {}
        }
    }

    if load_state == Some("not-found") {
        return ServiceState::NotFound;
    }

    match active_state {
        Some("active") | Some("reloading") => ServiceState::Running,
        Some("inactive") | Some("deactivating") => ServiceState::Stopped,
        Some("failed") => ServiceState::Error,
        _ => ServiceState::Unknown,
    }
}
