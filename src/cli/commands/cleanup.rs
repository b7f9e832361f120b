//! Cleanup command implementation.
//!
//! The `hostcheck cleanup` command removes what `fix` installed. It asks
//! first unless `--yes` is given.

use std::path::{Path, PathBuf};

use crate::checks::CheckRegistry;
use crate::cli::args::CleanupArgs;
use crate::config::DnsBackend;
use crate::error::Result;
use crate::host::Host;
use crate::runner::{RunMode, RunPolicy, Runner};
use crate::ui::UserInterface;

use super::dispatcher::{load_run_config, Command, CommandResult, EXIT_FAILURE, EXIT_USAGE};
use super::display::{show_details, show_summary};

/// Confirmation key, also `HOSTCHECK_PROMPT_CLEANUP` in non-interactive mode.
const CONFIRM_KEY: &str = "cleanup";

/// The cleanup command implementation.
pub struct CleanupCommand<'a> {
    host: &'a dyn Host,
    config_path: Option<PathBuf>,
    args: CleanupArgs,
}

impl<'a> CleanupCommand<'a> {
    /// Create a new cleanup command.
    pub fn new(host: &'a dyn Host, config_path: Option<&Path>, args: CleanupArgs) -> Self {
        Self {
            host,
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for CleanupCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        // The configured backend is ignored: a host may have switched
        // backends since it was fixed.
        let config = load_run_config(self.config_path.as_deref(), &[], None, ui)?;
        let registry = CheckRegistry::for_backend(self.args.backend.unwrap_or(DnsBackend::Auto));

        if !self.args.yes {
            match ui.confirm(
                CONFIRM_KEY,
                "Remove hostcheck configuration files and reload NetworkManager?",
                false,
            ) {
                Ok(true) => {}
                Ok(false) => {
                    ui.message("Cleanup cancelled");
                    return Ok(CommandResult::failure(EXIT_FAILURE));
                }
                Err(e) => {
                    ui.error(&e.to_string());
                    ui.show_hint("Pass --yes to clean up without confirmation");
                    return Ok(CommandResult::failure(EXIT_USAGE));
                }
            }
        }

        ui.show_header("Cleaning up host");
        let report = Runner::new(self.host, RunPolicy::from_config(RunMode::Cleanup, &config))
            .run(&registry, ui);
        show_details(ui, &report);
        show_summary(ui, &report);

        Ok(CommandResult::from_success(report.success()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{CRC_DISPATCHER_SCRIPT, CRC_DNSMASQ_CONFIG, NM_DNSMASQ_CONFIG};
    use crate::host::MemoryHost;
    use crate::ui::{MockUI, NonInteractiveUI, OutputMode};
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn empty_config() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "dns_backend: dnsmasq\n").unwrap();
        (temp, path)
    }

    fn fixed_host() -> MemoryHost {
        MemoryHost::new()
            .with_tool("nmcli")
            .with_file(NM_DNSMASQ_CONFIG.path, NM_DNSMASQ_CONFIG.content.as_bytes(), 0o644)
            .with_file(CRC_DNSMASQ_CONFIG.path, CRC_DNSMASQ_CONFIG.content.as_bytes(), 0o644)
            .with_file(CRC_DISPATCHER_SCRIPT.path, CRC_DISPATCHER_SCRIPT.content.as_bytes(), 0o755)
    }

    #[test]
    fn yes_removes_every_backend_file() {
        let (_temp, path) = empty_config();
        let host = fixed_host();
        let args = CleanupArgs {
            yes: true,
            backend: None,
        };
        let mut ui = MockUI::new();

        let result = CleanupCommand::new(&host, Some(&path), args).execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.prompts_shown().is_empty());
        assert!(host.file(NM_DNSMASQ_CONFIG.path).is_none());
        assert!(host.file(CRC_DNSMASQ_CONFIG.path).is_none());
        assert!(host.file(CRC_DISPATCHER_SCRIPT.path).is_none());
    }

    #[test]
    fn backend_flag_limits_cleanup() {
        let (_temp, path) = empty_config();
        let host = fixed_host();
        let args = CleanupArgs {
            yes: true,
            backend: Some(DnsBackend::SystemdResolved),
        };
        let mut ui = MockUI::new();

        CleanupCommand::new(&host, Some(&path), args).execute(&mut ui).unwrap();

        assert!(host.file(CRC_DISPATCHER_SCRIPT.path).is_none());
        assert!(host.file(CRC_DNSMASQ_CONFIG.path).is_some());
    }

    #[test]
    fn declined_confirmation_changes_nothing() {
        let (_temp, path) = empty_config();
        let host = fixed_host();
        let mut ui = MockUI::new();
        ui.set_confirm_response(CONFIRM_KEY, false);

        let result = CleanupCommand::new(&host, Some(&path), CleanupArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, EXIT_FAILURE);
        assert!(host.mutations().is_empty());
        assert!(ui.has_message("cancelled"));
    }

    #[test]
    fn confirmed_prompt_proceeds() {
        let (_temp, path) = empty_config();
        let host = fixed_host();
        let mut ui = MockUI::new();
        ui.set_confirm_response(CONFIRM_KEY, true);

        let result = CleanupCommand::new(&host, Some(&path), CleanupArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(ui.prompts_shown(), &[CONFIRM_KEY.to_string()]);
        assert_eq!(host.reloads().len(), 3);
    }

    #[test]
    fn non_interactive_without_yes_aborts() {
        let (_temp, path) = empty_config();
        let host = fixed_host();
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Silent, HashMap::new());

        let result = CleanupCommand::new(&host, Some(&path), CleanupArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, EXIT_USAGE);
        assert!(host.mutations().is_empty());
    }
}
