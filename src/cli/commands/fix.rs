//! Fix command implementation.
//!
//! The `hostcheck fix` command verifies the host and repairs every
//! failing check that has an automatic fix.

use std::path::{Path, PathBuf};

use crate::checks::CheckRegistry;
use crate::cli::args::FixArgs;
use crate::error::Result;
use crate::host::Host;
use crate::runner::{RunMode, RunPolicy, Runner};
use crate::shell::is_elevated;
use crate::ui::UserInterface;

use super::dispatcher::{load_run_config, Command, CommandResult};
use super::display::{show_details, show_summary};

/// The fix command implementation.
pub struct FixCommand<'a> {
    host: &'a dyn Host,
    config_path: Option<PathBuf>,
    args: FixArgs,
}

impl<'a> FixCommand<'a> {
    /// Create a new fix command.
    pub fn new(host: &'a dyn Host, config_path: Option<&Path>, args: FixArgs) -> Self {
        Self {
            host,
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for FixCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_run_config(
            self.config_path.as_deref(),
            &self.args.skip,
            self.args.backend,
            ui,
        )?;
        let backend = config.dns_backend.resolve(self.host)?;
        let registry = CheckRegistry::for_backend(backend);

        if !is_elevated() {
            tracing::debug!("Not running as root; file changes will go through sudo");
        }

        ui.show_header(&format!("Fixing host ({} backend)", backend));
        let report = Runner::new(self.host, RunPolicy::from_config(RunMode::Fix, &config))
            .run(&registry, ui);
        show_details(ui, &report);
        show_summary(ui, &report);

        Ok(CommandResult::from_success(report.success()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{CRC_DISPATCHER_SCRIPT, CRC_DNSMASQ_CONFIG};
    use crate::config::DnsBackend;
    use crate::host::{MemoryHost, ServiceState};
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, content).unwrap();
        (temp, path)
    }

    fn network_manager_host() -> MemoryHost {
        MemoryHost::new()
            .with_tool("nmcli")
            .with_service("NetworkManager.service", ServiceState::Running)
    }

    #[test]
    fn fix_writes_dnsmasq_files() {
        let (_temp, path) = write_config("dns_backend: dnsmasq\n");
        let host = network_manager_host();
        let mut ui = MockUI::new();

        let result = FixCommand::new(&host, Some(&path), FixArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(
            host.file(CRC_DNSMASQ_CONFIG.path),
            Some(CRC_DNSMASQ_CONFIG.content.as_bytes().to_vec())
        );
        assert!(host.file(CRC_DISPATCHER_SCRIPT.path).is_none());
        assert!(ui.has_success("2 fixed"));
    }

    #[test]
    fn fix_uses_resolved_backend_when_running() {
        let (_temp, path) = write_config("");
        let host = network_manager_host()
            .with_service("systemd-resolved.service", ServiceState::Running);
        let mut ui = MockUI::new();

        let result = FixCommand::new(&host, Some(&path), FixArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(host.file_mode(CRC_DISPATCHER_SCRIPT.path), Some(0o755));
        assert!(host.file(CRC_DNSMASQ_CONFIG.path).is_none());
    }

    #[test]
    fn cli_backend_overrides_config() {
        let (_temp, path) = write_config("dns_backend: systemd-resolved\n");
        let host = network_manager_host();
        let args = FixArgs {
            backend: Some(DnsBackend::Dnsmasq),
            ..Default::default()
        };
        let mut ui = MockUI::new();

        FixCommand::new(&host, Some(&path), args).execute(&mut ui).unwrap();

        assert!(host.file(CRC_DNSMASQ_CONFIG.path).is_some());
        assert!(host.file(CRC_DISPATCHER_SCRIPT.path).is_none());
    }

    #[test]
    fn manual_failures_show_hint_and_exit_one() {
        let (_temp, path) = write_config("dns_backend: dnsmasq\n");
        let host = MemoryHost::new();
        let mut ui = MockUI::new();

        let result = FixCommand::new(&host, Some(&path), FixArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_hint("must be installed manually"));
    }
}
