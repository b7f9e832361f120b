//! Check command implementation.
//!
//! The `hostcheck check` command verifies the host without changing it.

use std::path::{Path, PathBuf};

use crate::checks::CheckRegistry;
use crate::cli::args::CheckArgs;
use crate::error::{HostcheckError, Result};
use crate::host::Host;
use crate::runner::{RunMode, RunPolicy, Runner};
use crate::ui::{NonInteractiveUI, OutputMode, UserInterface};

use super::dispatcher::{load_run_config, Command, CommandResult};
use super::display::{show_details, show_summary};

/// The check command implementation.
pub struct CheckCommand<'a> {
    host: &'a dyn Host,
    config_path: Option<PathBuf>,
    args: CheckArgs,
}

impl<'a> CheckCommand<'a> {
    /// Create a new check command.
    pub fn new(host: &'a dyn Host, config_path: Option<&Path>, args: CheckArgs) -> Self {
        Self {
            host,
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for CheckCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_run_config(
            self.config_path.as_deref(),
            &self.args.skip,
            self.args.backend,
            ui,
        )?;
        let backend = config.dns_backend.resolve(self.host)?;
        let registry = CheckRegistry::for_backend(backend);
        let runner = Runner::new(self.host, RunPolicy::from_config(RunMode::Check, &config));

        if self.args.json {
            let mut quiet = NonInteractiveUI::new(OutputMode::Silent);
            let report = runner.run(&registry, &mut quiet);
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| HostcheckError::Other(e.into()))?;
            ui.output(&json);
            return Ok(CommandResult::from_success(report.success()));
        }

        ui.show_header(&format!("Checking host ({} backend)", backend));
        let report = runner.run(&registry, ui);
        show_details(ui, &report);
        show_summary(ui, &report);

        Ok(CommandResult::from_success(report.success()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{CRC_DNSMASQ_CONFIG, NM_DNSMASQ_CONFIG};
    use crate::config::DnsBackend;
    use crate::host::{MemoryHost, ServiceState};
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn empty_config() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "").unwrap();
        (temp, path)
    }

    fn configured_host() -> MemoryHost {
        MemoryHost::new()
            .with_tool("nmcli")
            .with_service("NetworkManager.service", ServiceState::Running)
            .with_file(NM_DNSMASQ_CONFIG.path, NM_DNSMASQ_CONFIG.content.as_bytes(), 0o644)
            .with_file(CRC_DNSMASQ_CONFIG.path, CRC_DNSMASQ_CONFIG.content.as_bytes(), 0o644)
    }

    #[test]
    fn configured_host_passes() {
        let (_temp, path) = empty_config();
        let host = configured_host();
        let args = CheckArgs {
            backend: Some(DnsBackend::Dnsmasq),
            ..Default::default()
        };
        let mut ui = MockUI::new();

        let result = CheckCommand::new(&host, Some(&path), args).execute(&mut ui).unwrap();

        assert!(result.success, "{:?}", ui.errors());
        assert!(ui.has_success("5 passed"));
        assert!(host.mutations().is_empty());
    }

    #[test]
    fn auto_backend_resolves_from_host() {
        let (_temp, path) = empty_config();
        let host = configured_host();
        let mut ui = MockUI::new();

        CheckCommand::new(&host, Some(&path), CheckArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(ui.headers().iter().any(|h| h.contains("dnsmasq backend")));
    }

    #[test]
    fn missing_file_fails_with_exit_one() {
        let (_temp, path) = empty_config();
        let host = MemoryHost::new()
            .with_tool("nmcli")
            .with_service("NetworkManager.service", ServiceState::Running);
        let args = CheckArgs {
            backend: Some(DnsBackend::Dnsmasq),
            ..Default::default()
        };
        let mut ui = MockUI::new();

        let result = CheckCommand::new(&host, Some(&path), args).execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_message("check-crc-dnsmasq-file"));
        assert!(host.mutations().is_empty());
    }

    #[test]
    fn json_output_is_a_run_report() {
        let (_temp, path) = empty_config();
        let host = configured_host();
        let args = CheckArgs {
            json: true,
            skip: vec!["check-network-manager-running".to_string()],
            backend: Some(DnsBackend::Dnsmasq),
        };
        let mut ui = MockUI::new();

        CheckCommand::new(&host, Some(&path), args).execute(&mut ui).unwrap();

        assert_eq!(ui.outputs().len(), 1);
        assert!(ui.messages().is_empty());
        let json: serde_json::Value = serde_json::from_str(&ui.outputs()[0]).unwrap();
        assert_eq!(json["mode"], "check");
        let skipped = json["outcomes"]
            .as_array()
            .unwrap()
            .iter()
            .find(|o| o["id"] == "check-network-manager-running")
            .unwrap();
        assert_eq!(skipped["status"], "skipped");
        assert!(ui.spinners().is_empty());
    }

    #[test]
    fn json_report_is_written_when_configured_silent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "settings:\n  default_output: silent\n").unwrap();
        let host = configured_host();
        let args = CheckArgs {
            json: true,
            backend: Some(DnsBackend::Dnsmasq),
            ..Default::default()
        };
        let mut ui = MockUI::new();

        CheckCommand::new(&host, Some(&path), args).execute(&mut ui).unwrap();

        assert_eq!(ui.output_mode(), OutputMode::Silent);
        assert_eq!(ui.outputs().len(), 1);
        let json: serde_json::Value = serde_json::from_str(&ui.outputs()[0]).unwrap();
        assert_eq!(json["outcomes"].as_array().unwrap().len(), 5);
    }
}
