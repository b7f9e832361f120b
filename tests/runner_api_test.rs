//! Integration tests for the runner through the public API.

use hostcheck::checks::{CheckRegistry, CRC_DNSMASQ_CONFIG, NM_DNSMASQ_CONFIG};
use hostcheck::config::{DnsBackend, HostcheckConfig};
use hostcheck::host::{MemoryHost, ServiceState};
use hostcheck::runner::{Outcome, RunMode, RunPolicy, Runner};
use hostcheck::ui::MockUI;

fn network_manager_host() -> MemoryHost {
    MemoryHost::new()
        .with_tool("nmcli")
        .with_service("NetworkManager.service", ServiceState::Running)
}

#[test]
fn fix_then_check_then_cleanup() {
    let host = network_manager_host();
    let registry = CheckRegistry::for_backend(DnsBackend::Dnsmasq);
    let mut ui = MockUI::new();

    let check = Runner::new(&host, RunPolicy::new(RunMode::Check)).run(&registry, &mut ui);
    assert!(!check.success());

    let fix = Runner::new(&host, RunPolicy::new(RunMode::Fix)).run(&registry, &mut ui);
    assert!(fix.success());
    assert_eq!(fix.counts().fixed, 2);

    let check = Runner::new(&host, RunPolicy::new(RunMode::Check)).run(&registry, &mut ui);
    assert!(check.success());
    assert_eq!(check.counts().passed, registry.len());

    let cleanup = Runner::new(&host, RunPolicy::new(RunMode::Cleanup)).run(&registry, &mut ui);
    assert!(cleanup.success());
    assert_eq!(cleanup.counts().undone, 2);
    assert!(host.file(NM_DNSMASQ_CONFIG.path).is_none());
    assert!(host.file(CRC_DNSMASQ_CONFIG.path).is_none());
}

#[test]
fn policy_from_config_applies_skip_and_warn() {
    let host = MemoryHost::new();
    let config = HostcheckConfig {
        skip: vec!["check-network-manager-installed".into()],
        warn: vec!["check-network-manager-running".into()],
        ..Default::default()
    };
    let mut ui = MockUI::new();
    let report = Runner::new(&host, RunPolicy::from_config(RunMode::Check, &config))
        .run(&CheckRegistry::for_backend(DnsBackend::SystemdResolved), &mut ui);

    assert_eq!(report.get("check-network-manager-installed"), Some(&Outcome::Skipped));
    assert!(matches!(
        report.get("check-network-manager-running"),
        Some(Outcome::Warned { .. })
    ));
    assert!(report.get("check-systemd-resolved-running").unwrap().is_failure());
    assert!(ui.has_hint("systemd-resolved is required"));
}

#[test]
fn report_serializes_to_json() {
    let host = network_manager_host();
    let mut ui = MockUI::new();
    let report = Runner::new(&host, RunPolicy::new(RunMode::Fix))
        .run(&CheckRegistry::for_backend(DnsBackend::Dnsmasq), &mut ui);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["mode"], "fix");
    let statuses: Vec<_> = json["outcomes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["status"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(statuses, vec!["passed", "passed", "passed", "fixed", "fixed"]);
    assert!(report.finished_at >= report.started_at);
}
