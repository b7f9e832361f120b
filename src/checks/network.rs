//! Linux networking checks.
//!
//! Split DNS for the `crc` libvirt network is provided either by the
//! dnsmasq instance NetworkManager manages, or by systemd-resolved with a
//! NetworkManager dispatcher script configuring the bridge.

use crate::error::Result;
use crate::host::Host;

use super::check::Check;
use super::patterns::{require_tool, service_not_running, service_running, tool_installed, ConfigFile};
use super::registry::CheckGroup;

/// Unit name used for reloads.
pub const NETWORK_MANAGER: &str = "NetworkManager";

/// NetworkManager's command line client; its presence means NetworkManager
/// is installed.
pub const NMCLI: &str = "nmcli";

const NETWORK_MANAGER_UNIT: &str = "NetworkManager.service";
const SYSTEMD_NETWORKD_UNIT: &str = "systemd-networkd.service";

/// Unit whose state selects the DNS backend.
pub const SYSTEMD_RESOLVED_UNIT: &str = "systemd-resolved.service";

/// Makes NetworkManager start its own dnsmasq.
pub const NM_DNSMASQ_CONFIG: ConfigFile = ConfigFile {
    path: "/etc/NetworkManager/conf.d/crc-nm-dnsmasq.conf",
    content: "[main]\ndns=dnsmasq\n",
    mode: 0o644,
    service: NETWORK_MANAGER,
};

/// Forwards the cluster domains to the VM.
pub const CRC_DNSMASQ_CONFIG: ConfigFile = ConfigFile {
    path: "/etc/NetworkManager/dnsmasq.d/crc.conf",
    content: "server=/apps-crc.testing/192.168.130.11\nserver=/crc.testing/192.168.130.11\n",
    mode: 0o644,
    service: NETWORK_MANAGER,
};

/// Configures split DNS on the `crc` bridge each time it comes up.
pub const CRC_DISPATCHER_SCRIPT: ConfigFile = ConfigFile {
    path: "/etc/NetworkManager/dispatcher.d/pre-up.d/99-crc.sh",
    content: r#"#!/bin/sh
# This is a NetworkManager dispatcher script to configure split DNS for
# the 'crc' libvirt network.
# The corresponding crc bridge is recreated each time the system reboots, so
# it cannot be configured permanently through NetworkManager.
# Changing DNS settings with nmcli requires the connection to go down/up,
# so we directly make the change using resolvectl

export LC_ALL=C

if [ "$1" = crc ]; then
        resolvectl domain "$1" ~testing
        resolvectl dns "$1" 192.168.130.11
        resolvectl default-route "$1" false
fi

exit 0
"#,
    mode: 0o755,
    service: NETWORK_MANAGER,
};

const NETWORK_MANAGER_CHECKS: &[Check] = &[
    Check::no_fix(
        "check-systemd-networkd-running",
        "Checking if systemd-networkd is running",
        check_systemd_networkd_is_not_running,
        "Network configuration with systemd-networkd is not supported",
    ),
    Check::no_fix(
        "check-network-manager-installed",
        "Checking if NetworkManager is installed",
        check_network_manager_installed,
        "NetworkManager is required and must be installed manually",
    ),
    Check::no_fix(
        "check-network-manager-running",
        "Checking if NetworkManager service is running",
        check_network_manager_is_running,
        "NetworkManager is required. Please make sure it is installed and running manually",
    ),
];

const DNSMASQ_CHECKS: &[Check] = &[
    Check::fixable(
        "check-network-manager-config",
        "Checking if /etc/NetworkManager/conf.d/crc-nm-dnsmasq.conf exists",
        check_nm_dnsmasq_config,
        "Writing NetworkManager config for crc",
        fix_nm_dnsmasq_config,
    )
    .with_cleanup(
        "Removing /etc/NetworkManager/conf.d/crc-nm-dnsmasq.conf file",
        remove_nm_dnsmasq_config,
    ),
    Check::fixable(
        "check-crc-dnsmasq-file",
        "Checking if /etc/NetworkManager/dnsmasq.d/crc.conf exists",
        check_crc_dnsmasq_config,
        "Writing dnsmasq config for crc",
        fix_crc_dnsmasq_config,
    )
    .with_cleanup(
        "Removing /etc/NetworkManager/dnsmasq.d/crc.conf file",
        remove_crc_dnsmasq_config,
    ),
];

const SYSTEMD_RESOLVED_CHECKS: &[Check] = &[
    Check::no_fix(
        "check-systemd-resolved-running",
        "Checking if the systemd-resolved service is running",
        check_systemd_resolved_is_running,
        "systemd-resolved is required on this distribution. Please make sure it is installed and running manually",
    ),
    Check::fixable(
        "check-crc-nm-dispatcher-file",
        "Checking if /etc/NetworkManager/dispatcher.d/pre-up.d/99-crc.sh exists",
        check_dispatcher_script,
        "Writing NetworkManager dispatcher file for crc",
        fix_dispatcher_script,
    )
    .with_cleanup(
        "Removing /etc/NetworkManager/dispatcher.d/pre-up.d/99-crc.sh file",
        remove_dispatcher_script,
    ),
];

/// NetworkManager must be the network stack in charge.
pub static NETWORK_MANAGER_GROUP: CheckGroup = CheckGroup {
    name: "network-manager",
    checks: NETWORK_MANAGER_CHECKS,
};

/// Split DNS through NetworkManager's dnsmasq.
pub static DNSMASQ_GROUP: CheckGroup = CheckGroup {
    name: "dnsmasq",
    checks: DNSMASQ_CHECKS,
};

/// Split DNS through systemd-resolved.
pub static SYSTEMD_RESOLVED_GROUP: CheckGroup = CheckGroup {
    name: "systemd-resolved",
    checks: SYSTEMD_RESOLVED_CHECKS,
};

fn check_systemd_networkd_is_not_running(host: &dyn Host) -> Result<()> {
    service_not_running(host, SYSTEMD_NETWORKD_UNIT)
}

fn check_network_manager_installed(host: &dyn Host) -> Result<()> {
    tool_installed(host, NMCLI).map(|_| ())
}

fn check_network_manager_is_running(host: &dyn Host) -> Result<()> {
    service_running(host, NETWORK_MANAGER_UNIT)
}

fn check_systemd_resolved_is_running(host: &dyn Host) -> Result<()> {
    service_running(host, SYSTEMD_RESOLVED_UNIT)
}

/// Config files under /etc/NetworkManager cannot exist without it.
fn network_manager_installed(host: &dyn Host) -> Result<()> {
    require_tool(host, NMCLI, "NetworkManager")
}

fn check_nm_dnsmasq_config(host: &dyn Host) -> Result<()> {
    tracing::debug!("Checking NetworkManager configuration");
    NM_DNSMASQ_CONFIG.detect(host)?;
    tracing::debug!("NetworkManager configuration is good");
    Ok(())
}

fn fix_nm_dnsmasq_config(host: &dyn Host) -> Result<()> {
    NM_DNSMASQ_CONFIG.apply(host)?;
    tracing::debug!("NetworkManager configuration fixed");
    Ok(())
}

fn remove_nm_dnsmasq_config(host: &dyn Host) -> Result<()> {
    NM_DNSMASQ_CONFIG.remove(host, network_manager_installed)
}

fn check_crc_dnsmasq_config(host: &dyn Host) -> Result<()> {
    tracing::debug!("Checking dnsmasq configuration");
    CRC_DNSMASQ_CONFIG.detect(host)?;
    tracing::debug!("dnsmasq configuration is good");
    Ok(())
}

fn fix_crc_dnsmasq_config(host: &dyn Host) -> Result<()> {
    CRC_DNSMASQ_CONFIG.apply(host)?;
    tracing::debug!("dnsmasq configuration fixed");
    Ok(())
}

fn remove_crc_dnsmasq_config(host: &dyn Host) -> Result<()> {
    CRC_DNSMASQ_CONFIG.remove(host, network_manager_installed)
}

fn check_dispatcher_script(host: &dyn Host) -> Result<()> {
    tracing::debug!("Checking NetworkManager dispatcher file for crc network");
    CRC_DISPATCHER_SCRIPT.detect(host)?;
    tracing::debug!("Dispatcher file has the expected content");
    Ok(())
}

fn fix_dispatcher_script(host: &dyn Host) -> Result<()> {
    CRC_DISPATCHER_SCRIPT.apply(host)?;
    tracing::debug!("NetworkManager dispatcher configuration fixed");
    Ok(())
}

fn remove_dispatcher_script(host: &dyn Host) -> Result<()> {
    CRC_DISPATCHER_SCRIPT.remove(host, network_manager_installed)
}
