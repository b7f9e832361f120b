//! Host checks.
//!
//! - [`check`] - the [`Check`] type: detect, remediate and undo
//! - [`patterns`] - config-file, service-state and tool-presence helpers
//! - [`network`] - the NetworkManager, dnsmasq and systemd-resolved checks
//! - [`registry`] - groups of checks and the ordered [`CheckRegistry`]
//!
//! # Example
//!
//! ```
//! use hostcheck::checks::CheckRegistry;
//! use hostcheck::host::MemoryHost;
//!
//! let host = MemoryHost::new();
//! let registry = CheckRegistry::with_builtins();
//! let check = registry.get("check-crc-dnsmasq-file").unwrap();
//!
//! assert!(check.detect(&host).is_err());
//! check.remediate(&host).unwrap();
//! check.detect(&host).unwrap();
//! ```

pub mod check;
pub mod network;
pub mod patterns;
pub mod registry;

pub use check::{Check, CheckFlags, CheckFn};
pub use network::{
    CRC_DISPATCHER_SCRIPT, CRC_DNSMASQ_CONFIG, DNSMASQ_GROUP, NETWORK_MANAGER, NETWORK_MANAGER_GROUP,
    NM_DNSMASQ_CONFIG, NMCLI, SYSTEMD_RESOLVED_GROUP, SYSTEMD_RESOLVED_UNIT,
};
pub use patterns::{require_tool, service_not_running, service_running, tool_installed, ConfigFile};
pub use registry::{CheckGroup, CheckRegistry};
