//! Configuration schema definitions for hostcheck.
//!
//! This module contains the struct definitions that map to the YAML
//! configuration file format.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Root configuration structure for config.yml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct HostcheckConfig {
    /// Which split-DNS setup to verify
    pub dns_backend: DnsBackend,

    /// Check ids that are never run
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skip: Vec<String>,

    /// Check ids whose failure is reported as a warning only
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warn: Vec<String>,

    /// Global settings
    pub settings: Settings,
}

impl HostcheckConfig {
    /// Whether `id` is on the skip list.
    pub fn is_skipped(&self, id: &str) -> bool {
        self.skip.iter().any(|s| s == id)
    }

    /// Whether `id` is on the warn list.
    pub fn is_warn_only(&self, id: &str) -> bool {
        self.warn.iter().any(|s| s == id)
    }

    /// Apply command-line overrides.
    ///
    /// Extra skip ids are appended; a backend replaces the configured one.
    pub fn with_overrides(mut self, skip: &[String], backend: Option<DnsBackend>) -> Self {
        for id in skip {
            if !self.is_skipped(id) {
                self.skip.push(id.clone());
            }
        }
        if let Some(backend) = backend {
            self.dns_backend = backend;
        }
        self
    }
}

/// Global settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Default output mode: verbose, normal, quiet, silent
    pub default_output: OutputMode,
}

/// Output verbosity mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Verbose,
    #[default]
    Normal,
    Quiet,
    Silent,
}

/// How split DNS is provided on the host.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum DnsBackend {
    /// Use systemd-resolved if it is running, dnsmasq otherwise
    #[default]
    Auto,
    /// NetworkManager-managed dnsmasq
    Dnsmasq,
    /// systemd-resolved with a NetworkManager dispatcher script
    SystemdResolved,
}

impl fmt::Display for DnsBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DnsBackend::Auto => "auto",
            DnsBackend::Dnsmasq => "dnsmasq",
            DnsBackend::SystemdResolved => "systemd-resolved",
        };
        f.write_str(s)
    }
}

/// JSON Schema for the configuration file.
pub fn config_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(HostcheckConfig);
    serde_json::to_value(&schema).unwrap_or_default()
}
