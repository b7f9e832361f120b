//! Configuration loading, parsing, and validation for hostcheck.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use hostcheck::config::{load_config, DnsBackend};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("config.yml");
//! fs::write(&path, "dns_backend: dnsmasq").unwrap();
//!
//! let loaded = load_config(Some(&path)).unwrap();
//! assert_eq!(loaded.config.dns_backend, DnsBackend::Dnsmasq);
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use schema::{config_schema, DnsBackend, HostcheckConfig, OutputMode, Settings};

pub use loader::{
    load_config, load_config_file, load_config_from, parse_config, LoadedConfig, CONFIG_ENV_VAR,
    DEFAULT_CONFIG_PATH,
};

pub use validator::{validate_config, ValidationWarning};
