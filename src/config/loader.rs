//! Configuration file discovery and loading.
//!
//! hostcheck reads a single YAML file. The default location is
//! [`DEFAULT_CONFIG_PATH`]; an explicit path can be given with `--config`
//! or the `HOSTCHECK_CONFIG` environment variable.

use crate::config::schema::HostcheckConfig;
use crate::error::{HostcheckError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// System-wide configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/hostcheck/config.yml";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "HOSTCHECK_CONFIG";

/// A parsed configuration and where it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// The parsed configuration (defaults when no file was read)
    pub config: HostcheckConfig,

    /// File the configuration was read from, if any
    pub source: Option<PathBuf>,
}

/// Load a single config file and parse it into HostcheckConfig.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<HostcheckConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            HostcheckError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            HostcheckError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into HostcheckConfig.
///
/// An empty document yields the defaults.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<HostcheckConfig> {
    if content.trim().is_empty() {
        return Ok(HostcheckConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| HostcheckError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load config with optional path override.
///
/// An explicit path must exist. Without one, the file at `default_path`
/// is read if present and the defaults are used otherwise.
pub fn load_config_from(explicit: Option<&Path>, default_path: &Path) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        tracing::debug!("Loading config from {}", path.display());
        return Ok(LoadedConfig {
            config: load_config_file(path)?,
            source: Some(path.to_path_buf()),
        });
    }

    match load_config_file(default_path) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", default_path.display());
            Ok(LoadedConfig {
                config,
                source: Some(default_path.to_path_buf()),
            })
        }
        Err(HostcheckError::ConfigNotFound { .. }) => {
            tracing::debug!("No config at {}, using defaults", default_path.display());
            Ok(LoadedConfig::default())
        }
        Err(e) => Err(e),
    }
}

/// Load config from `explicit` or [`DEFAULT_CONFIG_PATH`].
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    load_config_from(explicit, Path::new(DEFAULT_CONFIG_PATH))
}
