//! Config command implementation.
//!
//! The `hostcheck config` command shows the resolved configuration, or
//! the JSON schema of the configuration file.

use std::path::{Path, PathBuf};

use crate::cli::args::ConfigArgs;
use crate::config::{config_schema, load_config};
use crate::error::{HostcheckError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    config_path: Option<PathBuf>,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(config_path: Option<&Path>, args: ConfigArgs) -> Self {
        Self {
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.schema {
            let json = serde_json::to_string_pretty(&config_schema())
                .map_err(|e| HostcheckError::Other(e.into()))?;
            ui.output(&json);
            return Ok(CommandResult::success());
        }

        let loaded = load_config(self.config_path.as_deref())?;
        match &loaded.source {
            Some(path) => ui.message(&format!("# {}", path.display())),
            None => ui.message("# defaults (no config file)"),
        }

        let yaml = serde_yaml::to_string(&loaded.config).map_err(|e| HostcheckError::Other(e.into()))?;
        ui.message(&yaml);

        Ok(CommandResult::success())
    }
}
