//! List command implementation.
//!
//! The `hostcheck list` command lists every known check, or shows one.

use serde::Serialize;

use crate::checks::{Check, CheckFlags, CheckGroup, CheckRegistry};
use crate::cli::args::ListArgs;
use crate::error::{HostcheckError, Result};
use crate::ui::theme::HostcheckTheme;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// One row of `hostcheck list`.
#[derive(Debug, Serialize)]
pub struct CheckEntry {
    pub id: &'static str,
    pub group: &'static str,
    pub description: &'static str,
    pub fixable: bool,
    pub undoable: bool,
    pub flags: CheckFlags,
    pub fix_description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup_description: Option<&'static str>,
}

impl CheckEntry {
    fn new(group: &CheckGroup, check: &Check) -> Self {
        Self {
            id: check.id(),
            group: group.name,
            description: check.description(),
            fixable: check.is_fixable(),
            undoable: check.is_undoable(),
            flags: check.flags(),
            fix_description: check.fix_description(),
            cleanup_description: check.cleanup_description(),
        }
    }
}

/// The list command implementation.
pub struct ListCommand {
    args: ListArgs,
    registry: CheckRegistry,
}

impl ListCommand {
    /// Create a new list command over the built-in checks.
    pub fn new(args: ListArgs) -> Self {
        Self {
            args,
            registry: CheckRegistry::with_builtins(),
        }
    }

    /// Entries to show, in registry order.
    pub fn entries(&self) -> Result<Vec<CheckEntry>> {
        let entries: Vec<CheckEntry> = self
            .registry
            .iter()
            .filter(|(_, c)| self.args.id.as_deref().is_none_or(|id| c.id() == id))
            .map(|(g, c)| CheckEntry::new(g, c))
            .collect();

        match &self.args.id {
            Some(id) if entries.is_empty() => Err(HostcheckError::UnknownCheck { id: id.clone() }),
            _ => Ok(entries),
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let entries = self.entries()?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&entries)
                .map_err(|e| HostcheckError::Other(e.into()))?;
            ui.output(&json);
            return Ok(CommandResult::success());
        }

        let theme = HostcheckTheme::new();
        let mut current_group = "";
        for entry in &entries {
            if entry.group != current_group {
                if !current_group.is_empty() {
                    ui.message("");
                }
                ui.message(&format!("  {}", theme.key.apply_to(format!("{}:", entry.group))));
                current_group = entry.group;
            }

            ui.message(&format!(
                "    {} {}",
                theme.highlight.apply_to(entry.id),
                theme.dim.apply_to(format!(
                    "(fix: {}, cleanup: {})",
                    yes_no(entry.fixable),
                    yes_no(entry.undoable)
                ))
            ));
            ui.message(&format!("      {}", theme.dim.apply_to(entry.description)));

            if self.args.id.is_some() {
                ui.message(&format!("      fix: {}", entry.fix_description));
                if let Some(cleanup) = entry.cleanup_description {
                    ui.message(&format!("      cleanup: {}", cleanup));
                }
            }
        }

        Ok(CommandResult::success())
    }
}
