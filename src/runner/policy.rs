//! Run policy.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::config::HostcheckConfig;

/// What a run does with each selected check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Detect only.
    Check,
    /// Detect, and remediate what fails.
    Fix,
    /// Undo previous remediations, in reverse order.
    Cleanup,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunMode::Check => "check",
            RunMode::Fix => "fix",
            RunMode::Cleanup => "cleanup",
        };
        f.write_str(s)
    }
}

/// Mode plus the per-check overrides applied during a run.
#[derive(Debug, Clone)]
pub struct RunPolicy {
    /// What to do with each check.
    pub mode: RunMode,
    /// Check ids that are not run at all.
    pub skip: HashSet<String>,
    /// Check ids whose failure does not fail the run.
    pub warn: HashSet<String>,
}

impl RunPolicy {
    /// A policy with empty skip and warn lists.
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            skip: HashSet::new(),
            warn: HashSet::new(),
        }
    }

    /// Policy for `mode` with the lists from `config`.
    pub fn from_config(mode: RunMode, config: &HostcheckConfig) -> Self {
        Self::new(mode)
            .with_skip(config.skip.iter().cloned())
            .with_warn(config.warn.iter().cloned())
    }

    /// Add ids to the skip list.
    pub fn with_skip(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.skip.extend(ids);
        self
    }

    /// Add ids to the warn list.
    pub fn with_warn(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.warn.extend(ids);
        self
    }

    /// Whether `id` is skipped.
    pub fn is_skipped(&self, id: &str) -> bool {
        self.skip.contains(id)
    }

    /// Whether a failure of `id` is only a warning.
    pub fn is_warn_only(&self, id: &str) -> bool {
        self.warn.contains(id)
    }
}
