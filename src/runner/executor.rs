//! Applies a [`RunPolicy`] to the checks of a registry.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::checks::{Check, CheckFlags, CheckGroup, CheckRegistry};
use crate::host::Host;
use crate::ui::{SpinnerHandle, UserInterface};

use super::policy::{RunMode, RunPolicy};
use super::report::{CheckOutcome, Outcome, RunReport};

/// Runs checks sequentially against one host.
///
/// Every selected check is attempted; a failure never stops the run.
pub struct Runner<'a> {
    host: &'a dyn Host,
    policy: RunPolicy,
}

impl<'a> Runner<'a> {
    /// Create a runner for `host`.
    pub fn new(host: &'a dyn Host, policy: RunPolicy) -> Self {
        Self { host, policy }
    }

    /// Checks the policy's mode applies to, in execution order.
    ///
    /// Check and fix runs go forward and leave out cleanup-only checks.
    /// Cleanup runs go backward over undoable checks that are not
    /// setup-only.
    pub fn select(&self, registry: &CheckRegistry) -> Vec<(&'static CheckGroup, &'static Check)> {
        match self.policy.mode {
            RunMode::Check | RunMode::Fix => registry
                .iter()
                .filter(|(_, c)| !c.flags().contains(CheckFlags::CLEANUP_ONLY))
                .collect(),
            RunMode::Cleanup => registry
                .iter()
                .rev()
                .filter(|(_, c)| c.is_undoable() && !c.flags().contains(CheckFlags::SETUP_ONLY))
                .collect(),
        }
    }

    /// Run every selected check and collect the outcomes.
    pub fn run(&self, registry: &CheckRegistry, ui: &mut dyn UserInterface) -> RunReport {
        let selected = self.select(registry);
        info!(
            "Running {} checks in {} mode",
            selected.len(),
            self.policy.mode
        );

        let mut report = RunReport::new(self.policy.mode);
        for (group, check) in selected {
            let start = Instant::now();
            let outcome = self.run_one(check, ui);
            report.push(CheckOutcome {
                id: check.id().to_string(),
                group: group.name.to_string(),
                outcome,
                duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            });
        }
        report.finish();

        debug!("Run finished: {}", report.counts());
        report
    }

    fn run_one(&self, check: &Check, ui: &mut dyn UserInterface) -> Outcome {
        let label = self.label(check);

        if self.policy.is_skipped(check.id()) {
            debug!("Skipping {}", check.id());
            ui.start_spinner(label).finish_skipped(&format!("{} (skipped)", label));
            return Outcome::Skipped;
        }

        let mut spinner = ui.start_spinner(label);
        let mut outcome = match self.policy.mode {
            RunMode::Check => self.check(check),
            RunMode::Fix => self.fix(check, spinner.as_mut()),
            RunMode::Cleanup => self.cleanup(check),
        };

        if outcome.is_failure() && self.policy.is_warn_only(check.id()) {
            outcome = outcome.into_warning();
        }

        match &outcome {
            Outcome::Passed | Outcome::Fixed | Outcome::Undone => {
                spinner.finish_success(&format!("{} ({})", label, outcome.label()));
            }
            Outcome::Skipped => spinner.finish_skipped(&format!("{} (skipped)", label)),
            Outcome::Warned { error, hint } => {
                warn!("{} failed but is allowed to: {}", check.id(), error);
                spinner.finish_warning(&format!("{}: {}", label, error));
                if let Some(hint) = hint {
                    ui.show_hint(hint);
                }
            }
            Outcome::Failed { error, hint } => {
                spinner.finish_error(&format!("{}: {}", label, error));
                if let Some(hint) = hint {
                    ui.show_hint(hint);
                }
            }
        }

        outcome
    }

    fn label(&self, check: &Check) -> &'static str {
        match self.policy.mode {
            RunMode::Cleanup => check.cleanup_description().unwrap_or(check.description()),
            RunMode::Check | RunMode::Fix => check.description(),
        }
    }

    fn check(&self, check: &Check) -> Outcome {
        match check.detect(self.host) {
            Ok(()) => Outcome::Passed,
            Err(e) if check.is_fixable() => Outcome::failed(&e, Some("Run 'hostcheck fix' to repair")),
            Err(e) => Outcome::failed(&e, Some(check.fix_description())),
        }
    }

    fn fix(&self, check: &Check, spinner: &mut dyn SpinnerHandle) -> Outcome {
        let detected = match check.detect(self.host) {
            Ok(()) => return Outcome::Passed,
            Err(e) => e,
        };

        // Never call into a check that cannot be fixed.
        if !check.is_fixable() {
            return Outcome::failed(&detected, Some(check.fix_description()));
        }

        info!("{}", check.fix_description());
        spinner.set_message(check.fix_description());
        if let Err(e) = check.remediate(self.host) {
            return Outcome::failed(&e, None);
        }

        match check.detect(self.host) {
            Ok(()) => Outcome::Fixed,
            Err(e) => Outcome::failed(&e, None),
        }
    }

    fn cleanup(&self, check: &Check) -> Outcome {
        match check.undo(self.host) {
            Ok(()) => Outcome::Undone,
            Err(e) => Outcome::failed(&e, None),
        }
    }
}
