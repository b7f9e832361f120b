//! Shared display helpers for run reports.
//!
//! Used by `check`, `fix` and `cleanup` to close a run the same way.

use crate::runner::{Outcome, RunReport};
use crate::ui::UserInterface;

/// Print the tally line and list what failed.
pub fn show_summary(ui: &mut dyn UserInterface, report: &RunReport) {
    let counts = report.counts();
    ui.message("");

    if report.success() {
        ui.success(&format!("{} {}", report.mode, counts));
        return;
    }

    ui.error(&format!("{} {}", report.mode, counts));
    for failure in report.failures() {
        if let Outcome::Failed { error, .. } = &failure.outcome {
            ui.message(&format!("  {} ({}): {}", failure.id, failure.group, error));
        }
    }
}

/// Verbose per-check timing lines.
pub fn show_details(ui: &mut dyn UserInterface, report: &RunReport) {
    if !ui.output_mode().shows_details() {
        return;
    }
    for o in &report.outcomes {
        ui.message(&format!(
            "  {:<36} {:<8} {}ms",
            o.id,
            o.outcome.label(),
            o.duration_ms
        ));
    }
}
