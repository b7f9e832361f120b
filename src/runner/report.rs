//! Run outcomes and reports.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::HostcheckError;

use super::policy::RunMode;

/// Result of applying the run policy to one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// Detection succeeded without changes.
    Passed,
    /// Detection failed, remediation ran, detection then succeeded.
    Fixed,
    /// The check failed and fails the run.
    Failed {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
    },
    /// The check failed but is on the warn list.
    Warned {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
    },
    /// The check is on the skip list and was not run.
    Skipped,
    /// Cleanup ran successfully.
    Undone,
}

impl Outcome {
    /// A failure carrying the error's message.
    pub fn failed(error: &HostcheckError, hint: Option<&str>) -> Self {
        Outcome::Failed {
            error: error.to_string(),
            hint: hint.map(str::to_string),
        }
    }

    /// Downgrade a failure to a warning. Other outcomes are unchanged.
    pub fn into_warning(self) -> Self {
        match self {
            Outcome::Failed { error, hint } => Outcome::Warned { error, hint },
            other => other,
        }
    }

    /// Whether this outcome fails the run.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }

    /// Short lowercase label.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Fixed => "fixed",
            Outcome::Failed { .. } => "failed",
            Outcome::Warned { .. } => "warning",
            Outcome::Skipped => "skipped",
            Outcome::Undone => "undone",
        }
    }
}

/// Outcome of one check within a run.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    /// Check id.
    pub id: String,
    /// Group the check belongs to.
    pub group: String,
    /// What happened.
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Wall-clock time spent on the check.
    pub duration_ms: u64,
}

/// Every outcome of one run, in execution order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Mode the run used.
    pub mode: RunMode,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Per-check outcomes.
    pub outcomes: Vec<CheckOutcome>,
}

impl RunReport {
    /// Start an empty report.
    pub fn new(mode: RunMode) -> Self {
        let now = Utc::now();
        Self {
            mode,
            started_at: now,
            finished_at: now,
            outcomes: Vec::new(),
        }
    }

    /// Append an outcome.
    pub fn push(&mut self, outcome: CheckOutcome) {
        self.outcomes.push(outcome);
    }

    /// Stamp the finish time.
    pub fn finish(&mut self) {
        self.finished_at = Utc::now();
    }

    /// False iff any outcome is `Failed`.
    pub fn success(&self) -> bool {
        !self.outcomes.iter().any(|o| o.outcome.is_failure())
    }

    /// Outcomes that fail the run.
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| o.outcome.is_failure())
    }

    /// Outcome for a check id.
    pub fn get(&self, id: &str) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.id == id).map(|o| &o.outcome)
    }

    /// Tally of outcomes by kind.
    pub fn counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for o in &self.outcomes {
            match o.outcome {
                Outcome::Passed => counts.passed += 1,
                Outcome::Fixed => counts.fixed += 1,
                Outcome::Failed { .. } => counts.failed += 1,
                Outcome::Warned { .. } => counts.warned += 1,
                Outcome::Skipped => counts.skipped += 1,
                Outcome::Undone => counts.undone += 1,
            }
        }
        counts
    }
}

/// Number of outcomes of each kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub passed: usize,
    pub fixed: usize,
    pub failed: usize,
    pub warned: usize,
    pub skipped: usize,
    pub undone: usize,
}

impl fmt::Display for OutcomeCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            (self.passed, "passed"),
            (self.fixed, "fixed"),
            (self.undone, "undone"),
            (self.warned, "warning"),
            (self.skipped, "skipped"),
            (self.failed, "failed"),
        ]
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, label)| format!("{} {}", n, label))
        .collect();

        if parts.is_empty() {
            f.write_str("nothing to do")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(id: &str, outcome: Outcome) -> CheckOutcome {
        CheckOutcome {
            id: id.to_string(),
            group: "g".to_string(),
            outcome,
            duration_ms: 0,
        }
    }

    #[test]
    fn empty_report_succeeds() {
        let report = RunReport::new(RunMode::Check);
        assert!(report.success());
        assert_eq!(report.counts().to_string(), "nothing to do");
    }

    #[test]
    fn any_failure_fails_the_report() {
        let mut report = RunReport::new(RunMode::Fix);
        report.push(outcome("a", Outcome::Fixed));
        report.push(outcome(
            "b",
            Outcome::Warned {
                error: "x".into(),
                hint: None,
            },
        ));
        assert!(report.success());

        report.push(outcome(
            "c",
            Outcome::Failed {
                error: "y".into(),
                hint: None,
            },
        ));
        assert!(!report.success());
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.counts().to_string(), "1 fixed, 1 warning, 1 failed");
    }

    #[test]
    fn into_warning_only_changes_failures() {
        let failed = Outcome::Failed {
            error: "e".into(),
            hint: Some("h".into()),
        };
        assert_eq!(
            failed.into_warning(),
            Outcome::Warned {
                error: "e".into(),
                hint: Some("h".into())
            }
        );
        assert_eq!(Outcome::Passed.into_warning(), Outcome::Passed);
    }

    #[test]
    fn serializes_flat_with_status_tag() {
        let mut report = RunReport::new(RunMode::Check);
        report.push(outcome(
            "a",
            Outcome::Failed {
                error: "boom".into(),
                hint: Some("do it by hand".into()),
            },
        ));
        report.push(outcome("b", Outcome::Passed));
        report.finish();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "check");
        assert_eq!(json["outcomes"][0]["id"], "a");
        assert_eq!(json["outcomes"][0]["status"], "failed");
        assert_eq!(json["outcomes"][0]["hint"], "do it by hand");
        assert_eq!(json["outcomes"][1]["status"], "passed");
        assert!(json["outcomes"][1].get("hint").is_none());
        assert!(json["started_at"].is_string());
    }
}
