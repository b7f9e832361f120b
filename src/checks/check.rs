//! The check definition.
//!
//! A [`Check`] pairs metadata with up to three plain functions: one that
//! detects whether a host property holds, one that fixes it, and one
//! that reverses the fix. The functions carry no state; everything they
//! need comes from the [`Host`] they are handed.
//!
//! Checks are built with `const` constructors so registries can be
//! `static` tables. The constructors are the only way to build one, which
//! keeps [`CheckFlags::NO_FIX`] and the absence of a fix in agreement.

use std::fmt;
use std::ops::BitOr;

use serde::Serialize;

use crate::error::{HostcheckError, Result};
use crate::host::Host;

/// Signature shared by detect, fix and cleanup functions.
pub type CheckFn = fn(&dyn Host) -> Result<()>;

/// Capability bits attached to a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CheckFlags(u8);

impl CheckFlags {
    /// No flags.
    pub const NONE: Self = Self(0);
    /// Failure cannot be fixed automatically.
    pub const NO_FIX: Self = Self(1);
    /// Only relevant when setting the host up; never cleaned up.
    pub const SETUP_ONLY: Self = Self(1 << 1);
    /// Only relevant when cleaning the host.
    pub const CLEANUP_ONLY: Self = Self(1 << 2);

    /// Whether every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Bits of both sets.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Names of the set bits, for display.
    pub fn names(self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(Self::NO_FIX) {
            names.push("no-fix");
        }
        if self.contains(Self::SETUP_ONLY) {
            names.push("setup-only");
        }
        if self.contains(Self::CLEANUP_ONLY) {
            names.push("cleanup-only");
        }
        names
    }
}

impl BitOr for CheckFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl Serialize for CheckFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.names().serialize(serializer)
    }
}

/// One verifiable host property.
#[derive(Clone, Copy)]
pub struct Check {
    id: &'static str,
    description: &'static str,
    detect: CheckFn,
    fix_description: &'static str,
    fix: Option<CheckFn>,
    cleanup_description: &'static str,
    cleanup: Option<CheckFn>,
    flags: CheckFlags,
}

impl Check {
    /// A check that can only report.
    ///
    /// `fix_description` is shown to the operator as the manual action to
    /// take when detection fails.
    pub const fn no_fix(
        id: &'static str,
        description: &'static str,
        detect: CheckFn,
        fix_description: &'static str,
    ) -> Self {
        Self {
            id,
            description,
            detect,
            fix_description,
            fix: None,
            cleanup_description: "",
            cleanup: None,
            flags: CheckFlags::NO_FIX,
        }
    }

    /// A check with an automatic fix.
    pub const fn fixable(
        id: &'static str,
        description: &'static str,
        detect: CheckFn,
        fix_description: &'static str,
        fix: CheckFn,
    ) -> Self {
        Self {
            id,
            description,
            detect,
            fix_description,
            fix: Some(fix),
            cleanup_description: "",
            cleanup: None,
            flags: CheckFlags::NONE,
        }
    }

    /// Attach a cleanup that reverses the fix.
    pub const fn with_cleanup(mut self, description: &'static str, cleanup: CheckFn) -> Self {
        self.cleanup_description = description;
        self.cleanup = Some(cleanup);
        self
    }

    /// Exclude this check from cleanup runs.
    pub const fn setup_only(mut self) -> Self {
        self.flags = self.flags.union(CheckFlags::SETUP_ONLY);
        self
    }

    /// Run this check in cleanup runs only.
    pub const fn cleanup_only(mut self) -> Self {
        self.flags = self.flags.union(CheckFlags::CLEANUP_ONLY);
        self
    }

    /// Stable identifier, used by skip and warn lists.
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// What is being checked.
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// What the fix does, or the manual action for no-fix checks.
    pub fn fix_description(&self) -> &'static str {
        self.fix_description
    }

    /// What the cleanup does, if there is one.
    pub fn cleanup_description(&self) -> Option<&'static str> {
        self.cleanup.map(|_| self.cleanup_description)
    }

    /// Capability flags.
    pub fn flags(&self) -> CheckFlags {
        self.flags
    }

    /// Whether [`remediate`](Self::remediate) can do anything.
    pub fn is_fixable(&self) -> bool {
        self.fix.is_some() && !self.flags.contains(CheckFlags::NO_FIX)
    }

    /// Whether [`undo`](Self::undo) can do anything.
    pub fn is_undoable(&self) -> bool {
        self.cleanup.is_some()
    }

    /// Verify the property. Reads host state only.
    pub fn detect(&self, host: &dyn Host) -> Result<()> {
        (self.detect)(host).map_err(|e| {
            tracing::debug!("{} failed: {}", self.id, e);
            HostcheckError::DetectionFailed {
                check: self.id.to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// Bring the host into the state [`detect`](Self::detect) expects.
    ///
    /// Rejected with `NoFix` before any check code runs when the check
    /// has no fix. Does not re-run detection.
    pub fn remediate(&self, host: &dyn Host) -> Result<()> {
        let fix = match self.fix {
            Some(fix) if !self.flags.contains(CheckFlags::NO_FIX) => fix,
            _ => {
                return Err(HostcheckError::NoFix {
                    check: self.id.to_string(),
                })
            }
        };

        fix(host).map_err(|e| HostcheckError::RemediationFailed {
            check: self.id.to_string(),
            reason: e.to_string(),
        })
    }

    /// Reverse whatever [`remediate`](Self::remediate) did.
    ///
    /// Succeeds when there is nothing to undo, including checks without a
    /// cleanup.
    pub fn undo(&self, host: &dyn Host) -> Result<()> {
        let Some(cleanup) = self.cleanup else {
            return Ok(());
        };

        cleanup(host).map_err(|e| HostcheckError::UndoFailed {
            check: self.id.to_string(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("fixable", &self.is_fixable())
            .field("undoable", &self.is_undoable())
            .field("flags", &self.flags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryHost, PrivilegedFs, ServiceManager};
    use std::path::Path;

    fn always_ok(_: &dyn Host) -> Result<()> {
        Ok(())
    }

    fn marker_present(host: &dyn Host) -> Result<()> {
        host.file_content_equals(Path::new("/tmp/marker"), b"x")
    }

    fn write_marker(host: &dyn Host) -> Result<()> {
        host.write_file_as_privileged("marker", b"x", Path::new("/tmp/marker"), 0o644)
    }

    fn remove_marker(host: &dyn Host) -> Result<()> {
        host.remove_file_as_privileged("marker", Path::new("/tmp/marker"))
    }

    fn reload_fails(host: &dyn Host) -> Result<()> {
        host.reload("broken")
    }

    fn panics(_: &dyn Host) -> Result<()> {
        panic!("fix must not be called on a no-fix check");
    }

    const MARKER: Check = Check::fixable(
        "marker",
        "Checking marker",
        marker_present,
        "Writing marker",
        write_marker,
    )
    .with_cleanup("Removing marker", remove_marker);

    #[test]
    fn flags_contains_and_union() {
        let flags = CheckFlags::NO_FIX | CheckFlags::SETUP_ONLY;
        assert!(flags.contains(CheckFlags::NO_FIX));
        assert!(flags.contains(CheckFlags::SETUP_ONLY));
        assert!(!flags.contains(CheckFlags::CLEANUP_ONLY));
        assert!(CheckFlags::NONE.contains(CheckFlags::NONE));
        assert_eq!(flags.names(), vec!["no-fix", "setup-only"]);
    }

    #[test]
    fn no_fix_constructor_sets_flag_and_has_no_fix() {
        let check = Check::no_fix("x", "Checking x", always_ok, "Install x manually");
        assert!(check.flags().contains(CheckFlags::NO_FIX));
        assert!(!check.is_fixable());
        assert!(!check.is_undoable());
        assert_eq!(check.fix_description(), "Install x manually");
    }

    #[test]
    fn remediate_rejects_no_fix_before_calling_in() {
        let check = Check::no_fix("x", "Checking x", panics, "manual");
        let host = MemoryHost::new();

        let err = check.remediate(&host).unwrap_err();
        assert!(matches!(err, HostcheckError::NoFix { ref check } if check == "x"));
        assert!(host.mutations().is_empty());
    }

    #[test]
    fn detect_wraps_failure_with_check_id() {
        let host = MemoryHost::new();
        let err = MARKER.detect(&host).unwrap_err();
        match err {
            HostcheckError::DetectionFailed { check, reason } => {
                assert_eq!(check, "marker");
                assert!(reason.contains("/tmp/marker"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn remediate_then_detect_passes() {
        let host = MemoryHost::new();
        MARKER.remediate(&host).unwrap();
        MARKER.detect(&host).unwrap();
    }

    #[test]
    fn remediate_wraps_failure() {
        let check = Check::fixable("r", "Checking r", always_ok, "Reloading", reload_fails);
        let host = MemoryHost::new().failing_reload("broken");

        let err = check.remediate(&host).unwrap_err();
        assert!(matches!(err, HostcheckError::RemediationFailed { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn undo_without_cleanup_is_noop() {
        let check = Check::no_fix("x", "Checking x", always_ok, "manual");
        let host = MemoryHost::new();
        check.undo(&host).unwrap();
        assert!(host.mutations().is_empty());
    }

    #[test]
    fn undo_wraps_failure() {
        let host = MemoryHost::new()
            .with_file("/tmp/marker", b"x", 0o644)
            .failing_removes();
        let err = MARKER.undo(&host).unwrap_err();
        assert!(matches!(err, HostcheckError::UndoFailed { .. }));
        assert!(err.to_string().contains("/tmp/marker"));
    }

    #[test]
    fn cleanup_description_only_when_undoable() {
        assert_eq!(MARKER.cleanup_description(), Some("Removing marker"));
        let check = Check::no_fix("x", "Checking x", always_ok, "manual");
        assert_eq!(check.cleanup_description(), None);
    }

    #[test]
    fn setup_and_cleanup_only_flags() {
        let setup = Check::no_fix("s", "s", always_ok, "m").setup_only();
        assert!(setup.flags().contains(CheckFlags::SETUP_ONLY));
        assert!(setup.flags().contains(CheckFlags::NO_FIX));

        let cleanup = MARKER.cleanup_only();
        assert!(cleanup.flags().contains(CheckFlags::CLEANUP_ONLY));
        assert!(cleanup.is_fixable());
    }

    #[test]
    fn flags_serialize_as_names() {
        let json = serde_json::to_string(&CheckFlags::NO_FIX).unwrap();
        assert_eq!(json, "[\"no-fix\"]");
    }
}
