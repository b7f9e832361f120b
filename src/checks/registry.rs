//! Check groups and the registry that orders them.
//!
//! A [`CheckGroup`] is a static, themed table of checks. The
//! [`CheckRegistry`] holds the groups selected for a run, in order, and
//! answers lookups by id.

use std::collections::HashSet;

use crate::config::DnsBackend;
use crate::error::{HostcheckError, Result};
use crate::host::{Host, ServiceState};

use super::check::Check;
use super::network::{
    DNSMASQ_GROUP, NETWORK_MANAGER_GROUP, SYSTEMD_RESOLVED_GROUP, SYSTEMD_RESOLVED_UNIT,
};

/// An ordered, themed collection of checks.
#[derive(Debug)]
pub struct CheckGroup {
    /// Group name, e.g. "dnsmasq".
    pub name: &'static str,
    /// Checks in presentation order.
    pub checks: &'static [Check],
}

/// Ordered list of check groups.
#[derive(Debug, Clone, Default)]
pub struct CheckRegistry {
    groups: Vec<&'static CheckGroup>,
}

impl CheckRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Every group shipped with hostcheck.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(&NETWORK_MANAGER_GROUP);
        registry.register(&DNSMASQ_GROUP);
        registry.register(&SYSTEMD_RESOLVED_GROUP);
        registry
    }

    /// The groups needed to set the host up for `backend`.
    ///
    /// `backend` must already be resolved; `Auto` selects everything.
    pub fn for_backend(backend: DnsBackend) -> Self {
        let mut registry = Self::new();
        registry.register(&NETWORK_MANAGER_GROUP);
        match backend {
            DnsBackend::Dnsmasq => registry.register(&DNSMASQ_GROUP),
            DnsBackend::SystemdResolved => registry.register(&SYSTEMD_RESOLVED_GROUP),
            DnsBackend::Auto => {
                registry.register(&DNSMASQ_GROUP);
                registry.register(&SYSTEMD_RESOLVED_GROUP);
            }
        }
        registry
    }

    /// Append a group.
    pub fn register(&mut self, group: &'static CheckGroup) {
        self.groups.push(group);
    }

    /// Groups in order.
    pub fn groups(&self) -> &[&'static CheckGroup] {
        &self.groups
    }

    /// Every check with its group, in order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&'static CheckGroup, &'static Check)> + '_ {
        self.groups
            .iter()
            .flat_map(|group| group.checks.iter().map(move |check| (*group, check)))
    }

    /// Look up a check by id.
    pub fn get(&self, id: &str) -> Option<&'static Check> {
        self.iter()
            .map(|(_, check)| check)
            .find(|check| check.id() == id)
    }

    /// Whether a check with this id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of checks across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.checks.len()).sum()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fail if two checks share an id.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (group, check) in self.iter() {
            if !seen.insert(check.id()) {
                return Err(HostcheckError::Other(anyhow::anyhow!(
                    "Duplicate check id '{}' in group '{}'",
                    check.id(),
                    group.name
                )));
            }
        }
        Ok(())
    }
}

impl DnsBackend {
    /// Pick a concrete backend, asking the host when set to `Auto`.
    ///
    /// A running systemd-resolved selects `SystemdResolved`; anything
    /// else selects `Dnsmasq`.
    pub fn resolve(self, host: &dyn Host) -> Result<DnsBackend> {
        match self {
            DnsBackend::Auto => {
                let state = host.status(SYSTEMD_RESOLVED_UNIT)?;
                let backend = if state == ServiceState::Running {
                    DnsBackend::SystemdResolved
                } else {
                    DnsBackend::Dnsmasq
                };
                tracing::debug!("{} is {}, using {} backend", SYSTEMD_RESOLVED_UNIT, state, backend);
                Ok(backend)
            }
            other => Ok(other),
        }
    }
}
