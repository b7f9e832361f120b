//! Configuration validation rules.
//!
//! - `skip` and `warn` must name registered checks
//! - an id should not appear in both lists

use crate::checks::CheckRegistry;
use crate::config::schema::HostcheckConfig;

/// Validation finding with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Rule identifier
    pub rule: String,
    /// Human-readable message
    pub message: String,
    /// Check id the finding is about
    pub check: String,
}

/// Validate a configuration against the known checks.
///
/// Collects every finding instead of stopping at the first one. None of
/// them prevent a run.
pub fn validate_config(config: &HostcheckConfig, registry: &CheckRegistry) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (list, ids) in [("skip", &config.skip), ("warn", &config.warn)] {
        for id in ids {
            if !registry.contains(id) {
                warnings.push(ValidationWarning {
                    rule: "unknown-check".to_string(),
                    message: format!("'{}' in {} list is not a known check", id, list),
                    check: id.clone(),
                });
            }
        }
    }

    for id in &config.skip {
        if config.is_warn_only(id) {
            warnings.push(ValidationWarning {
                rule: "skip-and-warn".to_string(),
                message: format!("'{}' is in both skip and warn lists; it will be skipped", id),
                check: id.clone(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(skip: &[&str], warn: &[&str]) -> HostcheckConfig {
        HostcheckConfig {
            skip: skip.iter().map(|s| s.to_string()).collect(),
            warn: warn.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn known_ids_pass() {
        let registry = CheckRegistry::with_builtins();
        let config = config(
            &["check-network-manager-running"],
            &["check-systemd-networkd-running"],
        );
        assert!(validate_config(&config, &registry).is_empty());
    }

    #[test]
    fn unknown_ids_are_reported_per_list() {
        let registry = CheckRegistry::with_builtins();
        let config = config(&["check-nope"], &["check-also-nope"]);

        let warnings = validate_config(&config, &registry);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.rule == "unknown-check"));
        assert!(warnings[0].message.contains("skip"));
        assert!(warnings[1].message.contains("warn"));
        assert_eq!(warnings[0].check, "check-nope");
    }

    #[test]
    fn id_in_both_lists_is_reported() {
        let registry = CheckRegistry::with_builtins();
        let config = config(&["check-crc-dnsmasq-file"], &["check-crc-dnsmasq-file"]);

        let warnings = validate_config(&config, &registry);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].rule, "skip-and-warn");
        assert_eq!(warnings[0].check, "check-crc-dnsmasq-file");
    }
}
