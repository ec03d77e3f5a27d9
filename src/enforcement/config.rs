//! Serializable policy configuration.

use crate::enforcement::builder::PolicyBuilder;
use crate::enforcement::rules::{Rollback, RunPolicy};
use crate::enforcement::violations::ViolationStrategy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Plain-data form of a [`RunPolicy`], suitable for configuration files.
///
/// Custom checks are code and cannot be configured; add them to the builder
/// returned by [`PolicyConfig::into_builder`].
///
/// # Example
///
/// ```rust
/// use stepflow::enforcement::{PolicyConfig, Rollback, ViolationStrategy};
///
/// let config = PolicyConfig::from_json(
///     r#"{ "max_steps": 100, "timeout_ms": 500, "on_violation": "ignore_and_log" }"#,
/// )
/// .unwrap();
///
/// let policy = config.build();
/// assert_eq!(policy.max_steps(), Some(100));
/// assert_eq!(policy.violation_strategy(), ViolationStrategy::IgnoreAndLog);
/// assert_eq!(policy.rollback(), Rollback::Indexed);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub max_steps: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub on_violation: ViolationStrategy,
    pub rollback: Rollback,
}

impl PolicyConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Builder seeded with this configuration.
    pub fn into_builder(self) -> PolicyBuilder {
        let mut builder = PolicyBuilder::new()
            .on_violation(self.on_violation)
            .rollback(self.rollback);
        if let Some(max) = self.max_steps {
            builder = builder.max_steps(max);
        }
        if let Some(ms) = self.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        builder
    }

    pub fn build(self) -> RunPolicy {
        self.into_builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_unbounded() {
        let config = PolicyConfig::from_json("{}").unwrap();
        assert_eq!(config, PolicyConfig::default());
        assert!(config.build().is_unbounded());
    }

    #[test]
    fn timeout_is_milliseconds() {
        let policy = PolicyConfig::from_json(r#"{ "timeout_ms": 1500 }"#)
            .unwrap()
            .build();
        assert_eq!(policy.timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn rollback_mode_is_configurable() {
        let config = PolicyConfig::from_json(r#"{ "rollback": "linked" }"#).unwrap();
        assert_eq!(config.rollback, Rollback::Linked);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(PolicyConfig::from_json(r#"{ "max_attempts": 3 }"#).is_err());
    }

    #[test]
    fn config_survives_json() {
        let config = PolicyConfig {
            max_steps: Some(8),
            timeout_ms: None,
            on_violation: ViolationStrategy::IgnoreAndLog,
            rollback: Rollback::Linked,
        };
        let json = config.to_json().unwrap();
        assert_eq!(PolicyConfig::from_json(&json).unwrap(), config);
    }
}
