//! Builder API for creating run policies.

use crate::enforcement::context::RunContext;
use crate::enforcement::rules::{Rollback, RunPolicy, ValidationCheck};
use crate::enforcement::violations::{ViolationError, ViolationStrategy};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for creating run policies
pub struct PolicyBuilder {
    max_steps: Option<usize>,
    timeout: Option<Duration>,
    required_checks: Vec<ValidationCheck>,
    on_violation: ViolationStrategy,
    rollback: Rollback,
}

impl PolicyBuilder {
    pub fn new() -> Self {
        Self {
            max_steps: None,
            timeout: None,
            required_checks: Vec::new(),
            on_violation: ViolationStrategy::Abort,
            rollback: Rollback::Indexed,
        }
    }

    /// Set the maximum number of handler invocations per run
    pub fn max_steps(mut self, n: usize) -> Self {
        self.max_steps = Some(n);
        self
    }

    /// Set the wall-clock budget for a run
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&RunContext) -> Validation<(), NonEmptyVec<ViolationError>> + Send + Sync + 'static,
    {
        self.required_checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(mut self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&RunContext) -> bool + Send + Sync + 'static,
    {
        let check = move |ctx: &RunContext| {
            if predicate(ctx) {
                Validation::success(())
            } else {
                Validation::fail(ViolationError::CustomCheckFailed {
                    message: error_msg.clone(),
                })
            }
        };
        self.required_checks.push(Box::new(check));
        self
    }

    /// Set violation handling strategy
    pub fn on_violation(mut self, strategy: ViolationStrategy) -> Self {
        self.on_violation = strategy;
        self
    }

    /// Set rollback displacement
    pub fn rollback(mut self, rollback: Rollback) -> Self {
        self.rollback = rollback;
        self
    }

    /// Build the policy
    pub fn build(self) -> RunPolicy {
        RunPolicy {
            max_steps: self.max_steps,
            timeout: self.timeout,
            required_checks: self.required_checks,
            on_violation: self.on_violation,
            rollback: self.rollback,
        }
    }
}

impl Default for PolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
