//! Run policy: step ceiling, timeout and custom checks, accumulated with Validation.

use crate::enforcement::context::RunContext;
use crate::enforcement::violations::{ViolationError, ViolationStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for validation check functions
pub type ValidationCheck =
    Box<dyn Fn(&RunContext) -> Validation<(), NonEmptyVec<ViolationError>> + Send + Sync>;

/// How far `Backward` and recovered `Error` signals move the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rollback {
    /// Re-enter the immediately preceding state.
    #[default]
    Indexed,

    /// Step back twice, then forward once, stopping at the head. Identical to
    /// `Indexed` except that rolling back from the second state re-runs the
    /// second state rather than the first.
    Linked,
}

impl Rollback {
    /// Index processed after rolling back from `index`.
    pub fn retreat(&self, index: usize) -> usize {
        match self {
            Self::Indexed => match index {
                0 => 1,
                i => i - 1,
            },
            Self::Linked => index.saturating_sub(2) + 1,
        }
    }
}

/// Policy applied by a runner before each handler invocation.
///
/// The default policy has no limits, which matches an unbounded traversal.
pub struct RunPolicy {
    pub(crate) max_steps: Option<usize>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) required_checks: Vec<ValidationCheck>,
    pub(crate) on_violation: ViolationStrategy,
    pub(crate) rollback: Rollback,
}

impl RunPolicy {
    /// Policy with no ceiling, no timeout and no custom checks.
    pub fn unbounded() -> Self {
        Self {
            max_steps: None,
            timeout: None,
            required_checks: Vec::new(),
            on_violation: ViolationStrategy::Abort,
            rollback: Rollback::Indexed,
        }
    }

    /// Enforce all rules, accumulating ALL violations.
    pub fn enforce(&self, context: &RunContext) -> Validation<(), NonEmptyVec<ViolationError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ViolationError>>> = Vec::new();

        if let Some(max) = self.max_steps {
            let check = if context.step > max {
                Validation::fail(ViolationError::MaxStepsExceeded {
                    max,
                    current: context.step,
                })
            } else {
                Validation::success(())
            };
            checks.push(check);
        }

        if let Some(timeout) = self.timeout {
            let elapsed = context.elapsed();
            let check = if elapsed > timeout {
                Validation::fail(ViolationError::TimeoutExceeded { timeout, elapsed })
            } else {
                Validation::success(())
            };
            checks.push(check);
        }

        for check_fn in &self.required_checks {
            checks.push(check_fn(context));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Whether any rule can ever fail.
    pub fn is_unbounded(&self) -> bool {
        self.max_steps.is_none() && self.timeout.is_none() && self.required_checks.is_empty()
    }

    pub fn max_steps(&self) -> Option<usize> {
        self.max_steps
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn violation_strategy(&self) -> ViolationStrategy {
        self.on_violation
    }

    pub fn rollback(&self) -> Rollback {
        self.rollback
    }
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl fmt::Debug for RunPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunPolicy")
            .field("max_steps", &self.max_steps)
            .field("timeout", &self.timeout)
            .field("required_checks", &self.required_checks.len())
            .field("on_violation", &self.on_violation)
            .field("rollback", &self.rollback)
            .finish()
    }
}
