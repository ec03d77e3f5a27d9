//! Execution trace of handler invocations.
//!
//! Every handler call a runner makes is appended here, in order, so that a
//! finished (or aborted) run can be inspected after the fact.

use super::control::Control;
use super::handler::HandlerRole;
use super::state::StateKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single handler invocation.
///
/// # Example
///
/// ```rust
/// use stepflow::core::{Control, HandlerRole, StepRecord};
/// use chrono::Utc;
///
/// let record = StepRecord {
///     step: 1,
///     state_id: 3,
///     state_key: None,
///     index: 2,
///     role: HandlerRole::Primary,
///     control: Control::Forward,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.state_id, 3);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based invocation number within the run
    pub step: usize,
    /// Id of the state whose handler ran
    pub state_id: i32,
    /// Identity of that state, when known
    pub state_key: Option<StateKey>,
    /// Position of the state in the machine
    pub index: usize,
    /// Primary or error handler
    pub role: HandlerRole,
    /// Control returned by the handler
    pub control: Control,
    /// When the handler returned
    pub timestamp: DateTime<Utc>,
}

/// Ordered list of step records.
///
/// # Example
///
/// ```rust
/// use stepflow::core::{Control, ExecutionTrace, HandlerRole, StepRecord};
/// use chrono::Utc;
///
/// let mut trace = ExecutionTrace::new();
/// for (step, state_id) in [(1, 10), (2, 20)] {
///     trace.record(StepRecord {
///         step,
///         state_id,
///         state_key: None,
///         index: step - 1,
///         role: HandlerRole::Primary,
///         control: Control::Forward,
///         timestamp: Utc::now(),
///     });
/// }
///
/// assert_eq!(trace.path(), vec![10, 20]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionTrace {
    records: Vec<StepRecord>,
}

impl ExecutionTrace {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record.
    pub fn record(&mut self, record: StepRecord) {
        self.records.push(record);
    }

    /// State ids in invocation order, error handlers included.
    pub fn path(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.state_id).collect()
    }

    /// Path with each entry tagged by the handler role that ran.
    pub fn calls(&self) -> Vec<(i32, HandlerRole)> {
        self.records.iter().map(|r| (r.state_id, r.role)).collect()
    }

    /// Number of error handler invocations.
    pub fn recoveries(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.role == HandlerRole::Error)
            .count()
    }

    /// Time between the first and last invocation.
    ///
    /// Returns `None` for an empty trace.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}
