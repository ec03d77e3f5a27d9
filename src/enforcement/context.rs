//! Context provided to policy checks.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Snapshot of a run taken just before a primary handler is invoked
#[derive(Clone, Debug)]
pub struct RunContext {
    pub runner_id: i32,
    pub machine_id: i32,
    pub state_id: i32,
    pub index: usize,
    /// 1-based number of the invocation about to happen
    pub step: usize,
    pub started_at: DateTime<Utc>,
}

impl RunContext {
    /// Time elapsed since the run started
    pub fn elapsed(&self) -> Duration {
        let now = Utc::now();
        now.signed_duration_since(self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}
