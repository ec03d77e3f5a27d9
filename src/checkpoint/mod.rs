//! Checkpoint and resume for runners.
//!
//! A checkpoint captures a runner's execution state (cursor, carried result,
//! trace) so that a traversal interrupted by a process restart can continue
//! against an equivalent machine. Handlers are code and are never serialized;
//! the machine must be rebuilt by the caller before resuming.

use crate::core::{Control, ExecutionTrace, StepResult};
use crate::engine::{HandlerRef, StateMachine};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a runner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint<D> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    pub runner_id: i32,

    pub machine_id: i32,

    /// Cycle marker of the machine at capture time
    pub cycle: i32,

    /// Index of the last successfully processed state
    pub cursor: Option<usize>,

    /// Index the traversal continues from
    pub next: Option<usize>,

    pub last_handler: Option<HandlerRef>,

    /// Result carried into the next handler
    pub last_result: Option<StepResult<D>>,

    pub last_control: Control,

    /// Handler invocations so far
    pub steps: usize,

    /// Complete invocation trace
    pub trace: ExecutionTrace,
}

impl<D> Checkpoint<D> {
    /// Check that this checkpoint can be resumed against `machine`.
    pub fn validate_for(&self, machine: &StateMachine<D>) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        if self.machine_id != machine.id() {
            return Err(CheckpointError::MachineMismatch {
                expected: machine.id(),
                found: self.machine_id,
            });
        }
        if let Some(next) = self.next {
            // the traversal may legitimately stop one past the tail
            if next > machine.len() {
                return Err(CheckpointError::ValidationFailed(format!(
                    "next index {next} is beyond {} states",
                    machine.len()
                )));
            }
        }
        if let Some(cursor) = self.cursor {
            if cursor >= machine.len() {
                return Err(CheckpointError::ValidationFailed(format!(
                    "cursor {cursor} is beyond {} states",
                    machine.len()
                )));
            }
        }
        Ok(())
    }

    /// Whether the captured traversal had already finished.
    pub fn is_complete(&self, machine: &StateMachine<D>) -> bool {
        self.next.is_some_and(|next| next >= machine.len())
    }
}

impl<D: Serialize> Checkpoint<D> {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))?;
        debug!(checkpoint = %self.id, bytes = json.len(), "checkpoint serialized to json");
        Ok(json)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        let bytes = bincode::serialize(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))?;
        debug!(checkpoint = %self.id, bytes = bytes.len(), "checkpoint serialized to binary");
        Ok(bytes)
    }
}

impl<D: DeserializeOwned> Checkpoint<D> {
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version == CHECKPOINT_VERSION {
            Ok(())
        } else {
            Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::pass_through;
    use crate::engine::Runner;

    fn machine(id: i32, states: i32) -> StateMachine<String> {
        let mut machine = StateMachine::new(id, 0).unwrap();
        for state_id in 1..=states {
            machine.add_state(pass_through(state_id).unwrap());
        }
        machine
    }

    fn finished_checkpoint(machine: &StateMachine<String>) -> Checkpoint<String> {
        let mut runner = Runner::new(machine, 1, Control::Forward).unwrap();
        runner.run("payload".to_string()).unwrap();
        runner.checkpoint()
    }

    #[test]
    fn checkpoint_captures_runner_state() {
        let machine = machine(4, 2);
        let checkpoint = finished_checkpoint(&machine);

        assert_eq!(checkpoint.version, CHECKPOINT_VERSION);
        assert_eq!(checkpoint.machine_id, 4);
        assert_eq!(checkpoint.cursor, Some(1));
        assert_eq!(checkpoint.next, Some(2));
        assert_eq!(checkpoint.steps, 2);
        assert_eq!(checkpoint.trace.path(), vec![1, 2]);
        assert!(checkpoint.is_complete(&machine));
    }

    #[test]
    fn json_preserves_checkpoint() {
        let machine = machine(1, 3);
        let checkpoint = finished_checkpoint(&machine);

        let json = checkpoint.to_json().unwrap();
        let restored: Checkpoint<String> = Checkpoint::from_json(&json).unwrap();
        assert_eq!(restored, checkpoint);
    }

    #[test]
    fn binary_preserves_checkpoint() {
        let machine = machine(1, 3);
        let checkpoint = finished_checkpoint(&machine);

        let bytes = checkpoint.to_binary().unwrap();
        let restored: Checkpoint<String> = Checkpoint::from_binary(&bytes).unwrap();
        assert_eq!(restored.last_result, checkpoint.last_result);
        assert_eq!(restored.trace, checkpoint.trace);
    }

    #[test]
    fn garbage_fails_to_deserialize() {
        assert!(matches!(
            Checkpoint::<String>::from_json("not json"),
            Err(CheckpointError::DeserializationFailed(_))
        ));
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let machine = machine(1, 1);
        let mut checkpoint = finished_checkpoint(&machine);
        checkpoint.version = 99;

        let json = checkpoint.to_json().unwrap();
        assert!(matches!(
            Checkpoint::<String>::from_json(&json),
            Err(CheckpointError::UnsupportedVersion {
                found: 99,
                supported: CHECKPOINT_VERSION
            })
        ));
    }

    #[test]
    fn foreign_machine_is_rejected() {
        let checkpoint = finished_checkpoint(&machine(1, 2));
        let other = machine(2, 2);

        assert!(matches!(
            checkpoint.validate_for(&other),
            Err(CheckpointError::MachineMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn shrunken_machine_is_rejected() {
        let checkpoint = finished_checkpoint(&machine(1, 3));
        let smaller = machine(1, 1);

        assert!(matches!(
            checkpoint.validate_for(&smaller),
            Err(CheckpointError::ValidationFailed(_))
        ));
    }
}
