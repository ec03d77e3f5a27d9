//! Errors raised by machines and runners.

use crate::checkpoint::CheckpointError;
use crate::core::StateKey;
use crate::enforcement::ViolationError;
use thiserror::Error;

/// Structural errors on a machine's state sequence
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("State {key} is not part of machine {machine_id}")]
    StateNotFound { machine_id: i32, key: StateKey },
}

/// Errors that end a run with failure
#[derive(Debug, Error)]
pub enum RunError {
    #[error("State {state_id} at index {index} returned unrecognized control code {code}")]
    ProtocolViolation {
        state_id: i32,
        index: usize,
        code: i32,
    },

    #[error("Run policy violated: {}", describe(.0))]
    PolicyViolated(Vec<ViolationError>),

    #[error("Runner has no carried result to continue from")]
    NotStarted,

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

fn describe(violations: &[ViolationError]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
