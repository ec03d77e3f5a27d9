//! Construction errors for machines, states and runners.

use thiserror::Error;

/// Errors that can occur when constructing engine values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Machine id must be positive, got {0}")]
    InvalidMachineId(i32),

    #[error("State id must be positive, got {0}")]
    InvalidStateId(i32),

    #[error("Runner id must be positive, got {0}")]
    InvalidRunnerId(i32),

    #[error("Machine id not specified. Call .id(n) before .build()")]
    MissingMachineId,

    #[error("State id not specified. Call .id(n) before .build()")]
    MissingStateId,

    #[error("Primary handler not specified. Call .primary(handler) before .build()")]
    MissingPrimaryHandler,
}
