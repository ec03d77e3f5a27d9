//! Failures while encoding, decoding or restoring a runner checkpoint.

use thiserror::Error;

/// Why a checkpoint could not be written, read or applied to a machine.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// The runner state could not be encoded as JSON or bincode.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// The bytes are not a checkpoint for this data type.
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Written by an incompatible checkpoint layout.
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Taken from a runner bound to a different machine id.
    #[error("Checkpoint belongs to machine {found}, not machine {expected}")]
    MachineMismatch { expected: i32, found: i32 },

    /// Positions in the checkpoint do not fit the machine it is applied to.
    #[error("Checkpoint validation failed: {0}")]
    ValidationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_mismatch_names_both_machines() {
        let err = CheckpointError::MachineMismatch {
            expected: 3,
            found: 9,
        };
        assert_eq!(err.to_string(), "Checkpoint belongs to machine 9, not machine 3");
    }
}
