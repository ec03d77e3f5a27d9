//! Control signals and step results returned by state handlers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Directive returned by a handler telling the runner where to go next.
///
/// The four recognised signals drive traversal. `Unrecognized` carries a raw
/// code that does not map onto any of them; a runner that sees it aborts the
/// current run with a protocol violation.
///
/// # Example
///
/// ```rust
/// use stepflow::core::Control;
///
/// assert_eq!(Control::from_code(2), Control::Stay);
/// assert_eq!(Control::from_code(42), Control::Unrecognized(42));
/// assert_eq!(Control::Backward.code(), 1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    /// Advance to the next state.
    #[default]
    Forward,

    /// Roll back to the preceding state.
    Backward,

    /// Run the same state again.
    Stay,

    /// Run the state's error handler (if any), then roll back.
    Error,

    /// Any signal outside the protocol.
    Unrecognized(i32),
}

impl Control {
    /// Map a raw signal code onto the closed set of controls.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Forward,
            1 => Self::Backward,
            2 => Self::Stay,
            3 => Self::Error,
            other => Self::Unrecognized(other),
        }
    }

    /// Raw code for this control.
    pub fn code(&self) -> i32 {
        match self {
            Self::Forward => 0,
            Self::Backward => 1,
            Self::Stay => 2,
            Self::Error => 3,
            Self::Unrecognized(code) => *code,
        }
    }

    /// Whether the runner knows how to act on this signal.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<i32> for Control {
    fn from(code: i32) -> Self {
        Self::from_code(code)
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => f.write_str("forward"),
            Self::Backward => f.write_str("backward"),
            Self::Stay => f.write_str("stay"),
            Self::Error => f.write_str("error"),
            Self::Unrecognized(code) => write!(f, "unrecognized({code})"),
        }
    }
}

/// Value produced by one handler invocation.
///
/// `data` is carried into the next handler call; `control` decides which
/// state that will be.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepResult<D> {
    pub data: D,
    pub control: Control,
}

impl<D> StepResult<D> {
    pub fn new(data: D, control: Control) -> Self {
        Self { data, control }
    }

    pub fn forward(data: D) -> Self {
        Self::new(data, Control::Forward)
    }

    pub fn backward(data: D) -> Self {
        Self::new(data, Control::Backward)
    }

    pub fn stay(data: D) -> Self {
        Self::new(data, Control::Stay)
    }

    pub fn error(data: D) -> Self {
        Self::new(data, Control::Error)
    }
}
