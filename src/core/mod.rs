//! Core building blocks of a state machine.
//!
//! - `Control` signals and the `StepResult` a handler returns
//! - the `Handler` capability and the `State` that carries it
//! - the `ExecutionTrace` a runner records while it works

mod control;
mod handler;
mod history;
mod state;

pub use control::{Control, StepResult};
pub use handler::{Handler, HandlerRole};
pub use history::{ExecutionTrace, StepRecord};
pub use state::{HandlerFn, State, StateKey, StateKind};
