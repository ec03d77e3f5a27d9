//! Stepflow: a deterministic state-machine execution engine
//!
//! A machine is an ordered sequence of states. Each state carries a primary
//! handler and, optionally, an error handler. A runner walks the sequence from
//! the head, feeding every handler the data produced by the one before, and
//! moves according to the control signal each handler returns: forward,
//! backward, stay, or error (recover, then roll back).
//!
//! # Core Concepts
//!
//! - **State**: one unit of handler-driven work, see [`core::State`]
//! - **State Machine**: owned, ordered states plus identity metadata
//! - **Runner**: the mutable context that performs one traversal
//! - **Run Policy**: optional step ceiling and timeout around a traversal
//! - **Checkpoint**: serializable runner snapshot that can be resumed
//!
//! # Example
//!
//! ```rust
//! use stepflow::builder::{forward_state, StateBuilder, StateMachineBuilder};
//! use stepflow::core::{Control, StepResult};
//! use stepflow::engine::Runner;
//!
//! let machine = StateMachineBuilder::new()
//!     .id(1)
//!     .add_state(forward_state(1, |s: String| s + "a").unwrap())
//!     .state(
//!         StateBuilder::new()
//!             .id(2)
//!             .primary(|s: String, _prev: Option<&StepResult<String>>| {
//!                 if s.contains('!') {
//!                     StepResult::forward(s)
//!                 } else {
//!                     StepResult::error(s)
//!                 }
//!             })
//!             .on_error(|s: String, _prev: Option<&StepResult<String>>| {
//!                 StepResult::forward(s + "!")
//!             }),
//!     )
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let mut runner = Runner::new(&machine, 1, Control::Forward).unwrap();
//! runner.run(String::new()).unwrap();
//!
//! // state 2 failed once, recovered, and rolled back into state 1
//! assert_eq!(runner.trace().path(), vec![1, 2, 2, 1, 2]);
//! assert_eq!(runner.carried_data().map(String::as_str), Some("a!a"));
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod enforcement;
pub mod engine;

// Re-export commonly used types
pub use crate::core::{Control, Handler, State, StepResult};
pub use engine::{Runner, StateMachine};
