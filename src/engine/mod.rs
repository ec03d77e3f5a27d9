//! The execution engine: machines that own states and runners that drive them.
//!
//! Execution is single-threaded and synchronous. A runner borrows its machine
//! for as long as it lives, so a machine's sequence cannot change under a
//! traversal; several runners may borrow the same machine at once.

mod error;
mod machine;
mod runner;

pub use error::{MachineError, RunError};
pub use machine::StateMachine;
pub use runner::{HandlerRef, Runner};
