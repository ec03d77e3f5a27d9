//! Run policies: optional safety nets around a traversal.
//!
//! Nothing in the traversal algorithm guarantees forward progress; a handler
//! that keeps answering `Stay` loops forever. A [`RunPolicy`] lets the caller
//! bound a run by step count, wall-clock time or custom predicates. Checks run
//! before every handler invocation, error handlers included, and use
//! Stillwater's `Validation` so that every violated rule is reported, not just
//! the first.
//!
//! # Example
//!
//! ```rust
//! use stepflow::enforcement::{PolicyBuilder, ViolationStrategy};
//! use std::time::Duration;
//!
//! let policy = PolicyBuilder::new()
//!     .max_steps(1_000)
//!     .timeout(Duration::from_secs(30))
//!     .on_violation(ViolationStrategy::Abort)
//!     .build();
//! assert_eq!(policy.max_steps(), Some(1_000));
//! ```

pub mod builder;
pub mod config;
pub mod context;
pub mod rules;
pub mod violations;

pub use builder::PolicyBuilder;
pub use config::PolicyConfig;
pub use context::RunContext;
pub use rules::{Rollback, RunPolicy};
pub use violations::{ViolationError, ViolationStrategy};
