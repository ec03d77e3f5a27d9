//! Builder API for ergonomic machine and state construction.
//!
//! This module provides fluent builders and small helpers for the most common
//! state shapes, keeping construction validation in one place.

pub mod error;
pub mod machine;
pub mod state;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use state::StateBuilder;

use crate::core::{State, StepResult};

/// Create a state whose handler maps the carried data and always moves forward.
///
/// # Example
///
/// ```
/// use stepflow::builder::forward_state;
///
/// let state = forward_state(1, |n: u32| n + 1).unwrap();
/// assert_eq!(state.invoke(1, None).data, 2);
/// ```
pub fn forward_state<D, F>(id: i32, f: F) -> Result<State<D>, BuildError>
where
    D: 'static,
    F: Fn(D) -> D + Send + Sync + 'static,
{
    StateBuilder::new()
        .id(id)
        .primary(move |data: D, _: Option<&StepResult<D>>| StepResult::forward(f(data)))
        .build()
}

/// Create a state that forwards its data unchanged.
///
/// # Example
///
/// ```
/// use stepflow::builder::pass_through;
/// use stepflow::core::Control;
///
/// let state = pass_through::<&str>(2).unwrap();
/// let result = state.invoke("unchanged", None);
/// assert_eq!(result.data, "unchanged");
/// assert_eq!(result.control, Control::Forward);
/// ```
pub fn pass_through<D: 'static>(id: i32) -> Result<State<D>, BuildError> {
    forward_state(id, |data: D| data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Control;

    #[test]
    fn forward_state_maps_data() {
        let state = forward_state(1, |s: String| s + "!").unwrap();
        let result = state.invoke("hi".to_string(), None);
        assert_eq!(result.data, "hi!");
        assert_eq!(result.control, Control::Forward);
    }

    #[test]
    fn forward_state_validates_id() {
        assert!(matches!(
            forward_state(0, |n: u8| n),
            Err(BuildError::InvalidStateId(0))
        ));
    }

    #[test]
    fn pass_through_has_no_error_handler() {
        let state = pass_through::<u8>(5).unwrap();
        assert_eq!(state.id(), 5);
        assert!(!state.has_error_handler());
    }
}
