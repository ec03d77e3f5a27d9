//! Handler capability invoked by the runner for each state.

use super::control::StepResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A unit of user-supplied computation.
///
/// Receives the carried data and, except on the very first invocation of a
/// run, the previous step's result. Any `Fn(D, Option<&StepResult<D>>) ->
/// StepResult<D>` closure is a handler.
///
/// # Example
///
/// ```rust
/// use stepflow::core::{Handler, StepResult};
///
/// let double = |n: u32, _prev: Option<&StepResult<u32>>| StepResult::forward(n * 2);
/// assert_eq!(double.call(4, None).data, 8);
/// ```
pub trait Handler<D>: Send + Sync {
    fn call(&self, data: D, previous: Option<&StepResult<D>>) -> StepResult<D>;
}

impl<D, F> Handler<D> for F
where
    F: Fn(D, Option<&StepResult<D>>) -> StepResult<D> + Send + Sync,
{
    fn call(&self, data: D, previous: Option<&StepResult<D>>) -> StepResult<D> {
        self(data, previous)
    }
}

/// Which of a state's handlers ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerRole {
    Primary,
    Error,
}

impl fmt::Display for HandlerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Error => f.write_str("error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Control;

    struct Echo;

    impl Handler<String> for Echo {
        fn call(&self, data: String, previous: Option<&StepResult<String>>) -> StepResult<String> {
            let control = previous.map(|p| p.control).unwrap_or(Control::Forward);
            StepResult::new(data, control)
        }
    }

    #[test]
    fn closures_are_handlers() {
        let add_one = |n: i64, _: Option<&StepResult<i64>>| StepResult::forward(n + 1);
        let result = add_one.call(41, None);
        assert_eq!(result.data, 42);
        assert_eq!(result.control, Control::Forward);
    }

    #[test]
    fn trait_objects_receive_previous_result() {
        let handler: Box<dyn Handler<String>> = Box::new(Echo);
        let previous = StepResult::stay("before".to_string());
        let result = handler.call("now".to_string(), Some(&previous));
        assert_eq!(result.data, "now");
        assert_eq!(result.control, Control::Stay);
    }

    #[test]
    fn role_display() {
        assert_eq!(HandlerRole::Primary.to_string(), "primary");
        assert_eq!(HandlerRole::Error.to_string(), "error");
    }
}
