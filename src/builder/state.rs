//! Builder for constructing states.

use crate::builder::error::BuildError;
use crate::core::{Handler, HandlerFn, State, StateKind};
use std::sync::Arc;

/// Fluent builder for a [`State`].
pub struct StateBuilder<D> {
    id: Option<i32>,
    kind: StateKind,
    primary: Option<HandlerFn<D>>,
    on_error: Option<HandlerFn<D>>,
}

impl<D> StateBuilder<D> {
    pub fn new() -> Self {
        Self {
            id: None,
            kind: StateKind::default(),
            primary: None,
            on_error: None,
        }
    }

    /// Set the state id (required, must be positive).
    pub fn id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the classification tag.
    pub fn kind(mut self, kind: StateKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the primary handler (required).
    pub fn primary<H>(mut self, handler: H) -> Self
    where
        H: Handler<D> + 'static,
    {
        self.primary = Some(Arc::new(handler));
        self
    }

    /// Set the error handler run when the primary handler signals `Error`.
    pub fn on_error<H>(mut self, handler: H) -> Self
    where
        H: Handler<D> + 'static,
    {
        self.on_error = Some(Arc::new(handler));
        self
    }

    /// Build the state.
    pub fn build(self) -> Result<State<D>, BuildError> {
        let id = self.id.ok_or(BuildError::MissingStateId)?;
        let primary = self.primary.ok_or(BuildError::MissingPrimaryHandler)?;
        State::from_parts(id, self.kind, primary, self.on_error)
    }
}

impl<D> Default for StateBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StepResult;

    #[test]
    fn builder_requires_id() {
        let result = StateBuilder::<u8>::new()
            .primary(|n: u8, _: Option<&StepResult<u8>>| StepResult::forward(n))
            .build();
        assert!(matches!(result, Err(BuildError::MissingStateId)));
    }

    #[test]
    fn builder_requires_primary_handler() {
        let result = StateBuilder::<u8>::new().id(1).build();
        assert!(matches!(result, Err(BuildError::MissingPrimaryHandler)));
    }

    #[test]
    fn builder_rejects_non_positive_id() {
        let result = StateBuilder::<u8>::new()
            .id(0)
            .primary(|n: u8, _: Option<&StepResult<u8>>| StepResult::forward(n))
            .build();
        assert!(matches!(result, Err(BuildError::InvalidStateId(0))));
    }

    #[test]
    fn fluent_api_builds_state() {
        let state = StateBuilder::<u8>::new()
            .id(3)
            .kind(StateKind(9))
            .primary(|n: u8, _: Option<&StepResult<u8>>| StepResult::error(n))
            .on_error(|n: u8, _: Option<&StepResult<u8>>| StepResult::forward(n + 1))
            .build()
            .unwrap();

        assert_eq!(state.id(), 3);
        assert_eq!(state.kind(), StateKind(9));
        assert!(state.has_error_handler());
        assert_eq!(state.recover(1, None).unwrap().data, 2);
    }
}
