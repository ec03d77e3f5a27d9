//! States: the units of work a machine executes in order.

use super::control::StepResult;
use super::handler::Handler;
use crate::builder::BuildError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Shared handle to a handler.
pub type HandlerFn<D> = Arc<dyn Handler<D>>;

/// Caller-defined classification tag. The engine never inspects it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKind(pub i32);

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one constructed state.
///
/// Two states built with the same `id` still have distinct keys; machines
/// locate states for removal by key, never by id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateKey(Uuid);

impl StateKey {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One step of work: an id, a kind tag, a mandatory primary handler and an
/// optional error handler.
///
/// States are immutable once built. A state belongs to no machine until it is
/// added to one, and then only to that machine.
///
/// # Example
///
/// ```rust
/// use stepflow::core::{State, StateKind, StepResult};
///
/// let state = State::<u32>::new(
///     1,
///     StateKind(0),
///     |n: u32, _prev: Option<&StepResult<u32>>| StepResult::forward(n + 1),
///     None,
/// )
/// .unwrap();
///
/// assert_eq!(state.id(), 1);
/// assert!(!state.has_error_handler());
/// ```
pub struct State<D> {
    key: StateKey,
    id: i32,
    kind: StateKind,
    primary: HandlerFn<D>,
    on_error: Option<HandlerFn<D>>,
}

impl<D> State<D> {
    /// Create a state. Fails unless `id > 0`.
    pub fn new<H>(
        id: i32,
        kind: StateKind,
        primary: H,
        on_error: Option<HandlerFn<D>>,
    ) -> Result<Self, BuildError>
    where
        H: Handler<D> + 'static,
    {
        Self::from_parts(id, kind, Arc::new(primary), on_error)
    }

    pub(crate) fn from_parts(
        id: i32,
        kind: StateKind,
        primary: HandlerFn<D>,
        on_error: Option<HandlerFn<D>>,
    ) -> Result<Self, BuildError> {
        if id <= 0 {
            return Err(BuildError::InvalidStateId(id));
        }
        Ok(Self {
            key: StateKey::fresh(),
            id,
            kind,
            primary,
            on_error,
        })
    }

    pub fn key(&self) -> StateKey {
        self.key
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn kind(&self) -> StateKind {
        self.kind
    }

    pub fn has_error_handler(&self) -> bool {
        self.on_error.is_some()
    }

    /// Invoke the primary handler.
    pub fn invoke(&self, data: D, previous: Option<&StepResult<D>>) -> StepResult<D> {
        self.primary.call(data, previous)
    }

    /// Invoke the error handler, if the state has one.
    pub fn recover(&self, data: D, previous: Option<&StepResult<D>>) -> Option<StepResult<D>> {
        self.on_error
            .as_ref()
            .map(|handler| handler.call(data, previous))
    }
}

impl<D> fmt::Debug for State<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("key", &self.key)
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("has_error_handler", &self.on_error.is_some())
            .finish()
    }
}
