//! State machine: an ordered, owned sequence of states.

use crate::builder::BuildError;
use crate::core::{State, StateKey};
use crate::engine::error::MachineError;
use std::fmt;
use tracing::debug;

/// Ordered collection of states plus identity and cycle metadata.
///
/// Insertion order is execution order. The machine owns its states and drops
/// them with itself. While a [`Runner`](crate::engine::Runner) borrows the
/// machine, the sequence cannot be changed.
pub struct StateMachine<D> {
    id: i32,
    cycle: i32,
    states: Vec<State<D>>,
}

impl<D> StateMachine<D> {
    /// Create an empty machine. Fails unless `id > 0`.
    pub fn new(id: i32, cycle: i32) -> Result<Self, BuildError> {
        if id <= 0 {
            return Err(BuildError::InvalidMachineId(id));
        }
        Ok(Self {
            id,
            cycle,
            states: Vec::new(),
        })
    }

    /// Append a state to the tail of the sequence, returning its identity.
    pub fn add_state(&mut self, state: State<D>) -> StateKey {
        let key = state.key();
        debug!(machine = self.id, state = state.id(), position = self.states.len(), "state added");
        self.states.push(state);
        key
    }

    /// Remove the state with the given identity and hand it back.
    pub fn remove_state(&mut self, key: StateKey) -> Result<State<D>, MachineError> {
        let index = self.position(key).ok_or(MachineError::StateNotFound {
            machine_id: self.id,
            key,
        })?;
        let state = self.states.remove(index);
        debug!(machine = self.id, state = state.id(), position = index, "state removed");
        Ok(state)
    }

    /// Release every state, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let released = self.states.len();
        self.states.clear();
        released
    }

    /// Position of the state with the given identity.
    pub fn position(&self, key: StateKey) -> Option<usize> {
        self.states.iter().position(|s| s.key() == key)
    }

    pub fn contains(&self, key: StateKey) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, index: usize) -> Option<&State<D>> {
        self.states.get(index)
    }

    pub fn states(&self) -> &[State<D>] {
        &self.states
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn cycle(&self) -> i32 {
        self.cycle
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl<D> fmt::Debug for StateMachine<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("id", &self.id)
            .field("cycle", &self.cycle)
            .field("states", &self.states)
            .finish()
    }
}
