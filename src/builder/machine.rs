//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::state::StateBuilder;
use crate::core::State;
use crate::engine::StateMachine;

/// Builder for constructing state machines with a fluent API.
pub struct StateMachineBuilder<D> {
    id: Option<i32>,
    cycle: i32,
    states: Vec<State<D>>,
}

impl<D> StateMachineBuilder<D> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            id: None,
            cycle: 0,
            states: Vec::new(),
        }
    }

    /// Set the machine id (required, must be positive).
    pub fn id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the cycle marker.
    pub fn cycle(mut self, cycle: i32) -> Self {
        self.cycle = cycle;
        self
    }

    /// Add a state using a builder.
    /// Returns an error if the builder fails validation.
    pub fn state(mut self, builder: StateBuilder<D>) -> Result<Self, BuildError> {
        let state = builder.build()?;
        self.states.push(state);
        Ok(self)
    }

    /// Add a pre-built state.
    pub fn add_state(mut self, state: State<D>) -> Self {
        self.states.push(state);
        self
    }

    /// Add multiple states at once, in order.
    pub fn states(mut self, states: Vec<State<D>>) -> Self {
        self.states.extend(states);
        self
    }

    /// Build the state machine.
    /// An empty machine is valid; running it succeeds trivially.
    pub fn build(self) -> Result<StateMachine<D>, BuildError> {
        let id = self.id.ok_or(BuildError::MissingMachineId)?;
        let mut machine = StateMachine::new(id, self.cycle)?;
        for state in self.states {
            machine.add_state(state);
        }
        Ok(machine)
    }
}

impl<D> Default for StateMachineBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::pass_through;
    use crate::core::StepResult;

    #[test]
    fn builder_validates_required_fields() {
        let result = StateMachineBuilder::<u8>::new().build();
        assert!(matches!(result, Err(BuildError::MissingMachineId)));
    }

    #[test]
    fn builder_rejects_non_positive_id() {
        let result = StateMachineBuilder::<u8>::new().id(-1).build();
        assert!(matches!(result, Err(BuildError::InvalidMachineId(-1))));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = StateMachineBuilder::new()
            .id(1)
            .cycle(4)
            .add_state(pass_through::<u8>(1).unwrap())
            .add_state(pass_through::<u8>(2).unwrap())
            .build()
            .unwrap();

        assert_eq!(machine.id(), 1);
        assert_eq!(machine.cycle(), 4);
        assert_eq!(machine.len(), 2);
    }

    #[test]
    fn state_builder_errors_propagate() {
        let result = StateMachineBuilder::<u8>::new().state(StateBuilder::new().id(1));
        assert!(matches!(result, Err(BuildError::MissingPrimaryHandler)));
    }

    #[test]
    fn states_keep_insertion_order() {
        let machine = StateMachineBuilder::new()
            .id(1)
            .states(vec![
                pass_through::<u8>(3).unwrap(),
                pass_through::<u8>(1).unwrap(),
            ])
            .state(
                StateBuilder::new()
                    .id(2)
                    .primary(|n: u8, _: Option<&StepResult<u8>>| StepResult::forward(n)),
            )
            .unwrap()
            .build()
            .unwrap();

        let ids: Vec<i32> = machine.states().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
