//! Runner: drives one traversal of a state machine.

use crate::builder::BuildError;
use crate::checkpoint::{Checkpoint, CHECKPOINT_VERSION};
use crate::core::{Control, ExecutionTrace, HandlerRole, State, StateKey, StepRecord, StepResult};
use crate::enforcement::{RunContext, RunPolicy, ViolationError, ViolationStrategy};
use crate::engine::error::RunError;
use crate::engine::machine::StateMachine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// The handler a runner invoked most recently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerRef {
    pub state_id: i32,
    pub state_key: StateKey,
    pub index: usize,
    pub role: HandlerRole,
}

/// Execution context bound to one machine.
///
/// A runner walks the machine's states from the head, invoking each primary
/// handler and moving according to the returned [`Control`]:
///
/// | signal     | next state                                              |
/// |------------|---------------------------------------------------------|
/// | `Forward`  | the successor                                           |
/// | `Backward` | the predecessor (the successor when at the head)        |
/// | `Stay`     | the same state (the successor when at the head)         |
/// | `Error`    | error handler, then as `Backward`; without one, forward |
///
/// Any unrecognized signal aborts the run. The run succeeds once the cursor
/// moves past the tail.
///
/// # Example
///
/// ```rust
/// use stepflow::builder::{forward_state, StateBuilder, StateMachineBuilder};
/// use stepflow::core::{Control, StepResult};
/// use stepflow::engine::Runner;
///
/// let machine = StateMachineBuilder::new()
///     .id(1)
///     .add_state(forward_state(1, |n: u32| n + 1).unwrap())
///     .state(StateBuilder::new().id(2).primary(|n: u32, _prev: Option<&StepResult<u32>>| {
///         if n < 5 { StepResult::stay(n + 1) } else { StepResult::forward(n) }
///     }))
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let mut runner = Runner::new(&machine, 1, Control::Forward).unwrap();
/// runner.run(0).unwrap();
///
/// assert_eq!(runner.carried_data(), Some(&5));
/// assert_eq!(runner.trace().path(), vec![1, 2, 2, 2, 2, 2]);
/// ```
pub struct Runner<'m, D> {
    id: i32,
    machine: &'m StateMachine<D>,
    initial_control: Control,
    policy: RunPolicy,
    cursor: Option<usize>,
    next: Option<usize>,
    last_handler: Option<HandlerRef>,
    last_result: Option<StepResult<D>>,
    last_control: Control,
    steps: usize,
    trace: ExecutionTrace,
}

impl<'m, D> Runner<'m, D> {
    /// Create a runner bound to `machine`. Fails unless `id > 0`.
    ///
    /// `initial_control` is recorded and reported by [`Runner::last_control`]
    /// until the first step; it does not influence traversal.
    pub fn new(
        machine: &'m StateMachine<D>,
        id: i32,
        initial_control: Control,
    ) -> Result<Self, BuildError> {
        if id <= 0 {
            return Err(BuildError::InvalidRunnerId(id));
        }
        Ok(Self {
            id,
            machine,
            initial_control,
            policy: RunPolicy::unbounded(),
            cursor: None,
            next: None,
            last_handler: None,
            last_result: None,
            last_control: initial_control,
            steps: 0,
            trace: ExecutionTrace::new(),
        })
    }

    /// Replace the run policy.
    pub fn with_policy(mut self, policy: RunPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn machine(&self) -> &'m StateMachine<D> {
        self.machine
    }

    pub fn policy(&self) -> &RunPolicy {
        &self.policy
    }

    pub fn initial_control(&self) -> Control {
        self.initial_control
    }

    /// Index of the state processed by the last successful step.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// State processed by the last successful step.
    pub fn current_state(&self) -> Option<&'m State<D>> {
        self.cursor.and_then(|index| self.machine.get(index))
    }

    /// Index the traversal moves to next; equal to the machine length once done.
    pub fn next_index(&self) -> Option<usize> {
        self.next
    }

    pub fn last_handler(&self) -> Option<HandlerRef> {
        self.last_handler
    }

    pub fn last_result(&self) -> Option<&StepResult<D>> {
        self.last_result.as_ref()
    }

    /// Data that will be passed to the next handler.
    pub fn carried_data(&self) -> Option<&D> {
        self.last_result.as_ref().map(|r| &r.data)
    }

    pub fn last_control(&self) -> Control {
        self.last_control
    }

    /// Handler invocations performed, error handlers included.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn trace(&self) -> &ExecutionTrace {
        &self.trace
    }

    /// Whether the last traversal ran past the tail.
    pub fn is_complete(&self) -> bool {
        self.next.is_some_and(|next| next >= self.machine.len())
    }

    fn reset(&mut self) {
        self.cursor = None;
        self.next = None;
        self.last_handler = None;
        self.last_result = None;
        self.last_control = self.initial_control;
        self.steps = 0;
        self.trace.clear();
    }
}

impl<'m, D: Clone> Runner<'m, D> {
    /// Traverse the machine from its head.
    ///
    /// The first handler receives `initial` and no previous result; every
    /// later one receives the carried data and the previous step's result.
    /// Previous execution state on this runner is discarded first.
    #[instrument(skip_all, fields(runner = self.id, machine = self.machine.id()))]
    pub fn run(&mut self, initial: D) -> Result<(), RunError> {
        self.reset();
        info!(states = self.machine.len(), "run started");
        self.traverse(0, Some(initial))
    }

    /// Capture the runner's execution state.
    pub fn checkpoint(&self) -> Checkpoint<D> {
        Checkpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            runner_id: self.id,
            machine_id: self.machine.id(),
            cycle: self.machine.cycle(),
            cursor: self.cursor,
            next: self.next,
            last_handler: self.last_handler,
            last_result: self.last_result.clone(),
            last_control: self.last_control,
            steps: self.steps,
            trace: self.trace.clone(),
        }
    }

    /// Restore execution state from a checkpoint and continue the traversal
    /// where it left off.
    #[instrument(skip_all, fields(runner = self.id, machine = self.machine.id()))]
    pub fn resume(&mut self, checkpoint: &Checkpoint<D>) -> Result<(), RunError> {
        checkpoint.validate_for(self.machine)?;
        let start = checkpoint.next.ok_or(RunError::NotStarted)?;

        self.cursor = checkpoint.cursor;
        self.next = checkpoint.next;
        self.last_handler = checkpoint.last_handler;
        self.last_result = checkpoint.last_result.clone();
        self.last_control = checkpoint.last_control;
        self.steps = checkpoint.steps;
        self.trace = checkpoint.trace.clone();

        info!(checkpoint = %checkpoint.id, next = start, "run resumed");
        self.traverse(start, None)
    }

    fn traverse(&mut self, start: usize, mut seed: Option<D>) -> Result<(), RunError> {
        let machine = self.machine;
        let rollback = self.policy.rollback();
        // a resumed run keeps the clock of the run it continues
        let started_at = self
            .trace
            .records()
            .first()
            .map_or_else(Utc::now, |record| record.timestamp);
        let mut index = start;

        while let Some(state) = machine.get(index) {
            self.enforce(state, index, started_at)?;

            let result = match (seed.take(), self.last_result.as_ref()) {
                (Some(initial), _) => state.invoke(initial, None),
                (None, Some(previous)) => state.invoke(previous.data.clone(), Some(previous)),
                (None, None) => return Err(RunError::NotStarted),
            };
            self.steps += 1;
            self.record(state, index, HandlerRole::Primary, result.control);

            index = match result.control {
                Control::Unrecognized(code) => {
                    error!(state = state.id(), index, code, "unrecognized control, run aborted");
                    return Err(RunError::ProtocolViolation {
                        state_id: state.id(),
                        index,
                        code,
                    });
                }
                Control::Forward => {
                    self.commit(state, index, result);
                    index + 1
                }
                Control::Backward => {
                    self.commit(state, index, result);
                    rollback.retreat(index)
                }
                Control::Stay => {
                    self.commit(state, index, result);
                    if index == 0 {
                        debug!(state = state.id(), "stay at head, advancing");
                        1
                    } else {
                        index
                    }
                }
                Control::Error => {
                    self.commit(state, index, result);
                    if self.recover(state, index, started_at)? {
                        rollback.retreat(index)
                    } else {
                        warn!(state = state.id(), index, "error signalled without error handler, advancing");
                        index + 1
                    }
                }
            };
            self.next = Some(index);
            debug!(state = state.id(), control = %self.last_control, next = index, "step complete");
        }

        self.next = Some(index);
        info!(steps = self.steps, "run complete");
        Ok(())
    }

    /// Run the state's error handler on the just-committed result.
    ///
    /// The error handler is subject to the run policy like any primary handler.
    fn recover(
        &mut self,
        state: &'m State<D>,
        index: usize,
        started_at: DateTime<Utc>,
    ) -> Result<bool, RunError> {
        if !state.has_error_handler() {
            return Ok(false);
        }
        self.enforce(state, index, started_at)?;

        let Some(failed) = self.last_result.as_ref() else {
            return Ok(false);
        };
        let Some(recovered) = state.recover(failed.data.clone(), Some(failed)) else {
            return Ok(false);
        };

        self.steps += 1;
        self.record(state, index, HandlerRole::Error, recovered.control);
        self.last_handler = Some(HandlerRef {
            state_id: state.id(),
            state_key: state.key(),
            index,
            role: HandlerRole::Error,
        });
        self.cursor = Some(index);
        self.last_result = Some(recovered);
        Ok(true)
    }
}

impl<'m, D> Runner<'m, D> {
    fn commit(&mut self, state: &'m State<D>, index: usize, result: StepResult<D>) {
        self.last_handler = Some(HandlerRef {
            state_id: state.id(),
            state_key: state.key(),
            index,
            role: HandlerRole::Primary,
        });
        self.cursor = Some(index);
        self.last_control = result.control;
        self.last_result = Some(result);
    }

    fn record(&mut self, state: &State<D>, index: usize, role: HandlerRole, control: Control) {
        self.trace.record(StepRecord {
            step: self.steps,
            state_id: state.id(),
            state_key: Some(state.key()),
            index,
            role,
            control,
            timestamp: Utc::now(),
        });
    }

    fn enforce(
        &self,
        state: &State<D>,
        index: usize,
        started_at: DateTime<Utc>,
    ) -> Result<(), RunError> {
        if self.policy.is_unbounded() {
            return Ok(());
        }

        let context = RunContext {
            runner_id: self.id,
            machine_id: self.machine.id(),
            state_id: state.id(),
            index,
            step: self.steps + 1,
            started_at,
        };

        match self.policy.enforce(&context) {
            Validation::Success(()) => Ok(()),
            Validation::Failure(errors) => {
                let violations: Vec<ViolationError> = errors.iter().cloned().collect();
                match self.policy.violation_strategy() {
                    ViolationStrategy::Abort => {
                        error!(state = state.id(), index, violations = violations.len(), "run policy violated, run aborted");
                        Err(RunError::PolicyViolated(violations))
                    }
                    ViolationStrategy::IgnoreAndLog => {
                        for violation in &violations {
                            warn!(state = state.id(), index, %violation, "run policy violated");
                        }
                        Ok(())
                    }
                }
            }
        }
    }
}
