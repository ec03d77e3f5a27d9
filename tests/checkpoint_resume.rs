//! Interrupting a run, persisting a checkpoint and resuming on a rebuilt machine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use stepflow::builder::{forward_state, StateBuilder};
use stepflow::checkpoint::{Checkpoint, CheckpointError};
use stepflow::core::{Control, StepResult};
use stepflow::engine::{RunError, Runner, StateMachine};
use stepflow::enforcement::PolicyBuilder;

/// Three states appending their ids; state 2 answers an unrecognized signal
/// while `crash` is set, standing in for a process dying mid-run.
fn pipeline(crash: Arc<AtomicBool>) -> StateMachine<Vec<i32>> {
    let mut machine = StateMachine::new(7, 1).unwrap();
    machine.add_state(
        forward_state(1, |mut v: Vec<i32>| {
            v.push(1);
            v
        })
        .unwrap(),
    );
    machine.add_state(
        StateBuilder::new()
            .id(2)
            .primary(move |mut v: Vec<i32>, _: Option<&StepResult<Vec<i32>>>| {
                if crash.load(Ordering::SeqCst) {
                    return StepResult::new(v, Control::Unrecognized(-1));
                }
                v.push(2);
                StepResult::forward(v)
            })
            .build()
            .unwrap(),
    );
    machine.add_state(
        forward_state(3, |mut v: Vec<i32>| {
            v.push(3);
            v
        })
        .unwrap(),
    );
    machine
}

#[test]
fn resume_after_abort_continues_at_failed_state() {
    let machine = pipeline(Arc::new(AtomicBool::new(true)));
    let mut runner = Runner::new(&machine, 1, Control::Forward).unwrap();
    assert!(runner.run(Vec::new()).is_err());

    let json = runner.checkpoint().to_json().unwrap();
    drop(runner);
    drop(machine);

    let machine = pipeline(Arc::new(AtomicBool::new(false)));
    let checkpoint: Checkpoint<Vec<i32>> = Checkpoint::from_json(&json).unwrap();
    let mut runner = Runner::new(&machine, 1, Control::Forward).unwrap();
    runner.resume(&checkpoint).unwrap();

    assert_eq!(runner.carried_data(), Some(&vec![1, 2, 3]));
    // the aborted call stays in the trace
    assert_eq!(runner.trace().path(), vec![1, 2, 2, 3]);
    assert!(runner.is_complete());
}

#[test]
fn resume_after_step_ceiling_picks_up_next_state() {
    let machine = pipeline(Arc::new(AtomicBool::new(false)));
    let policy = PolicyBuilder::new().max_steps(2).build();
    let mut runner = Runner::new(&machine, 1, Control::Forward)
        .unwrap()
        .with_policy(policy);
    assert!(matches!(
        runner.run(Vec::new()),
        Err(RunError::PolicyViolated(_))
    ));
    let bytes = runner.checkpoint().to_binary().unwrap();

    let checkpoint: Checkpoint<Vec<i32>> = Checkpoint::from_binary(&bytes).unwrap();
    assert_eq!(checkpoint.next, Some(2));

    let mut fresh = Runner::new(&machine, 2, Control::Forward).unwrap();
    fresh.resume(&checkpoint).unwrap();
    assert_eq!(fresh.carried_data(), Some(&vec![1, 2, 3]));
    assert_eq!(fresh.steps(), 3);
}

#[test]
fn resuming_a_finished_run_succeeds_immediately() {
    let machine = pipeline(Arc::new(AtomicBool::new(false)));
    let mut runner = Runner::new(&machine, 1, Control::Forward).unwrap();
    runner.run(Vec::new()).unwrap();
    let checkpoint = runner.checkpoint();

    let mut again = Runner::new(&machine, 1, Control::Forward).unwrap();
    again.resume(&checkpoint).unwrap();
    assert_eq!(again.steps(), 3);
    assert_eq!(again.carried_data(), Some(&vec![1, 2, 3]));
}

#[test]
fn resuming_an_unstarted_runner_fails() {
    let machine = pipeline(Arc::new(AtomicBool::new(false)));
    let checkpoint = Runner::new(&machine, 1, Control::Forward)
        .unwrap()
        .checkpoint();

    let mut runner = Runner::new(&machine, 1, Control::Forward).unwrap();
    assert!(matches!(
        runner.resume(&checkpoint),
        Err(RunError::NotStarted)
    ));
}

#[test]
fn resuming_against_another_machine_fails() {
    let machine = pipeline(Arc::new(AtomicBool::new(false)));
    let mut runner = Runner::new(&machine, 1, Control::Forward).unwrap();
    runner.run(Vec::new()).unwrap();
    let checkpoint = runner.checkpoint();

    let other = StateMachine::<Vec<i32>>::new(8, 1).unwrap();
    let mut stranger = Runner::new(&other, 1, Control::Forward).unwrap();
    assert!(matches!(
        stranger.resume(&checkpoint),
        Err(RunError::Checkpoint(CheckpointError::MachineMismatch { .. }))
    ));
}
