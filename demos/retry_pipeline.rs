//! Retry Pipeline
//!
//! This demo drives a small ingest pipeline through its control signals.
//!
//! Key concepts:
//! - `Stay` to poll a state until it is ready
//! - `Error` with a recovery handler, rolling back to refetch in the previous state
//! - A run policy as a safety net against endless loops
//!
//! Run with: cargo run --example retry_pipeline

use std::time::Duration;
use stepflow::builder::{StateBuilder, StateMachineBuilder};
use stepflow::core::{Control, StateKind, StepResult};
use stepflow::engine::Runner;
use stepflow::enforcement::PolicyBuilder;

#[derive(Clone, Debug, Default)]
struct Job {
    polls: u32,
    fetched: u32,
    validated: bool,
    repaired: bool,
    log: Vec<String>,
}

const IO: StateKind = StateKind(1);
const CHECK: StateKind = StateKind(2);

fn main() {
    println!("=== Retry Pipeline Demo ===\n");

    let machine = StateMachineBuilder::new()
        .id(1)
        .cycle(1)
        .state(
            StateBuilder::new()
                .id(1)
                .kind(IO)
                .primary(|mut job: Job, _prev: Option<&StepResult<Job>>| {
                    job.polls += 1;
                    job.log.push(format!("wait: poll #{}", job.polls));
                    if job.polls < 3 {
                        StepResult::stay(job)
                    } else {
                        StepResult::forward(job)
                    }
                }),
        )
        .and_then(|b| {
            b.state(
                StateBuilder::new()
                    .id(2)
                    .kind(IO)
                    .primary(|mut job: Job, _prev: Option<&StepResult<Job>>| {
                        job.fetched += 1;
                        job.log.push(format!("fetch: attempt #{}", job.fetched));
                        StepResult::forward(job)
                    }),
            )
        })
        .and_then(|b| {
            b.state(
                StateBuilder::new()
                    .id(3)
                    .kind(CHECK)
                    .primary(|mut job: Job, _prev: Option<&StepResult<Job>>| {
                        if job.repaired {
                            job.validated = true;
                            job.log.push("validate: ok".to_string());
                            StepResult::forward(job)
                        } else {
                            job.log.push("validate: corrupt payload".to_string());
                            StepResult::error(job)
                        }
                    })
                    .on_error(|mut job: Job, _prev: Option<&StepResult<Job>>| {
                        job.repaired = true;
                        job.log.push("repair: payload marked for refetch".to_string());
                        StepResult::forward(job)
                    }),
            )
        })
        .and_then(|b| b.build())
        .expect("pipeline definition is valid");

    let policy = PolicyBuilder::new()
        .max_steps(50)
        .timeout(Duration::from_secs(5))
        .build();

    let mut runner = Runner::new(&machine, 1, Control::Forward)
        .expect("runner id is valid")
        .with_policy(policy);

    match runner.run(Job::default()) {
        Ok(()) => println!("Run completed in {} steps", runner.steps()),
        Err(e) => println!("Run failed: {e}"),
    }

    if let Some(job) = runner.carried_data() {
        for line in &job.log {
            println!("  {line}");
        }
        println!("\nValidated: {}", job.validated);
    }
    println!("Path: {:?}", runner.trace().path());

    println!("\n=== Demo Complete ===");
}
