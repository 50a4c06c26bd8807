//! Then-step assertions for command rendering scenarios.

use rstest_bdd_macros::then;

use super::state::{CommandsState, InvocationOutcome};
use super::steps::StepResult;

fn get_recorded_outcome(state: &CommandsState) -> StepResult<InvocationOutcome> {
    state
        .outcome
        .get()
        .ok_or_else(|| String::from("invocation outcome should be recorded"))
}

fn completed_stdout(state: &CommandsState) -> StepResult<String> {
    match get_recorded_outcome(state)? {
        InvocationOutcome::Completed { stdout, .. } => Ok(stdout),
        InvocationOutcome::Failed { message, .. } => {
            Err(format!("expected success, got failure: {message}"))
        }
    }
}

#[then("the printed command is {expected}")]
fn printed_command_is(commands_state: &CommandsState, expected: String) -> StepResult<()> {
    let stdout = completed_stdout(commands_state)?;
    if stdout.trim_end() == expected {
        Ok(())
    } else {
        Err(format!("expected '{expected}', printed '{}'", stdout.trim_end()))
    }
}

#[then("the output lists {labels}")]
fn output_lists(commands_state: &CommandsState, labels: String) -> StepResult<()> {
    let stdout = completed_stdout(commands_state)?;
    let expected: Vec<&str> = labels.split(", ").collect();
    let printed: Vec<&str> = stdout.lines().collect();
    if printed == expected {
        Ok(())
    } else {
        Err(format!("expected {expected:?}, printed {printed:?}"))
    }
}

#[then("the invocation fails with {message}")]
fn invocation_fails_with(commands_state: &CommandsState, message: String) -> StepResult<()> {
    match get_recorded_outcome(commands_state)? {
        InvocationOutcome::Failed { message: actual, .. } if actual.contains(&message) => Ok(()),
        InvocationOutcome::Failed { message: actual, .. } => {
            Err(format!("expected failure '{message}', got '{actual}'"))
        }
        InvocationOutcome::Completed { stdout, .. } => {
            Err(format!("expected failure, command completed with '{stdout}'"))
        }
    }
}

#[then("the exit status is {code}")]
fn exit_status_is(commands_state: &CommandsState, code: i32) -> StepResult<()> {
    let status = match get_recorded_outcome(commands_state)? {
        InvocationOutcome::Completed { status, .. } => status,
        InvocationOutcome::Failed { status, .. } => i32::from(status),
    };
    if status == code {
        Ok(())
    } else {
        Err(format!("expected exit status {code}, got {status}"))
    }
}
