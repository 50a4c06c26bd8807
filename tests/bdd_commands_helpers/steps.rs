//! Given/When steps for command rendering scenarios.

use std::fs;
use std::io::Cursor;

use camino::Utf8PathBuf;
use clap::Parser;
use fugu::app::{CommandOutcome, Session};
use fugu::config::{AppConfig, Cli};
use fugu::error::ExecError;
use fugu::exec::{BranchProvider, ShellRunner};
use rstest_bdd_macros::{given, when};
use tempfile::TempDir;

use super::state::{CommandsState, InvocationOutcome};

pub type StepResult<T> = Result<T, String>;

/// Answers every branch lookup with a fixed name, or fails when none is set.
struct FixedBranch(Option<String>);

impl BranchProvider for FixedBranch {
    fn current_branch(&self) -> Result<String, ExecError> {
        self.0.clone().ok_or_else(|| ExecError::Unsuccessful {
            command: String::from("git rev-parse --abbrev-ref HEAD"),
            code: 128,
        })
    }
}

#[given("label {label} uses image {image}")]
fn label_uses_image(commands_state: &CommandsState, label: String, image: String) {
    commands_state.push(&label, "image", &image);
}

#[given("label {label} sets {key} to {value}")]
fn label_sets_key(commands_state: &CommandsState, label: String, key: String, value: String) {
    commands_state.push(&label, &key, &value);
}

#[given("label {label} inherits from {parent}")]
fn label_inherits(commands_state: &CommandsState, label: String, parent: String) {
    commands_state.push(&label, "<<", &parent);
}

#[given("no source document exists")]
fn no_source_document(commands_state: &CommandsState) {
    commands_state.labels.set(Vec::new());
}

#[given("the current git branch is {branch}")]
fn current_git_branch(commands_state: &CommandsState, branch: String) {
    commands_state.branch.set(branch);
}

#[given("the program is {program}")]
fn program_is(commands_state: &CommandsState, program: String) {
    commands_state.program.set(program);
}

#[when("fugu is invoked with {args}")]
fn fugu_is_invoked(commands_state: &CommandsState, args: String) -> StepResult<()> {
    let dir = TempDir::new().map_err(|e| e.to_string())?;
    let workdir = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .map_err(|path| format!("non-UTF-8 path: {}", path.display()))?;
    let document = commands_state.document();
    if !document.is_empty() {
        fs::write(workdir.join("fugu.yml"), document).map_err(|e| e.to_string())?;
    }

    let cli = Cli::try_parse_from(std::iter::once("fugu").chain(args.split_whitespace()))
        .map_err(|e| e.to_string())?;
    let config = AppConfig {
        program: commands_state
            .program
            .get()
            .unwrap_or_else(|| String::from("docker")),
        ..AppConfig::default()
    };
    let env = mockable::DefaultEnv::new();
    let runner = ShellRunner::new(&config.shell);
    let branch = FixedBranch(commands_state.branch.get());
    let session = Session {
        config: &config,
        env: &env,
        runner: &runner,
        branch: &branch,
        workdir: &workdir,
    };

    let mut stdout = Vec::new();
    let dispatched = session.dispatch(&cli.command, &mut Cursor::new(Vec::new()), &mut stdout);
    let outcome = match dispatched {
        Ok(result) => InvocationOutcome::Completed {
            stdout: String::from_utf8(stdout).map_err(|e| e.to_string())?,
            status: match result {
                CommandOutcome::Success => 0,
                CommandOutcome::CommandExit { code } => code,
            },
        },
        Err(error) => InvocationOutcome::Failed {
            message: error.to_string(),
            status: error.exit_code(),
        },
    };
    commands_state.outcome.set(outcome);
    Ok(())
}
