//! External process execution.
//!
//! The final command line is handed to a shell so the quoting produced by
//! [`crate::command::ArgumentBuilder`] is interpreted exactly as printed by
//! `--dry-run`. Standard streams are inherited; fugu only reports the exit
//! status.

use std::process::{Command, Stdio};

use camino::Utf8PathBuf;
use tracing::{debug, instrument};

use crate::error::ExecError;

/// Runs a command line and reports its exit status.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Run `command_line` to completion, forwarding standard streams.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::SpawnFailed`] when the process cannot be started
    /// and [`ExecError::Terminated`] when it exits without a status code.
    fn run(&self, command_line: &str) -> Result<i32, ExecError>;
}

/// Runs command lines through `<shell> -c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellRunner {
    shell: String,
}

impl ShellRunner {
    /// Create a runner using `shell`, for example `sh`.
    #[must_use]
    pub fn new(shell: &str) -> Self {
        Self {
            shell: shell.to_owned(),
        }
    }
}

impl CommandRunner for ShellRunner {
    #[instrument(skip(self), fields(shell = %self.shell))]
    fn run(&self, command_line: &str) -> Result<i32, ExecError> {
        let status = Command::new(&self.shell)
            .arg("-c")
            .arg(command_line)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| ExecError::SpawnFailed {
                command: command_line.to_owned(),
                message: e.to_string(),
            })?;
        debug!(?status, "command finished");
        status.code().ok_or_else(|| ExecError::Terminated {
            command: command_line.to_owned(),
        })
    }
}

/// Supplies the name of the current git branch.
#[cfg_attr(test, mockall::automock)]
pub trait BranchProvider {
    /// The checked-out branch.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] when git cannot be run or reports a failure.
    fn current_branch(&self) -> Result<String, ExecError>;
}

/// Reads the branch with `git rev-parse --abbrev-ref HEAD`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitBranchProvider {
    dir: Option<Utf8PathBuf>,
}

impl GitBranchProvider {
    /// Query the repository containing the working directory.
    #[must_use]
    pub const fn new() -> Self {
        Self { dir: None }
    }

    /// Query the repository containing `dir` instead.
    #[must_use]
    pub fn in_dir(dir: Utf8PathBuf) -> Self {
        Self { dir: Some(dir) }
    }
}

const GIT_BRANCH_ARGS: &[&str] = &["rev-parse", "--abbrev-ref", "HEAD"];

impl BranchProvider for GitBranchProvider {
    fn current_branch(&self) -> Result<String, ExecError> {
        let command_line = format!("git {}", GIT_BRANCH_ARGS.join(" "));
        let mut git = Command::new("git");
        git.args(GIT_BRANCH_ARGS).stdin(Stdio::null());
        if let Some(dir) = &self.dir {
            git.current_dir(dir);
        }
        let output = git.output().map_err(|e| ExecError::SpawnFailed {
            command: command_line.clone(),
            message: e.to_string(),
        })?;
        match output.status.code() {
            Some(0) => Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned()),
            Some(code) => Err(ExecError::Unsuccessful {
                command: command_line,
                code,
            }),
            None => Err(ExecError::Terminated {
                command: command_line,
            }),
        }
    }
}
