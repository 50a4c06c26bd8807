//! Dispatch of a parsed command line.
//!
//! A [`Session`] bundles the settings and the outside world (environment,
//! process runner, git) that one invocation needs. It resolves the
//! subcommand's flags and sources, asks [`crate::command::plan`] what to do,
//! and carries the resulting [`Action`] out: printing, running the external
//! tool, or querying a registry. Output goes to a caller-supplied writer so
//! the whole path is testable without a terminal.

mod usage;


use std::io::{BufRead, Write};

use camino::Utf8Path;
use tracing::{debug, info};

pub use usage::{write_command_usage, write_general_usage};

use crate::command::{self, Action, Context, Invocation, RegistryQuery, Subcommand};
use crate::config::{AppConfig, Commands};
use crate::error::{RegistryError, Result};
use crate::exec::{BranchProvider, CommandRunner};
use crate::flags::schema_for;
use crate::merge::Collector;
use crate::registry::{HttpRegistryClient, credentials, list_images, render_table};
use crate::source::{self, Source};

/// How a dispatched command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command completed successfully.
    Success,
    /// The external command exited with a non-zero status.
    CommandExit {
        /// The status the command exited with.
        code: i32,
    },
}

/// Everything one invocation runs against.
pub struct Session<'a, E> {
    /// fugu's resolved settings.
    pub config: &'a AppConfig,
    /// Process environment for `$NAME` substitution and `HOME`.
    pub env: &'a E,
    /// Runs built command lines.
    pub runner: &'a dyn CommandRunner,
    /// Supplies the git branch for `--tag-git-branch`.
    pub branch: &'a dyn BranchProvider,
    /// Directory searched for a default source document.
    pub workdir: &'a Utf8Path,
}

impl<E: mockable::Env> Session<'_, E> {
    /// Dispatch a parsed subcommand.
    ///
    /// `stdin` supplies a registry password for `images --password-stdin`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FuguError`] for any resolution, validation,
    /// registry, or process failure, and when `out` cannot be written.
    pub fn dispatch(
        &self,
        command: &Commands,
        stdin: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> Result<CommandOutcome> {
        match command {
            Commands::Help(args) => {
                match args.command.as_deref() {
                    None => write_general_usage(out)?,
                    Some(name) => write_command_usage(name.parse()?, out)?,
                }
                Ok(CommandOutcome::Success)
            }
            other => match other.subcommand() {
                Some((subcommand, tokens)) => self.execute(subcommand, tokens, stdin, out),
                None => Ok(CommandOutcome::Success),
            },
        }
    }

    /// Resolve `tokens` for `command` and carry out the result.
    ///
    /// # Errors
    ///
    /// See [`Session::dispatch`].
    pub fn execute(
        &self,
        command: Subcommand,
        tokens: &[String],
        stdin: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> Result<CommandOutcome> {
        let schema = schema_for(command);
        let collected = Collector::new(&schema, self.env)
            .with_default_source(self.default_source())
            .collect(tokens)?;
        let home = self.env.string("HOME");
        let context = Context {
            program: &self.config.program,
            home: home.as_deref(),
            branch: self.branch,
        };
        match command::plan(command, &schema, collected, &context)? {
            Action::Invoke {
                invocation,
                dry_run,
            } => self.invoke(&invocation, dry_run || self.config.dry_run, out),
            Action::Print(text) => {
                out.write_all(text.as_bytes())?;
                Ok(CommandOutcome::Success)
            }
            Action::ListRegistry(query) => {
                list_registry(&query, stdin, out)?;
                Ok(CommandOutcome::Success)
            }
            Action::Help(subcommand) => {
                write_command_usage(subcommand, out)?;
                Ok(CommandOutcome::Success)
            }
        }
    }

    /// The configured default source, else a document found in the
    /// working directory.
    fn default_source(&self) -> Option<Source> {
        let path = self
            .config
            .file
            .clone()
            .or_else(|| source::discover(self.workdir));
        debug!(?path, "default source");
        path.map(Source::File)
    }

    fn invoke(
        &self,
        invocation: &Invocation,
        dry_run: bool,
        out: &mut dyn Write,
    ) -> Result<CommandOutcome> {
        if dry_run {
            writeln!(out, "{invocation}")?;
            return Ok(CommandOutcome::Success);
        }
        let line = invocation.command_line();
        info!(command = %line, "running");
        match self.runner.run(&line)? {
            0 => Ok(CommandOutcome::Success),
            code => Ok(CommandOutcome::CommandExit { code }),
        }
    }
}

/// Query a registry and print its images as a table.
fn list_registry(
    query: &RegistryQuery,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let found = credentials::resolve(&query.credentials, &query.registry, stdin)?;
    let client = HttpRegistryClient::new(&query.registry, found);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| RegistryError::RuntimeUnavailable {
            message: e.to_string(),
        })?;
    let images = runtime.block_on(list_images(&client))?;
    out.write_all(render_table(&images).as_bytes())?;
    Ok(())
}
