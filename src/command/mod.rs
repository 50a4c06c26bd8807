//! Subcommand business logic.
//!
//! Each subcommand validates the merged cells it receives from the
//! [`Collector`](crate::merge::Collector), derives whatever the external tool
//! needs (an `image:tag` reference, a build context, a forced shell), and
//! returns an [`Action`] for the application layer to carry out. Nothing in
//! here touches the terminal or spawns a process.

mod builder;
mod container;
mod images;
mod info;

#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

pub use builder::{ArgumentBuilder, Invocation};
pub use images::{CredentialSource, DEFAULT_CREDENTIALS_FILE, RegistryQuery};

use crate::error::{CommandError, Result};
use crate::exec::BranchProvider;
use crate::flags::FlagSchema;
use crate::merge::Collected;

/// Shell started by `fugu shell` when none is configured.
pub const DEFAULT_SHELL: &str = "/bin/bash";

/// The subcommands fugu understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subcommand {
    /// `docker build`.
    Build,
    /// `docker run`.
    Run,
    /// `docker exec`.
    Exec,
    /// `docker exec` with an interactive shell.
    Shell,
    /// `docker rm -f`.
    Destroy,
    /// `docker push`.
    Push,
    /// `docker pull`.
    Pull,
    /// Local or registry image listing.
    Images,
    /// Dump the merged label data.
    ShowData,
    /// List the known labels.
    ShowLabels,
}

impl Subcommand {
    /// Every subcommand, in help order.
    pub const ALL: [Self; 10] = [
        Self::Build,
        Self::Run,
        Self::Exec,
        Self::Shell,
        Self::Destroy,
        Self::Push,
        Self::Pull,
        Self::Images,
        Self::ShowData,
        Self::ShowLabels,
    ];

    /// The name typed on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Run => "run",
            Self::Exec => "exec",
            Self::Shell => "shell",
            Self::Destroy => "destroy",
            Self::Push => "push",
            Self::Pull => "pull",
            Self::Images => "images",
            Self::ShowData => "show-data",
            Self::ShowLabels => "show-labels",
        }
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subcommand {
    type Err = CommandError;

    fn from_str(name: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.as_str() == name)
            .ok_or_else(|| CommandError::UnknownCommand {
                name: name.to_owned(),
            })
    }
}

/// What a subcommand resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run an external command, or only print it.
    Invoke {
        /// The command to run.
        invocation: Invocation,
        /// Print instead of running.
        dry_run: bool,
    },
    /// Print text to standard output.
    Print(String),
    /// List the images of a remote registry.
    ListRegistry(RegistryQuery),
    /// Print the usage of a subcommand.
    Help(Subcommand),
}

/// Inputs the business logic needs beyond the merged cells.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    /// The external program, usually `docker`.
    pub program: &'a str,
    /// Home directory used for `~` expansion.
    pub home: Option<&'a str>,
    /// Source of the current git branch for `--tag-git-branch`.
    pub branch: &'a dyn BranchProvider,
}

/// Validate `collected` for `command` and decide what to do.
///
/// # Errors
///
/// Returns [`CommandError`] (wrapped in [`crate::error::FuguError`]) when a
/// required field is missing, too many positionals were given, or flags
/// conflict.
pub fn plan(
    command: Subcommand,
    schema: &FlagSchema,
    collected: Collected,
    context: &Context<'_>,
) -> Result<Action> {
    if collected.help {
        return Ok(Action::Help(command));
    }
    let dry_run = collected.cells.is_true("dry-run");
    let invocation = match command {
        Subcommand::Build => container::build(context, schema, collected)?,
        Subcommand::Run => container::run(context, schema, &collected)?,
        Subcommand::Exec => container::exec(context, schema, &collected)?,
        Subcommand::Shell => container::shell(context, schema, collected)?,
        Subcommand::Destroy => container::destroy(context, schema, &collected)?,
        Subcommand::Push | Subcommand::Pull => {
            container::transfer(context, schema, &collected, command.as_str())?
        }
        Subcommand::Images => return images::plan(context, schema, &collected),
        Subcommand::ShowData => return info::show_data(&collected).map(Action::Print),
        Subcommand::ShowLabels => return info::show_labels(&collected).map(Action::Print),
    };
    tracing::debug!(%command, %invocation, dry_run, "built invocation");
    Ok(Action::Invoke {
        invocation,
        dry_run,
    })
}
