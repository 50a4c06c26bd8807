//! Command-line interface definitions.
//!
//! Global options are accepted before the subcommand only. Everything after
//! the subcommand name is handed verbatim to the per-subcommand flag tables,
//! which know the docker options clap cannot declare statically.

use camino::Utf8PathBuf;
use clap::{Args, Parser};

use crate::command::Subcommand;

/// Command-line interface for fugu.
#[derive(Debug, Parser)]
#[command(name = "fugu")]
#[command(
    author,
    version,
    about = "Build docker command lines from labelled YAML configuration"
)]
#[command(disable_help_subcommand = true, arg_required_else_help = true)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to fugu's own configuration file.
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// External program to build commands for.
    #[arg(long)]
    pub program: Option<String>,

    /// Print every docker command instead of running it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Available subcommands.
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Build an image from a Dockerfile.
    #[command(disable_help_flag = true)]
    Build(PassthroughArgs),

    /// Run a command in a new container.
    #[command(disable_help_flag = true)]
    Run(PassthroughArgs),

    /// Run a command in a running container.
    #[command(disable_help_flag = true)]
    Exec(PassthroughArgs),

    /// Open a shell in a running container.
    #[command(disable_help_flag = true)]
    Shell(PassthroughArgs),

    /// Force-remove a container.
    #[command(disable_help_flag = true)]
    Destroy(PassthroughArgs),

    /// Push an image to its registry.
    #[command(disable_help_flag = true)]
    Push(PassthroughArgs),

    /// Pull an image from its registry.
    #[command(disable_help_flag = true)]
    Pull(PassthroughArgs),

    /// List local images or the images of a remote registry.
    #[command(disable_help_flag = true)]
    Images(PassthroughArgs),

    /// Print the resolved data of a label as YAML.
    #[command(disable_help_flag = true)]
    ShowData(PassthroughArgs),

    /// Print the labels defined by the sources.
    #[command(disable_help_flag = true)]
    ShowLabels(PassthroughArgs),

    /// Show general usage or the usage of one command.
    Help(HelpArgs),
}

impl Commands {
    /// The fugu subcommand and its raw tokens, or `None` for `help`.
    #[must_use]
    pub const fn subcommand(&self) -> Option<(Subcommand, &[String])> {
        let (command, args) = match self {
            Self::Build(args) => (Subcommand::Build, args),
            Self::Run(args) => (Subcommand::Run, args),
            Self::Exec(args) => (Subcommand::Exec, args),
            Self::Shell(args) => (Subcommand::Shell, args),
            Self::Destroy(args) => (Subcommand::Destroy, args),
            Self::Push(args) => (Subcommand::Push, args),
            Self::Pull(args) => (Subcommand::Pull, args),
            Self::Images(args) => (Subcommand::Images, args),
            Self::ShowData(args) => (Subcommand::ShowData, args),
            Self::ShowLabels(args) => (Subcommand::ShowLabels, args),
            Self::Help(_) => return None,
        };
        Some((command, args.args.as_slice()))
    }
}

/// Raw tokens for a subcommand, resolved later against its flag table.
#[derive(Debug, Args)]
pub struct PassthroughArgs {
    /// Label, flags, and positionals for the subcommand.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    pub args: Vec<String>,
}

/// Arguments for the `help` subcommand.
#[derive(Debug, Args)]
pub struct HelpArgs {
    /// The command to describe.
    pub command: Option<String>,
}
