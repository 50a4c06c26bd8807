//! `fugu` application entry point.
//!
//! The binary is a thin adapter over the library. It uses `eyre` for opaque
//! error reports at the application boundary, after the domain error has
//! picked the process exit status.
//!
//! fugu's own settings are loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/fugu/config.toml` or path from `FUGU_CONFIG_PATH`)
//! 3. Environment variables (`FUGU_*`)
//! 4. Global command-line options

use std::io::{self, Write};
use std::process::ExitCode;

use camino::Utf8Path;
use clap::Parser;
use eyre::Report;
use fugu::app::{CommandOutcome, Session};
use fugu::config::{Cli, load_config};
use fugu::error::Result as FuguResult;
use fugu::exec::{GitBranchProvider, ShellRunner};
use fugu::logging;

/// Application entry point.
///
/// Usage errors exit with `1`, help and version output with `0`. A command
/// that ran and failed passes its own status through.
fn main() -> ExitCode {
    if let Err(error) = logging::init() {
        report(&Report::msg(format!("logging disabled: {error}")));
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let code = u8::from(error.use_stderr());
            if let Err(print_error) = error.print() {
                report(&Report::from(print_error));
            }
            return ExitCode::from(code);
        }
    };

    match run(&cli) {
        Ok(CommandOutcome::Success) => ExitCode::SUCCESS,
        Ok(CommandOutcome::CommandExit { code }) => {
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
        Err(error) => {
            let code = error.exit_code();
            report(&Report::from(error));
            ExitCode::from(code)
        }
    }
}

/// Load settings and dispatch the subcommand, returning domain errors.
///
/// Keeps semantic errors inside the run loop so the CLI boundary owns
/// conversion to `eyre::Report`.
fn run(cli: &Cli) -> FuguResult<CommandOutcome> {
    let config = load_config(cli)?;
    let env = mockable::DefaultEnv::new();
    let runner = ShellRunner::new(&config.shell);
    let branch = GitBranchProvider::new();
    let session = Session {
        config: &config,
        env: &env,
        runner: &runner,
        branch: &branch,
        workdir: Utf8Path::new("."),
    };

    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    let outcome = session.dispatch(&cli.command, &mut stdin, &mut stdout)?;
    stdout.flush()?;
    Ok(outcome)
}

/// Print an error report.
#[expect(clippy::print_stderr, reason = "CLI error output is the intended behaviour")]
fn report(error: &Report) {
    eprintln!("fugu: {error:?}");
}
