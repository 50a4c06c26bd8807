//! Usage text.

use std::io::{self, Write};

use crate::command::Subcommand;
use crate::flags::schema_for;

/// Width of the command column in the general usage.
const NAME_WIDTH: usize = 12;

/// Write the overview of every subcommand.
///
/// # Errors
///
/// Returns the I/O error when `out` cannot be written.
pub fn write_general_usage(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Usage: fugu [--config PATH] [--program NAME] [--dry-run] <COMMAND> [LABEL] [OPTIONS] [ARGS...]")?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    for command in Subcommand::ALL {
        writeln!(
            out,
            "  {:<NAME_WIDTH$}{}",
            command.as_str(),
            schema_for(command).about()
        )?;
    }
    writeln!(
        out,
        "  {:<NAME_WIDTH$}Show general usage or the usage of one command",
        "help"
    )?;
    writeln!(out)?;
    writeln!(out, "Run 'fugu help <COMMAND>' for the options of a command.")
}

/// Write the usage of one subcommand, listing all of its flags.
///
/// # Errors
///
/// Returns the I/O error when `out` cannot be written.
pub fn write_command_usage(command: Subcommand, out: &mut dyn Write) -> io::Result<()> {
    let help = schema_for(command).to_command().render_help();
    write!(out, "{help}")
}
