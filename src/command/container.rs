//! Commands that drive a container or image through the external tool.

use super::{ArgumentBuilder, Context, DEFAULT_SHELL, Invocation};
use crate::error::{CommandError, Result};
use crate::flags::FlagSchema;
use crate::merge::Collected;
use crate::value::{TypedValue, ValueSet};

/// Build context sources, lowest precedence first.
const CONTEXT_FLAGS: &[&str] = &["path", "url"];

pub(super) fn build(
    context: &Context<'_>,
    schema: &FlagSchema,
    collected: Collected,
) -> Result<Invocation> {
    let Collected {
        mut cells,
        remaining,
        ..
    } = collected;
    let image = required(&cells, "image", CommandError::MissingImage)?;

    if cells.is_true("tag-git-branch") {
        let branch = context
            .branch
            .current_branch()
            .map_err(|e| CommandError::TagGitBranch {
                reason: e.to_string(),
            })?;
        cells.set_text("tag", &branch)?;
    }
    let reference = tagged(&image, cells.text("tag"));
    cells.set_text("tag", &reference)?;

    let build_context = match remaining.as_slice() {
        [] => CONTEXT_FLAGS
            .iter()
            .rev()
            .find(|name| cells.is_defined(name))
            .map_or(".", |name| cells.text(name))
            .to_owned(),
        [path] => path.clone(),
        _ => return Err(CommandError::TooManyArgs.into()),
    };

    Ok(builder(context, "build")
        .target(&build_context)
        .build(passthrough(schema, &cells)))
}

pub(super) fn run(
    context: &Context<'_>,
    schema: &FlagSchema,
    collected: &Collected,
) -> Result<Invocation> {
    let image = required(&collected.cells, "image", CommandError::MissingImage)?;
    let (command, args) = command_and_args(collected);
    Ok(builder(context, "run")
        .target(&image)
        .command(&command)
        .args(&args)
        .build(passthrough(schema, &collected.cells)))
}

pub(super) fn exec(
    context: &Context<'_>,
    schema: &FlagSchema,
    collected: &Collected,
) -> Result<Invocation> {
    let name = required(&collected.cells, "name", CommandError::MissingName)?;
    let (command, args) = command_and_args(collected);
    Ok(builder(context, "exec")
        .target(&name)
        .command(&command)
        .args(&args)
        .build(passthrough(schema, &collected.cells)))
}

pub(super) fn shell(
    context: &Context<'_>,
    schema: &FlagSchema,
    collected: Collected,
) -> Result<Invocation> {
    let Collected {
        mut cells,
        remaining,
        ..
    } = collected;
    let name = required(&cells, "name", CommandError::MissingName)?;
    if !remaining.is_empty() {
        return Err(CommandError::TooManyArgs.into());
    }
    cells.set_bool("interactive", true)?;
    cells.set_bool("tty", true)?;
    cells.set_bool("detach", false)?;
    let shell = if cells.is_defined("shell") {
        cells.text("shell")
    } else {
        DEFAULT_SHELL
    };

    Ok(builder(context, "exec")
        .target(&name)
        .command(shell)
        .build(passthrough(schema, &cells)))
}

pub(super) fn destroy(
    context: &Context<'_>,
    schema: &FlagSchema,
    collected: &Collected,
) -> Result<Invocation> {
    let name = required(&collected.cells, "name", CommandError::MissingName)?;
    if !collected.remaining.is_empty() {
        return Err(CommandError::TooManyArgs.into());
    }
    Ok(builder(context, "rm")
        .option("-f")
        .target(&name)
        .build(passthrough(schema, &collected.cells)))
}

/// `push` and `pull`, which only differ in the external subcommand.
pub(super) fn transfer(
    context: &Context<'_>,
    schema: &FlagSchema,
    collected: &Collected,
    subcommand: &str,
) -> Result<Invocation> {
    let image = required(&collected.cells, "image", CommandError::MissingImage)?;
    let tag = match collected.remaining.as_slice() {
        [] => collected.cells.text("tag"),
        [tag] => tag.as_str(),
        _ => return Err(CommandError::TooManyArgs.into()),
    };
    Ok(builder(context, subcommand)
        .target(&tagged(&image, tag))
        .build(passthrough(schema, &collected.cells)))
}

fn builder(context: &Context<'_>, subcommand: &str) -> ArgumentBuilder {
    ArgumentBuilder::new(context.program, subcommand).home(context.home)
}

/// The cells the external tool receives as options.
pub(super) fn passthrough<'c>(
    schema: &FlagSchema,
    cells: &'c ValueSet,
) -> impl Iterator<Item = &'c TypedValue> + use<'c> {
    let names = schema.passthrough_names();
    cells.iter().filter(move |cell| names.contains(&cell.name()))
}

fn required(cells: &ValueSet, name: &str, missing: CommandError) -> Result<String> {
    match cells.text(name) {
        "" => Err(missing.into()),
        value => Ok(value.to_owned()),
    }
}

/// Positionals replace `--command` and, when more than one, `--arg`.
fn command_and_args(collected: &Collected) -> (String, Vec<String>) {
    let configured = (
        collected.cells.text("command").to_owned(),
        collected.cells.list("arg").to_vec(),
    );
    match collected.remaining.split_first() {
        None => configured,
        Some((command, [])) => (command.clone(), configured.1),
        Some((command, args)) => (command.clone(), args.to_vec()),
    }
}

fn tagged(image: &str, tag: &str) -> String {
    if tag.is_empty() {
        image.to_owned()
    } else {
        format!("{image}:{tag}")
    }
}
