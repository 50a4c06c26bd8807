//! `fugu images`: local listing through the external tool, or a registry query.

use super::builder::expand_tilde;
use super::container::passthrough;
use super::{Action, ArgumentBuilder, Context};
use crate::error::{CommandError, Result};
use crate::flags::FlagSchema;
use crate::merge::Collected;
use crate::value::{Payload, ValueSet};

/// Credential file read when no other credentials are given.
pub const DEFAULT_CREDENTIALS_FILE: &str = "~/.dockercfg";

/// Explicit credential flags, each incompatible with `--file`.
const CREDENTIAL_FLAGS: &[&str] = &["user", "password", "password-stdin"];

/// Where registry credentials come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// User and password given on the command line.
    Explicit {
        /// Registry user.
        user: String,
        /// Registry password.
        password: String,
    },
    /// User given on the command line, password read from standard input.
    Stdin {
        /// Registry user.
        user: String,
    },
    /// A docker credential file keyed by registry host.
    File(String),
}

/// A request to list the images of a remote registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryQuery {
    /// Registry host, e.g. `registry.example.com`.
    pub registry: String,
    /// How to authenticate.
    pub credentials: CredentialSource,
}

pub(super) fn plan(
    context: &Context<'_>,
    schema: &FlagSchema,
    collected: &Collected,
) -> Result<Action> {
    let cells = &collected.cells;
    let registry = match collected.remaining.as_slice() {
        [] => {
            let invocation =
                ArgumentBuilder::new(context.program, "images").build(passthrough(schema, cells));
            return Ok(Action::Invoke {
                invocation,
                dry_run: cells.is_true("dry-run"),
            });
        }
        [registry] => registry.clone(),
        _ => return Err(CommandError::TooManyArgs.into()),
    };
    let credentials = credential_source(cells, context.home)?;
    Ok(Action::ListRegistry(RegistryQuery {
        registry,
        credentials,
    }))
}

fn credential_source(
    cells: &ValueSet,
    home: Option<&str>,
) -> std::result::Result<CredentialSource, CommandError> {
    let explicit = CREDENTIAL_FLAGS
        .iter()
        .copied()
        .find(|name| given(cells, name));
    if let Some(flag) = explicit.filter(|_| given(cells, "file")) {
        return Err(conflict("file", flag));
    }

    let user = cells.text("user");
    let password = cells.text("password");
    let from_stdin = cells.is_true("password-stdin");
    if !password.is_empty() && from_stdin {
        return Err(conflict("password", "password-stdin"));
    }
    if given(cells, "user") && user.is_empty() {
        return Err(CommandError::NoCredentials);
    }
    if user.is_empty() {
        if explicit.is_some() {
            return Err(CommandError::MissingFlag {
                flag: String::from("user"),
            });
        }
        let file = match cells.text("file") {
            "" => DEFAULT_CREDENTIALS_FILE,
            file => file,
        };
        return Ok(CredentialSource::File(
            home.map_or_else(|| file.to_owned(), |dir| expand_tilde(file, dir)),
        ));
    }
    if from_stdin {
        return Ok(CredentialSource::Stdin {
            user: user.to_owned(),
        });
    }
    Ok(CredentialSource::Explicit {
        user: user.to_owned(),
        password: password.to_owned(),
    })
}

/// Whether the user supplied `name`, even as an empty string. A switch
/// counts only when true.
fn given(cells: &ValueSet, name: &str) -> bool {
    cells
        .get(name)
        .is_some_and(|cell| cell.is_defined() && *cell.get() != Payload::Bool(false))
}

fn conflict(first: &str, second: &str) -> CommandError {
    CommandError::ConflictingFlags {
        first: first.to_owned(),
        second: second.to_owned(),
    }
}
