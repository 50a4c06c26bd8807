//! Serialisation of resolved cells into an external command line.

use std::fmt;

use crate::value::{TypedValue, shell_word};

/// A fully built external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    subcommand: String,
    tokens: Vec<String>,
}

impl Invocation {
    /// The external program, e.g. `docker`.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The external program's subcommand, e.g. `run`.
    #[must_use]
    pub fn subcommand(&self) -> &str {
        &self.subcommand
    }

    /// Option tokens followed by the positional tail.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Program, subcommand, and tokens as one argument vector.
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        [self.program.clone(), self.subcommand.clone()]
            .into_iter()
            .chain(self.tokens.iter().cloned())
            .collect()
    }

    /// The space-joined command line, suitable for `sh -c`.
    #[must_use]
    pub fn command_line(&self) -> String {
        self.argv().join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Builds an [`Invocation`] from resolved cells.
///
/// Option tokens are sorted so the output never depends on cell order. The
/// target, command, and command arguments follow in that order, unsorted.
#[derive(Debug, Clone, Default)]
pub struct ArgumentBuilder {
    program: String,
    subcommand: String,
    home: Option<String>,
    raw_options: Vec<String>,
    target: String,
    command: String,
    args: Vec<String>,
}

impl ArgumentBuilder {
    /// Start building `program subcommand ...`.
    #[must_use]
    pub fn new(program: &str, subcommand: &str) -> Self {
        Self {
            program: program.to_owned(),
            subcommand: subcommand.to_owned(),
            ..Self::default()
        }
    }

    /// Expand a leading `~` in string values to `home`.
    #[must_use]
    pub fn home(self, home: Option<&str>) -> Self {
        Self {
            home: home.map(str::to_owned),
            ..self
        }
    }

    /// Add a literal option token, sorted together with the cell tokens.
    #[must_use]
    pub fn option(mut self, token: &str) -> Self {
        self.raw_options.push(token.to_owned());
        self
    }

    /// The positional target, an image or container name.
    #[must_use]
    pub fn target(self, target: &str) -> Self {
        Self {
            target: target.to_owned(),
            ..self
        }
    }

    /// The command to run in the container.
    #[must_use]
    pub fn command(self, command: &str) -> Self {
        Self {
            command: command.to_owned(),
            ..self
        }
    }

    /// Arguments for the command, kept in order.
    #[must_use]
    pub fn args(self, args: &[String]) -> Self {
        Self {
            args: args.to_vec(),
            ..self
        }
    }

    /// Render `cells` and assemble the invocation.
    #[must_use]
    pub fn build<'c>(self, cells: impl IntoIterator<Item = &'c TypedValue>) -> Invocation {
        let home = self.home.as_deref();
        let mut tokens: Vec<String> = cells
            .into_iter()
            .flat_map(|cell| match home {
                Some(dir) => cell.map_text(|text| expand_tilde(text, dir)).arg(),
                None => cell.arg(),
            })
            .chain(self.raw_options.iter().cloned())
            .collect();
        tokens.sort();

        let tail = [self.target.as_str(), self.command.as_str()];
        tokens.extend(
            tail.iter()
                .filter(|part| !part.is_empty())
                .map(|part| shell_word(part)),
        );
        tokens.extend(self.args.iter().map(|arg| shell_word(arg)));

        Invocation {
            program: self.program,
            subcommand: self.subcommand,
            tokens,
        }
    }
}

/// Replace a leading `~` with `home`.
pub(super) fn expand_tilde(text: &str, home: &str) -> String {
    match text.strip_prefix('~') {
        Some("") => home.to_owned(),
        Some(rest) if rest.starts_with('/') => format!("{home}{rest}"),
        _ => text.to_owned(),
    }
}
