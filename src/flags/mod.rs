//! Command-line flag resolution.
//!
//! Each subcommand declares its flags as a [`FlagSchema`]: a `fugu` group of
//! tool flags that drive business logic, and a `docker` group of flags passed
//! through to the external tool. [`FlagResolver`] turns a token list into
//! [`ParsedFlags`], recording for every flag whether the user supplied it on
//! this invocation or it merely holds its declared default.

mod tables;


use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_yaml::Value;
use tracing::trace;

pub use tables::schema_for;

use crate::error::FlagError;
use crate::value::{TypedValue, ValueKind, ValueSet};

/// Tokens recognised as a request for help.
const HELP_TOKENS: &[&str] = &["--help", "-help", "-h"];

/// Identifier of the positional catch-all argument.
const REMAINING: &str = "remaining";

/// Declaration of a single flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    names: &'static [&'static str],
    kind: ValueKind,
    default: Option<&'static str>,
    help: &'static str,
}

impl FlagSpec {
    /// Declare a string flag.
    #[must_use]
    pub const fn string(names: &'static [&'static str], help: &'static str) -> Self {
        Self::new(ValueKind::String, names, help)
    }

    /// Declare a boolean flag.
    #[must_use]
    pub const fn bool(names: &'static [&'static str], help: &'static str) -> Self {
        Self::new(ValueKind::Bool, names, help)
    }

    /// Declare an integer flag.
    #[must_use]
    pub const fn int(names: &'static [&'static str], help: &'static str) -> Self {
        Self::new(ValueKind::Int, names, help)
    }

    /// Declare a repeatable list flag.
    #[must_use]
    pub const fn list(names: &'static [&'static str], help: &'static str) -> Self {
        Self::new(ValueKind::List, names, help)
    }

    const fn new(kind: ValueKind, names: &'static [&'static str], help: &'static str) -> Self {
        Self {
            names,
            kind,
            default: None,
            help,
        }
    }

    /// Attach a declared default, shown in help and reported when unset.
    #[must_use]
    pub const fn with_default(self, default: &'static str) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }

    /// The canonical name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.names.first().copied().unwrap_or_default()
    }

    /// The declared kind.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    /// The declared default.
    #[must_use]
    pub const fn default_value(&self) -> Option<&'static str> {
        self.default
    }

    /// An undefined cell shaped after this flag.
    #[must_use]
    pub fn cell(&self) -> TypedValue {
        TypedValue::new(self.kind, self.names)
    }

    fn to_arg(self) -> Arg {
        let name = self.name();
        let mut arg = Arg::new(name).long(name).help(self.help);
        for alias in self.names.iter().skip(1) {
            let mut chars = alias.chars();
            arg = match (chars.next(), chars.next()) {
                (Some(short), None) => arg.short(short),
                _ => arg.visible_alias(*alias),
            };
        }
        arg = match self.kind {
            ValueKind::String | ValueKind::Int => arg.action(ArgAction::Set).num_args(1),
            ValueKind::Bool => arg
                .action(ArgAction::Set)
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .value_parser(["true", "false"]),
            ValueKind::List => arg.action(ArgAction::Append).num_args(1),
        };
        match self.default {
            Some(default) => arg.default_value(default),
            None => arg,
        }
    }
}

/// Which side of the tool boundary a flag group belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Flags consumed by fugu itself.
    Tool,
    /// Flags passed through to the external program.
    Passthrough,
}

/// A named group of flag declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagGroup {
    kind: GroupKind,
    specs: Vec<FlagSpec>,
}

impl FlagGroup {
    /// Create a group.
    #[must_use]
    pub const fn new(kind: GroupKind, specs: Vec<FlagSpec>) -> Self {
        Self { kind, specs }
    }

    /// The group's role.
    #[must_use]
    pub const fn kind(&self) -> GroupKind {
        self.kind
    }

    /// The declarations in this group.
    #[must_use]
    pub fn specs(&self) -> &[FlagSpec] {
        &self.specs
    }
}

/// Every flag one subcommand accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSchema {
    command: &'static str,
    usage: &'static str,
    about: &'static str,
    groups: Vec<FlagGroup>,
}

impl FlagSchema {
    /// Create a schema for `command`.
    #[must_use]
    pub const fn new(
        command: &'static str,
        usage: &'static str,
        about: &'static str,
        groups: Vec<FlagGroup>,
    ) -> Self {
        Self {
            command,
            usage,
            about,
            groups,
        }
    }

    /// The subcommand name.
    #[must_use]
    pub const fn command(&self) -> &'static str {
        self.command
    }

    /// One-line description of the subcommand.
    #[must_use]
    pub const fn about(&self) -> &'static str {
        self.about
    }

    /// The groups in declaration order.
    #[must_use]
    pub fn groups(&self) -> &[FlagGroup] {
        &self.groups
    }

    /// All declarations, tool flags first.
    pub fn specs(&self) -> impl Iterator<Item = &FlagSpec> {
        self.groups.iter().flat_map(|group| group.specs.iter())
    }

    /// Whether the schema declares a flag called `name`.
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.specs().any(|spec| spec.names.contains(&name))
    }

    /// Whether `name` is a declared flag that reads its value from the
    /// following token when none is attached.
    fn takes_separate_value(&self, name: &str) -> bool {
        self.specs()
            .any(|spec| spec.kind != ValueKind::Bool && spec.names.contains(&name))
    }

    /// Canonical names of the passthrough flags.
    #[must_use]
    pub fn passthrough_names(&self) -> Vec<&'static str> {
        self.groups
            .iter()
            .filter(|group| group.kind == GroupKind::Passthrough)
            .flat_map(|group| group.specs.iter().map(FlagSpec::name))
            .collect()
    }

    /// Fresh, undefined cells for every declared flag.
    #[must_use]
    pub fn cells(&self) -> ValueSet {
        ValueSet::new(self.specs().map(FlagSpec::cell).collect())
    }

    /// The clap command equivalent to this schema.
    ///
    /// Used for parsing and to render per-command help.
    #[must_use]
    pub fn to_command(&self) -> Command {
        let base = Command::new(self.command)
            .about(self.about)
            .override_usage(self.usage)
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true);
        let with_flags = self
            .specs()
            .fold(base, |command, spec| command.arg(spec.to_arg()));
        with_flags.arg(
            Arg::new(REMAINING)
                .action(ArgAction::Append)
                .num_args(1..)
                .trailing_var_arg(true)
                .hide(true),
        )
    }
}

/// One flag's value after parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagMatch {
    /// Canonical flag name.
    pub name: &'static str,
    /// Parsed value, or the declared default when not supplied.
    pub value: Option<Value>,
    /// Whether the user supplied the flag on this invocation.
    pub supplied: bool,
}

/// The outcome of parsing one token list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFlags {
    /// Every declared flag, in declaration order.
    pub flags: Vec<FlagMatch>,
    /// Positional tokens left after flag matching.
    pub remaining: Vec<String>,
    /// Whether a help token was present.
    pub help: bool,
}

impl ParsedFlags {
    /// The match for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FlagMatch> {
        self.flags.iter().find(|flag| flag.name == name)
    }

    /// Whether `name` was supplied by the user.
    #[must_use]
    pub fn supplied(&self, name: &str) -> bool {
        self.get(name).is_some_and(|flag| flag.supplied)
    }

    /// The flags the user supplied, in declaration order.
    pub fn supplied_flags(&self) -> impl Iterator<Item = &FlagMatch> {
        self.flags.iter().filter(|flag| flag.supplied)
    }

    /// String values of a supplied list flag.
    #[must_use]
    pub fn supplied_list(&self, name: &str) -> Vec<String> {
        match self.get(name) {
            Some(FlagMatch {
                value: Some(Value::Sequence(items)),
                supplied: true,
                ..
            }) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Parses token lists against a schema.
#[derive(Debug, Clone, Copy)]
pub struct FlagResolver<'a> {
    schema: &'a FlagSchema,
}

impl<'a> FlagResolver<'a> {
    /// Create a resolver for `schema`.
    #[must_use]
    pub const fn new(schema: &'a FlagSchema) -> Self {
        Self { schema }
    }

    /// Parse `tokens`.
    ///
    /// Flags are read up to the first positional token or `--`. That token
    /// and everything after it are kept verbatim in
    /// [`ParsedFlags::remaining`], so a container command's own options are
    /// never mistaken for fugu's. Help tokens in the flag region are
    /// stripped and reported through [`ParsedFlags::help`]. String, integer,
    /// and boolean flags keep their last value; list flags collect every
    /// occurrence in order.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::UnknownFlag`] for undeclared flags and
    /// [`FlagError::InvalidUsage`] for any other misuse, such as a missing
    /// value or `--rm=maybe`.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<ParsedFlags, FlagError> {
        let (kept, help) = strip_help(self.schema, tokens);
        let matches = self
            .schema
            .to_command()
            .try_get_matches_from(kept)
            .map_err(|e| flag_error(&e))?;

        let flags = self
            .schema
            .specs()
            .map(|spec| extract(&matches, spec))
            .collect::<Vec<_>>();
        let remaining = matches
            .get_many::<String>(REMAINING)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        trace!(command = self.schema.command, ?remaining, help, "parsed flags");
        Ok(ParsedFlags {
            flags,
            remaining,
            help,
        })
    }
}

fn strip_help<S: AsRef<str>>(schema: &FlagSchema, tokens: &[S]) -> (Vec<String>, bool) {
    let mut help = false;
    let mut kept = Vec::with_capacity(tokens.len());
    let mut positional = false;
    let mut value_pending = false;
    for token in tokens.iter().map(AsRef::as_ref) {
        if positional || value_pending {
            value_pending = false;
        } else if HELP_TOKENS.contains(&token) {
            help = true;
            continue;
        } else if token == "--" {
            positional = true;
        } else if let Some(flag) = token.strip_prefix('-').filter(|rest| !rest.is_empty()) {
            let name = flag.trim_start_matches('-');
            value_pending = !name.contains('=') && schema.takes_separate_value(name);
        } else {
            positional = true;
        }
        kept.push(token.to_owned());
    }
    (kept, help)
}

fn extract(matches: &ArgMatches, spec: &FlagSpec) -> FlagMatch {
    let name = spec.name();
    let supplied = matches.value_source(name) == Some(ValueSource::CommandLine);
    let value = match spec.kind {
        ValueKind::List => matches.get_many::<String>(name).map(|values| {
            Value::Sequence(values.cloned().map(Value::String).collect())
        }),
        ValueKind::String | ValueKind::Bool | ValueKind::Int => matches
            .get_one::<String>(name)
            .cloned()
            .map(Value::String),
    };
    FlagMatch {
        name,
        value,
        supplied,
    }
}

fn flag_error(error: &clap::Error) -> FlagError {
    if let (ErrorKind::UnknownArgument, Some(ContextValue::String(flag))) =
        (error.kind(), error.get(ContextKind::InvalidArg))
    {
        return FlagError::UnknownFlag { flag: flag.clone() };
    }
    let rendered = error.to_string();
    let message = rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .to_owned();
    FlagError::InvalidUsage { message }
}
