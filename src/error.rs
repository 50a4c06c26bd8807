//! Semantic error types for the fugu application.
//!
//! This module defines the error hierarchy for fugu, following the principle of
//! using semantic error enums (via `thiserror`) for conditions the caller might
//! inspect or map to an exit code, while reserving opaque errors
//! (`eyre::Report`) for the application boundary.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::value::ValueKind;

/// Errors raised when a raw value cannot be coerced into a typed cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// The raw value does not fit the cell's declared kind.
    #[error("invalid type for '{name}': expected {expected}, got {found}")]
    InvalidType {
        /// The canonical name of the cell.
        name: String,
        /// The kind the cell accepts.
        expected: ValueKind,
        /// A short description of the rejected value.
        found: String,
    },
}

/// Errors raised while resolving a configuration document into labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The document contains no data.
    #[error("configuration document is empty")]
    EmptyDocument,

    /// The document is not well-formed or does not have the expected shape.
    #[error("failed to parse configuration document: {message}")]
    StructuralParseFailure {
        /// A description of the parse failure.
        message: String,
    },

    /// A value is nested deeper than one mapping level under its label.
    #[error("label '{label}' nests '{key}' too deeply")]
    TooDeeplyNested {
        /// The label holding the offending key.
        label: String,
        /// The key whose value is nested too deeply.
        key: String,
    },

    /// A label has no `image` key, not even through inheritance.
    #[error("label '{label}' has no image")]
    MissingImageKey {
        /// The label missing an image.
        label: String,
    },

    /// Labels inherit from each other in a loop.
    #[error("labels inherit from each other in a cycle: {labels}")]
    CyclicInheritance {
        /// The labels taking part in the cycle, comma separated.
        labels: String,
    },
}

/// Errors raised while parsing command-line flags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// A flag that the subcommand does not declare.
    #[error("unknown flag: {flag}")]
    UnknownFlag {
        /// The offending token.
        flag: String,
    },

    /// A declared flag received a value it cannot take.
    #[error("invalid flag usage: {message}")]
    InvalidUsage {
        /// A description of the problem.
        message: String,
    },
}

/// Errors raised while locating or reading configuration sources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source URI uses a scheme fugu does not read.
    #[error("unsupported source: {uri}")]
    UnsupportedSource {
        /// The rejected URI.
        uri: String,
    },

    /// The source file does not exist.
    #[error("source not found: {path}")]
    SourceNotFound {
        /// The path that was not found.
        path: Utf8PathBuf,
    },

    /// The source file exists but could not be read.
    #[error("failed to read source '{path}': {message}")]
    ReadFailed {
        /// The path that failed.
        path: Utf8PathBuf,
        /// A description of the I/O failure.
        message: String,
    },

    /// The source file was read but its content is invalid.
    #[error("invalid source '{path}': {source}")]
    InvalidDocument {
        /// The path of the document.
        path: String,
        /// The underlying document error.
        source: DocumentError,
    },

    /// A value from a source does not fit its cell.
    #[error("invalid value in source '{path}': {source}")]
    InvalidValue {
        /// The source the value came from.
        path: String,
        /// The underlying type error.
        source: TypeError,
    },
}

/// Validation errors raised by subcommand business logic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The command needs an image and none was configured.
    #[error("no image specified")]
    MissingImage,

    /// The command needs a container name and none was configured.
    #[error("no container name specified")]
    MissingName,

    /// More positional arguments than the command accepts.
    #[error("too many arguments")]
    TooManyArgs,

    /// The requested label does not exist in any source.
    #[error("unknown label: {label}")]
    UnknownLabel {
        /// The label that was requested.
        label: String,
    },

    /// The subcommand is not one fugu knows.
    #[error("unknown command: {name}")]
    UnknownCommand {
        /// The rejected command name.
        name: String,
    },

    /// A flag is required by another flag that was supplied.
    #[error("missing flag: --{flag}")]
    MissingFlag {
        /// The missing flag.
        flag: String,
    },

    /// Two flags that cannot be combined were both supplied.
    #[error("flags --{first} and --{second} cannot be combined")]
    ConflictingFlags {
        /// The first flag.
        first: String,
        /// The second flag.
        second: String,
    },

    /// No registry credentials were found.
    #[error("no credentials found")]
    NoCredentials,

    /// The current git branch could not be determined.
    #[error("cannot tag image with git branch: {reason}")]
    TagGitBranch {
        /// Why the branch lookup failed.
        reason: String,
    },

    /// Resolved data could not be rendered for display.
    #[error("failed to render data: {message}")]
    RenderFailed {
        /// A description of the failure.
        message: String,
    },
}

/// Errors raised while talking to an image registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The HTTP request failed or returned an error status.
    #[error("registry request to '{url}' failed: {message}")]
    RequestFailed {
        /// The requested URL.
        url: String,
        /// A description of the failure.
        message: String,
    },

    /// The credential file could not be read or parsed.
    #[error("failed to read credentials from '{path}': {message}")]
    CredentialsUnreadable {
        /// The credential file path.
        path: Utf8PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// The async runtime for registry requests could not be started.
    #[error("failed to start the registry client runtime: {message}")]
    RuntimeUnavailable {
        /// A description of the failure.
        message: String,
    },

    /// A password could not be read from standard input.
    #[error("failed to read password: {message}")]
    PasswordPrompt {
        /// A description of the failure.
        message: String,
    },
}

/// Errors raised while running an external process.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The process could not be started.
    #[error("failed to run '{command}': {message}")]
    SpawnFailed {
        /// The command line that was attempted.
        command: String,
        /// A description of the failure.
        message: String,
    },

    /// The process was terminated without an exit code.
    #[error("'{command}' was terminated by a signal")]
    Terminated {
        /// The command line that was running.
        command: String,
    },

    /// A helper process whose output fugu needs exited unsuccessfully.
    #[error("'{command}' exited with status {code}")]
    Unsuccessful {
        /// The command line that was run.
        command: String,
        /// The exit status.
        code: i32,
    },
}

/// Errors that can occur while loading fugu's own settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// A configuration file could not be read or parsed.
    #[error("failed to parse configuration: {message}")]
    ParseError {
        /// A description of the parse failure.
        message: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Top-level error type for the fugu application.
///
/// At the application boundary (main.rs) these errors are converted to
/// `eyre::Report` for display, after [`FuguError::exit_code`] has picked the
/// process exit status.
#[derive(Debug, Error)]
pub enum FuguError {
    /// A value could not be coerced into its cell.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// A configuration document was malformed.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Command-line flags could not be parsed.
    #[error(transparent)]
    Flag(#[from] FlagError),

    /// A configuration source could not be loaded.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Subcommand validation failed.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The registry could not be queried.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// An external process failed.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// fugu's own settings could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl FuguError {
    /// Process exit code for this error.
    ///
    /// Subprocess failures map to `2`; every user, validation, and
    /// configuration error maps to `1`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Exec(_) => 2,
            _ => 1,
        }
    }
}

/// A specialised `Result` type for fugu operations.
pub type Result<T> = std::result::Result<T, FuguError>;
