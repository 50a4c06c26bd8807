//! Build docker command lines from labelled YAML configuration.
//!
//! `fugu` reads per-project options from YAML documents grouped under
//! labels, overlays the flags given on the command line, and renders a
//! deterministic command line for the external tool (usually `docker`),
//! which it then runs or, with `--dry-run`, prints.
//!
//! # Pipeline
//!
//! Every invocation follows the same path: the [`flags`] table of the
//! subcommand parses the raw tokens, [`source`] loads the configuration
//! documents, [`document`] resolves labels and inheritance, [`merge`]
//! applies sources and then explicitly supplied flags onto typed
//! [`value`] cells, and [`command`] validates the result and builds the
//! final invocation.
//!
//! # Modules
//!
//! - [`app`]: Dispatch of a parsed command line and usage text
//! - [`command`]: Subcommand business logic and the argument builder
//! - [`config`]: fugu's own settings with layered precedence, and the CLI
//! - [`document`]: Label resolution, inheritance, and `$NAME` substitution
//! - [`error`]: Semantic error types for the application
//! - [`exec`]: Running command lines and reading the git branch
//! - [`flags`]: Per-subcommand flag tables and parsing
//! - [`logging`]: Diagnostic logging to standard error
//! - [`merge`]: Precedence merge of sources and flags
//! - [`registry`]: Remote registry listing and credentials
//! - [`source`]: Source URIs and default-source discovery
//! - [`value`]: Typed cells and inline data bags

pub mod app;
pub mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod exec;
pub mod flags;
pub mod logging;
pub mod merge;
pub mod registry;
pub mod source;
pub mod value;
