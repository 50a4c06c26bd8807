//! Configuration system for fugu.
//!
//! This module provides fugu's own settings and the CLI definition. Settings
//! are merged with `ortho_config`: global CLI options override environment
//! variables, which override configuration files, which override defaults.
//!
//! The configuration file is expected at `~/.config/fugu/config.toml` by
//! default.
//!
//! # Example Configuration
//!
//! ```toml
//! program = "podman"
//! shell = "bash"
//! file = "/srv/app/fugu.yml"
//! dry_run = false
//! ```

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{Cli, Commands, HelpArgs, PassthroughArgs};
pub use loader::{env_var_names, load_config, load_config_with_env};
pub use types::AppConfig;
