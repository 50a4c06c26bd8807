//! Configuration loading with layered precedence.
//!
//! The precedence order (lowest to highest) is: application defaults,
//! configuration file, environment variables, global command-line options.
//!
//! Layers are composed by hand with `MergeComposer` rather than through the
//! derived `OrthoConfig::load`, because the `Cli` owns subcommand parsing and
//! because environment values are validated fail-fast here.
//!
//! # Environment Variable Handling
//!
//! Variables are read through [`mockable::Env`] so tests can supply them
//! without touching the process environment. A typed variable with an
//! unparseable value (e.g. `FUGU_DRY_RUN=maybe`) is an error rather than a
//! silent fallback to the default. String variables are always accepted.

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};
use tracing::debug;

use crate::config::{AppConfig, Cli};
use crate::error::{ConfigError, Result};
use crate::source::read_to_string;

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// String value (always accepted).
    String,
    /// Boolean value (`true`/`false`). Invalid values return an error.
    Bool,
}

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    /// The environment variable name (e.g., `FUGU_PROGRAM`).
    env_var: &'static str,
    /// The field of [`AppConfig`] it sets.
    field: &'static str,
    /// The expected value type.
    var_type: EnvVarType,
}

/// Table of all environment variables and the fields they set.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "FUGU_PROGRAM",
        field: "program",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "FUGU_SHELL",
        field: "shell",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "FUGU_FILE",
        field: "file",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "FUGU_DRY_RUN",
        field: "dry_run",
        var_type: EnvVarType::Bool,
    },
];

/// Returns the list of environment variable names recognised by the config loader.
///
/// Tests use this to clear every `FUGU_*` variable without keeping a
/// hand-written list in sync with the loader.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Read a TOML configuration file and push it to the composer.
fn load_config_file(path: &Utf8Path, composer: &mut MergeComposer) -> Result<()> {
    let content = read_to_string(path).map_err(|e| ConfigError::ParseError {
        message: format!("failed to read {path}: {e}"),
    })?;
    let value = toml::from_str::<Value>(&content).map_err(|e| ConfigError::ParseError {
        message: format!("failed to parse {path}: {e}"),
    })?;
    debug!(%path, "loaded configuration file");
    composer.push_file(value, Some(path.to_owned()));
    Ok(())
}

/// The configuration file to load, if any.
///
/// An explicit `--config` path wins when it exists; otherwise the usual
/// discovery locations are searched.
fn config_path(cli: &Cli) -> Option<Utf8PathBuf> {
    cli.config.clone().filter(|p| p.exists()).or_else(|| {
        ConfigDiscovery::builder("fugu")
            .env_var("FUGU_CONFIG_PATH")
            .config_file_name("config.toml")
            .dotfile_name(".fugu.toml")
            .build()
            .candidates()
            .into_iter()
            .filter(|p| p.exists())
            .find_map(|p| Utf8PathBuf::try_from(p).ok())
    })
}

/// Load configuration with full layer precedence from the process environment.
///
/// # Errors
///
/// Returns `ConfigError` when a configuration file is malformed or a typed
/// environment variable has an invalid value.
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    load_config_with_env(cli, &mockable::DefaultEnv::new())
}

/// Load configuration with full layer precedence, reading variables from `env`.
///
/// # Errors
///
/// Returns `ConfigError` when a configuration file is malformed, a typed
/// environment variable has an invalid value, or the merged layers do not
/// form a valid [`AppConfig`].
pub fn load_config_with_env<E: mockable::Env>(cli: &Cli, env: &E) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    if let Some(path) = config_path(cli) {
        load_config_file(&path, &mut composer)?;
    }

    let env_values = collect_env_vars(env)?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;
    Ok(config)
}

/// Collect the `FUGU_*` variables named in [`ENV_VAR_SPECS`] into a JSON value.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a boolean variable is neither
/// `true` nor `false`.
fn collect_env_vars<E: mockable::Env>(env: &E) -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Some(raw_value) = env.string(spec.env_var) else {
            continue;
        };
        let json_value = match spec.var_type {
            EnvVarType::String => Value::String(raw_value),
            EnvVarType::Bool => match raw_value.parse::<bool>() {
                Ok(b) => Value::Bool(b),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected bool (true/false), got '{raw_value}'"),
                    }
                    .into());
                }
            },
        };
        root.insert(spec.field.to_owned(), json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

/// Build a JSON value containing CLI overrides.
fn build_cli_overrides(cli: &Cli) -> Value {
    let mut overrides = Map::new();

    if let Some(ref program) = cli.program {
        overrides.insert("program".to_owned(), Value::String(program.clone()));
    }

    if cli.dry_run {
        overrides.insert("dry_run".to_owned(), Value::Bool(true));
    }

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}
