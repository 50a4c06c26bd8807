//! Configuration data types for fugu.

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// fugu's own settings.
///
/// These control how fugu runs, not what it runs: container options live in
/// the per-project source documents. Settings are resolved with layered
/// precedence: defaults, then a configuration file, then `FUGU_*`
/// environment variables, then global command-line options.
///
/// Configuration files are discovered in this order:
/// 1. Path given with `--config`
/// 2. Path specified via the `FUGU_CONFIG_PATH` environment variable
/// 3. `.fugu.toml` in the current working directory
/// 4. `.fugu.toml` in the home directory
/// 5. `~/.config/fugu/config.toml` (XDG default)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig, SmartDefault)]
#[ortho_config(
    prefix = "FUGU",
    discovery(
        app_name = "fugu",
        env_var = "FUGU_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".fugu.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
#[serde(default)]
pub struct AppConfig {
    /// The external program commands are built for.
    #[default(_code = "String::from(\"docker\")")]
    pub program: String,

    /// The shell that runs built command lines.
    #[default(_code = "String::from(\"sh\")")]
    pub shell: String,

    /// Source document used when neither `--source` nor a discovered
    /// `fugu.yml` applies.
    pub file: Option<Utf8PathBuf>,

    /// Print every docker command instead of running it.
    pub dry_run: bool,
}
