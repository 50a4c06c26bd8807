//! Tests for `load_config_with_env`.

use std::fs;

use camino::Utf8PathBuf;
use mockable::MockEnv;
use rstest::rstest;
use tempfile::TempDir;

use crate::config::tests::helpers::{empty_env, env_with, parse_cli};
use crate::config::{env_var_names, load_config_with_env};
use crate::error::{ConfigError, FuguError};

/// Write `content` to a `config.toml` inside a fresh temporary directory.
fn config_file(content: &str) -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().expect("temporary directory should be created");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("config.toml")).expect("UTF-8 path");
    fs::write(&path, content).expect("config file should be written");
    (dir, path)
}

#[rstest]
fn env_var_names_cover_every_setting() {
    assert_eq!(
        env_var_names(),
        vec!["FUGU_PROGRAM", "FUGU_SHELL", "FUGU_FILE", "FUGU_DRY_RUN"]
    );
}

#[rstest]
fn environment_sets_fields() {
    let env = env_with(&[
        ("FUGU_SHELL", "bash"),
        ("FUGU_FILE", "/srv/fugu.yml"),
        ("FUGU_DRY_RUN", "true"),
    ]);
    let (_dir, path) = config_file("");
    let cli = parse_cli(&["fugu", "--config", path.as_str(), "show-labels"]);

    let config = load_config_with_env(&cli, &env).expect("config should load");

    assert_eq!(config.program, "docker");
    assert_eq!(config.shell, "bash");
    assert_eq!(config.file, Some(Utf8PathBuf::from("/srv/fugu.yml")));
    assert!(config.dry_run);
}

#[rstest]
fn invalid_boolean_fails_fast() {
    let env = env_with(&[("FUGU_DRY_RUN", "maybe")]);
    let (_dir, path) = config_file("");
    let cli = parse_cli(&["fugu", "--config", path.as_str(), "show-labels"]);

    let result = load_config_with_env(&cli, &env);

    assert!(matches!(
        result,
        Err(FuguError::Config(ConfigError::InvalidValue { ref field, .. })) if field == "FUGU_DRY_RUN"
    ));
}

#[rstest]
fn explicit_file_is_loaded_and_cli_wins(empty_env: MockEnv) {
    let (_dir, path) = config_file("program = \"podman\"\nshell = \"bash\"\n");
    let cli = parse_cli(&[
        "fugu",
        "--config",
        path.as_str(),
        "--program",
        "nerdctl",
        "run",
    ]);

    let config = load_config_with_env(&cli, &empty_env).expect("config should load");

    assert_eq!(config.program, "nerdctl");
    assert_eq!(config.shell, "bash");
}

#[rstest]
fn environment_overrides_file_on_disk() {
    let env = env_with(&[("FUGU_PROGRAM", "podman")]);
    let (_dir, path) = config_file("program = \"nerdctl\"\n");
    let cli = parse_cli(&["fugu", "--config", path.as_str(), "run"]);

    let config = load_config_with_env(&cli, &env).expect("config should load");

    assert_eq!(config.program, "podman");
}

#[rstest]
fn malformed_file_is_a_parse_error(empty_env: MockEnv) {
    let (_dir, path) = config_file("program = [");
    let cli = parse_cli(&["fugu", "--config", path.as_str(), "run"]);

    let result = load_config_with_env(&cli, &empty_env);

    assert!(matches!(
        result,
        Err(FuguError::Config(ConfigError::ParseError { .. }))
    ));
}
