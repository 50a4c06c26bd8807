//! Shared fixtures and helper functions for config tests.

use std::sync::Arc;

use clap::Parser;
use mockable::MockEnv;
use ortho_config::MergeComposer;
use rstest::fixture;

use crate::config::{AppConfig, Cli};

/// Fixture providing an `AppConfig` parsed from a full TOML example.
#[fixture]
pub fn app_config_from_full_toml() -> AppConfig {
    let toml = r#"
        program = "podman"
        shell = "bash"
        file = "/srv/app/fugu.yml"
        dry_run = true
    "#;

    ortho_config::toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Fixture providing an environment with no variables set.
#[fixture]
pub fn empty_env() -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string().returning(|_| None);
    env
}

/// Creates a `MockEnv` answering from `vars`.
pub fn env_with(vars: &'static [(&'static str, &'static str)]) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string().returning(move |key| {
        vars.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| String::from(*value))
    });
    env
}

/// Parse a command line, panicking on failure.
pub fn parse_cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("command line should parse")
}

/// Helper: Creates a `MergeComposer` with defaults layer already pushed.
pub fn create_composer_with_defaults() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = MergeComposer::new();
    let defaults = ortho_config::serde_json::to_value(AppConfig::default())?;
    composer.push_defaults(defaults);
    Ok(composer)
}

/// Helper: Merges layers from a composer into `AppConfig`.
pub fn merge_config(composer: MergeComposer) -> Result<AppConfig, Arc<ortho_config::OrthoError>> {
    AppConfig::merge_from_layers(composer.layers())
}

/// Helper: Asserts that a config has all default values.
pub fn assert_config_has_defaults(config: &AppConfig) {
    assert_eq!(config.program, "docker", "program should be docker");
    assert_eq!(config.shell, "sh", "shell should be sh");
    assert!(config.file.is_none(), "file should be None");
    assert!(!config.dry_run, "dry_run should be false");
}
