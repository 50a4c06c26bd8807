//! Unit tests for fugu configuration.
//!
//! This module contains tests organised into:
//! - [`helpers`] - Shared fixtures and helper functions
//! - [`layer_precedence_tests`] - `MergeComposer` layer precedence tests
//! - [`loader_tests`] - Environment and file loading through `load_config_with_env`
//! - [`cli_tests`] - Command-line parsing

mod cli_tests;
mod helpers;
mod loader_tests;
