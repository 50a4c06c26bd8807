//! Command-line parsing tests.

use clap::Parser;
use rstest::rstest;

use crate::command::Subcommand;
use crate::config::tests::helpers::parse_cli;
use crate::config::{Cli, Commands};

#[rstest]
fn subcommand_tokens_pass_through_untouched() {
    let cli = parse_cli(&["fugu", "run", "web", "--name", "foo", "-d", "ls"]);
    let (command, tokens) = cli.command.subcommand().expect("run is a fugu subcommand");
    assert_eq!(command, Subcommand::Run);
    assert_eq!(tokens, ["web", "--name", "foo", "-d", "ls"]);
}

#[rstest]
fn help_flag_after_subcommand_is_a_token() {
    let cli = parse_cli(&["fugu", "build", "--help"]);
    let (command, tokens) = cli.command.subcommand().expect("build is a fugu subcommand");
    assert_eq!(command, Subcommand::Build);
    assert_eq!(tokens, ["--help"]);
}

#[rstest]
#[case(&["fugu", "show-data"], Subcommand::ShowData)]
#[case(&["fugu", "show-labels"], Subcommand::ShowLabels)]
#[case(&["fugu", "destroy"], Subcommand::Destroy)]
fn hyphenated_subcommands_parse(#[case] args: &[&str], #[case] expected: Subcommand) {
    let cli = parse_cli(args);
    let (command, tokens) = cli.command.subcommand().expect("fugu subcommand");
    assert_eq!(command, expected);
    assert!(tokens.is_empty());
}

#[rstest]
fn help_subcommand_takes_an_optional_command() {
    let cli = parse_cli(&["fugu", "help", "run"]);
    assert!(cli.command.subcommand().is_none());
    let Commands::Help(args) = cli.command else {
        panic!("expected the help subcommand");
    };
    assert_eq!(args.command.as_deref(), Some("run"));
}

#[rstest]
fn global_options_precede_the_subcommand() {
    let cli = parse_cli(&["fugu", "--program", "podman", "--dry-run", "images"]);
    assert_eq!(cli.program.as_deref(), Some("podman"));
    assert!(cli.dry_run);
}

#[rstest]
fn missing_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["fugu"]).is_err());
}
