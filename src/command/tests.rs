//! Unit tests for subcommand business logic.

use rstest::{fixture, rstest};

use super::{Action, Context, CredentialSource, Invocation, RegistryQuery, Subcommand, plan};
use crate::document::Document;
use crate::error::{CommandError, ExecError, FuguError};
use crate::exec::MockBranchProvider;
use crate::flags::{FlagResolver, schema_for};
use crate::merge::{Collected, merge};

/// Fixture providing a branch provider that must not be consulted.
#[fixture]
fn no_branch() -> MockBranchProvider {
    let mut branch = MockBranchProvider::new();
    branch.expect_current_branch().never();
    branch
}

/// Resolve `args` for `command` over an optional document.
fn collect(command: Subcommand, document: Option<&str>, args: &[&str]) -> Collected {
    let schema = schema_for(command);
    let flags = FlagResolver::new(&schema)
        .parse(args)
        .expect("flags should parse");
    let (labels, config) = match document {
        Some(text) => {
            let parsed = Document::from_text(text).expect("document should parse");
            (parsed.label_names(), parsed.resolve(None).config)
        }
        None => (Vec::new(), Default::default()),
    };
    let mut cells = schema.cells();
    merge(&mut cells, &config, &flags).expect("merge should succeed");
    Collected {
        cells,
        labels,
        label: None,
        remaining: flags.remaining,
        help: flags.help,
        data: config,
    }
}

fn plan_with(
    command: Subcommand,
    document: Option<&str>,
    args: &[&str],
    branch: &MockBranchProvider,
) -> crate::error::Result<Action> {
    let context = Context {
        program: "docker",
        home: Some("/home/me"),
        branch,
    };
    plan(
        command,
        &schema_for(command),
        collect(command, document, args),
        &context,
    )
}

fn invocation(action: Action) -> Invocation {
    match action {
        Action::Invoke { invocation, .. } => invocation,
        other => panic!("expected an invocation, got {other:?}"),
    }
}

fn line(command: Subcommand, document: Option<&str>, args: &[&str]) -> String {
    let branch = no_branch();
    let action = plan_with(command, document, args, &branch).expect("plan should succeed");
    invocation(action).command_line()
}

fn command_error(result: crate::error::Result<Action>) -> CommandError {
    match result {
        Err(FuguError::Command(error)) => error,
        other => panic!("expected a command error, got {other:?}"),
    }
}

#[rstest]
fn run_renders_flags_over_file_values() {
    assert_eq!(
        line(
            Subcommand::Run,
            Some("image: mattes/foobar\nname: test\n"),
            &["--name", "foobar", "--rm"],
        ),
        "docker run --name=\"foobar\" --rm mattes/foobar"
    );
}

#[rstest]
#[case(Subcommand::Build)]
#[case(Subcommand::Run)]
#[case(Subcommand::Push)]
#[case(Subcommand::Pull)]
fn image_commands_require_an_image(no_branch: MockBranchProvider, #[case] command: Subcommand) {
    let error = command_error(plan_with(command, None, &[], &no_branch));
    assert_eq!(error, CommandError::MissingImage);
}

#[rstest]
#[case(Subcommand::Exec)]
#[case(Subcommand::Shell)]
#[case(Subcommand::Destroy)]
fn container_commands_require_a_name(no_branch: MockBranchProvider, #[case] command: Subcommand) {
    let error = command_error(plan_with(command, None, &[], &no_branch));
    assert_eq!(error, CommandError::MissingName);
}

#[rstest]
#[case(&["echo", "hello", "world"], "docker run alpine echo hello world")]
#[case(&["ls"], "docker run alpine ls -c x")]
#[case(&[], "docker run alpine sh -c x")]
fn run_positionals_override_command_and_args(#[case] args: &[&str], #[case] expected: &str) {
    assert_eq!(
        line(
            Subcommand::Run,
            Some("image: alpine\ncommand: sh\narg: [\"-c\", x]\n"),
            args,
        ),
        expected
    );
}

#[rstest]
fn run_reports_dry_run(no_branch: MockBranchProvider) {
    let action = plan_with(
        Subcommand::Run,
        Some("image: alpine\n"),
        &["--dry-run"],
        &no_branch,
    )
    .expect("plan should succeed");
    assert!(matches!(action, Action::Invoke { dry_run: true, .. }));
}

#[rstest]
fn run_expands_home_in_volumes() {
    let rendered = line(
        Subcommand::Run,
        Some("image: alpine\nvolume: [\"~/src:/src\"]\n"),
        &[],
    );
    assert_eq!(rendered, "docker run --volume=\"/home/me/src:/src\" alpine");
}

#[rstest]
#[case(&[], "docker build --tag=\"app:v1\" https://example.com/app.git")]
#[case(&["./other"], "docker build --tag=\"app:v1\" ./other")]
fn build_context_precedence(#[case] args: &[&str], #[case] expected: &str) {
    let document = "image: app\ntag: v1\npath: ./ctx\nurl: https://example.com/app.git\n";
    assert_eq!(line(Subcommand::Build, Some(document), args), expected);
}

#[rstest]
fn build_defaults_to_current_directory_and_bare_image() {
    assert_eq!(
        line(Subcommand::Build, Some("image: app\n"), &["--no-cache"]),
        "docker build --no-cache --tag=\"app\" ."
    );
}

#[rstest]
fn build_rejects_two_positionals(no_branch: MockBranchProvider) {
    let error = command_error(plan_with(
        Subcommand::Build,
        Some("image: app\n"),
        &["a", "b"],
        &no_branch,
    ));
    assert_eq!(error, CommandError::TooManyArgs);
}

#[rstest]
fn build_tags_with_git_branch() {
    let mut branch = MockBranchProvider::new();
    branch
        .expect_current_branch()
        .times(1)
        .returning(|| Ok(String::from("feature-x")));
    let action = plan_with(
        Subcommand::Build,
        Some("image: app\ntag: ignored\n"),
        &["--tag-git-branch"],
        &branch,
    )
    .expect("plan should succeed");
    assert_eq!(
        invocation(action).command_line(),
        "docker build --tag=\"app:feature-x\" ."
    );
}

#[rstest]
fn build_reports_git_branch_failure() {
    let mut branch = MockBranchProvider::new();
    branch.expect_current_branch().returning(|| {
        Err(ExecError::Unsuccessful {
            command: String::from("git rev-parse --abbrev-ref HEAD"),
            code: 128,
        })
    });
    let error = command_error(plan_with(
        Subcommand::Build,
        Some("image: app\n"),
        &["--tag-git-branch"],
        &branch,
    ));
    assert!(matches!(error, CommandError::TagGitBranch { .. }));
}

#[rstest]
#[case(&[], "docker exec --interactive web bash")]
#[case(&["ls", "/tmp"], "docker exec --interactive web ls /tmp")]
fn exec_targets_the_container(#[case] args: &[&str], #[case] expected: &str) {
    assert_eq!(
        line(
            Subcommand::Exec,
            Some("image: app\nname: web\ninteractive: true\ncommand: bash\n"),
            args,
        ),
        expected
    );
}

#[rstest]
#[case(&[], "docker exec --detach=false --interactive --tty web /bin/bash")]
#[case(&["--shell=/bin/sh"], "docker exec --detach=false --interactive --tty web /bin/sh")]
fn shell_forces_an_interactive_terminal(#[case] args: &[&str], #[case] expected: &str) {
    assert_eq!(
        line(Subcommand::Shell, Some("image: app\nname: web\ndetach: true\n"), args),
        expected
    );
}

#[rstest]
#[case(Subcommand::Shell)]
#[case(Subcommand::Destroy)]
fn positionals_are_rejected(no_branch: MockBranchProvider, #[case] command: Subcommand) {
    let error = command_error(plan_with(
        command,
        Some("image: app\nname: web\n"),
        &["extra"],
        &no_branch,
    ));
    assert_eq!(error, CommandError::TooManyArgs);
}

#[rstest]
fn destroy_force_removes() {
    assert_eq!(
        line(Subcommand::Destroy, Some("image: app\nname: web\n"), &[]),
        "docker rm -f web"
    );
}

#[rstest]
#[case(Subcommand::Push, &[], "docker push registry.local/app:v1")]
#[case(Subcommand::Push, &["v2"], "docker push registry.local/app:v2")]
#[case(Subcommand::Pull, &["--all-tags"], "docker pull --all-tags registry.local/app:v1")]
fn transfer_uses_tag_from_flag_or_positional(
    #[case] command: Subcommand,
    #[case] args: &[&str],
    #[case] expected: &str,
) {
    assert_eq!(
        line(command, Some("image: registry.local/app\ntag: v1\n"), args),
        expected
    );
}

#[rstest]
fn show_data_dumps_label_data(no_branch: MockBranchProvider) {
    let action = plan_with(
        Subcommand::ShowData,
        Some("image: redis\nname: cache\n"),
        &[],
        &no_branch,
    )
    .expect("plan should succeed");
    assert_eq!(action, Action::Print(String::from("image: redis\nname: cache\n")));
}

#[rstest]
fn show_data_prints_nothing_without_data(no_branch: MockBranchProvider) {
    let action =
        plan_with(Subcommand::ShowData, None, &[], &no_branch).expect("plan should succeed");
    assert_eq!(action, Action::Print(String::new()));
}

#[rstest]
fn show_labels_sorts_names(no_branch: MockBranchProvider) {
    let action = plan_with(
        Subcommand::ShowLabels,
        Some("web:\n  image: nginx\napi:\n  image: app\n"),
        &[],
        &no_branch,
    )
    .expect("plan should succeed");
    assert_eq!(action, Action::Print(String::from("api\nweb\n")));
}

#[rstest]
fn show_labels_rejects_a_selected_label(no_branch: MockBranchProvider) {
    let schema = schema_for(Subcommand::ShowLabels);
    let mut collected = collect(Subcommand::ShowLabels, None, &[]);
    collected.label = Some(String::from("web"));
    let context = Context {
        program: "docker",
        home: None,
        branch: &no_branch,
    };
    let error = command_error(plan(Subcommand::ShowLabels, &schema, collected, &context));
    assert_eq!(error, CommandError::TooManyArgs);
}

#[rstest]
fn images_without_registry_lists_locally() {
    assert_eq!(line(Subcommand::Images, None, &[]), "docker images");
}

#[rstest]
#[case(
    &["--user=me", "--password=secret", "reg.example.com"],
    CredentialSource::Explicit { user: String::from("me"), password: String::from("secret") }
)]
#[case(
    &["--user=me", "--password-stdin", "reg.example.com"],
    CredentialSource::Stdin { user: String::from("me") }
)]
#[case(
    &["--user=me", "reg.example.com"],
    CredentialSource::Explicit { user: String::from("me"), password: String::new() }
)]
#[case(
    &["reg.example.com"],
    CredentialSource::File(String::from("/home/me/.dockercfg"))
)]
#[case(
    &["--file=/etc/dockercfg", "reg.example.com"],
    CredentialSource::File(String::from("/etc/dockercfg"))
)]
fn images_with_registry_picks_credentials(
    no_branch: MockBranchProvider,
    #[case] args: &[&str],
    #[case] expected: CredentialSource,
) {
    let action = plan_with(Subcommand::Images, None, args, &no_branch).expect("plan should succeed");
    assert_eq!(
        action,
        Action::ListRegistry(RegistryQuery {
            registry: String::from("reg.example.com"),
            credentials: expected,
        })
    );
}

#[rstest]
#[case(
    &["--file=x", "--user=me", "reg"],
    CommandError::ConflictingFlags { first: String::from("file"), second: String::from("user") }
)]
#[case(
    &["--file=x", "--password-stdin", "reg"],
    CommandError::ConflictingFlags {
        first: String::from("file"),
        second: String::from("password-stdin"),
    }
)]
#[case(
    &["--password=secret", "reg"],
    CommandError::MissingFlag { flag: String::from("user") }
)]
#[case(&["--user=", "--password=", "reg"], CommandError::NoCredentials)]
#[case(&["--user=", "reg"], CommandError::NoCredentials)]
#[case(&["reg", "extra"], CommandError::TooManyArgs)]
fn images_validates_credential_flags(
    no_branch: MockBranchProvider,
    #[case] args: &[&str],
    #[case] expected: CommandError,
) {
    let error = command_error(plan_with(Subcommand::Images, None, args, &no_branch));
    assert_eq!(error, expected);
}

#[rstest]
fn help_short_circuits_validation(no_branch: MockBranchProvider) {
    let action = plan_with(Subcommand::Run, None, &["--help"], &no_branch).expect("help succeeds");
    assert_eq!(action, Action::Help(Subcommand::Run));
}

#[rstest]
fn subcommand_names_round_trip() {
    for command in Subcommand::ALL {
        assert_eq!(command.as_str().parse::<Subcommand>(), Ok(command));
    }
    assert_eq!(
        "bogus".parse::<Subcommand>(),
        Err(CommandError::UnknownCommand {
            name: String::from("bogus")
        })
    );
}
