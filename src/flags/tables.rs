//! Flag declarations for every subcommand.

use super::{FlagGroup, FlagSchema, FlagSpec, GroupKind};
use crate::command::{DEFAULT_CREDENTIALS_FILE, DEFAULT_SHELL, Subcommand};

const SOURCE: FlagSpec = FlagSpec::list(
    &["source"],
    "Read options from this source (file://path, a path, or query:key=value&...)",
);
const DRY_RUN: FlagSpec = FlagSpec::bool(&["dry-run"], "Print the command instead of running it");
const IMAGE: FlagSpec = FlagSpec::string(&["image"], "Image to use");
const NAME: FlagSpec = FlagSpec::string(&["name"], "Container name");
const COMMAND: FlagSpec = FlagSpec::string(&["command"], "Command to run in the container");
const ARG: FlagSpec = FlagSpec::list(&["arg"], "Argument for the command, repeatable");
const TAG: FlagSpec = FlagSpec::string(&["tag"], "Image tag");

const BUILD_TOOL: &[FlagSpec] = &[
    SOURCE,
    DRY_RUN,
    IMAGE,
    FlagSpec::string(&["path"], "Build context directory"),
    FlagSpec::string(&["url"], "Build context URL"),
    FlagSpec::bool(&["tag-git-branch"], "Tag the image with the current git branch"),
];

const BUILD_DOCKER: &[FlagSpec] = &[
    FlagSpec::string(&["tag", "t"], "Name and optional tag for the image"),
    FlagSpec::bool(&["quiet", "q"], "Suppress the verbose build output"),
    FlagSpec::bool(&["no-cache"], "Do not use cache when building the image"),
    FlagSpec::bool(&["rm"], "Remove intermediate containers after a successful build")
        .with_default("true"),
    FlagSpec::bool(&["force-rm"], "Always remove intermediate containers"),
    FlagSpec::bool(&["pull"], "Always attempt to pull a newer version of the image"),
    FlagSpec::string(&["file", "f"], "Name of the Dockerfile"),
];

const RUN_TOOL: &[FlagSpec] = &[SOURCE, DRY_RUN, IMAGE, COMMAND, ARG];

const RUN_DOCKER: &[FlagSpec] = &[
    FlagSpec::bool(&["rm"], "Automatically remove the container when it exits"),
    FlagSpec::bool(&["detach", "d"], "Run container in background"),
    FlagSpec::bool(&["sig-proxy"], "Proxy received signals to the process").with_default("true"),
    FlagSpec::string(&["name"], "Assign a name to the container"),
    FlagSpec::list(&["attach", "a"], "Attach to STDIN, STDOUT or STDERR"),
    FlagSpec::list(&["volume", "v"], "Bind mount a volume"),
    FlagSpec::list(&["link"], "Add link to another container"),
    FlagSpec::list(&["device"], "Add a host device to the container"),
    FlagSpec::list(&["env", "e"], "Set environment variables"),
    FlagSpec::list(&["env-file"], "Read in a file of environment variables"),
    FlagSpec::list(&["label", "l"], "Set metadata on the container"),
    FlagSpec::list(&["label-file"], "Read in a line delimited file of labels"),
    FlagSpec::list(&["publish", "p"], "Publish a container's port to the host"),
    FlagSpec::list(&["expose"], "Expose a port or a range of ports"),
    FlagSpec::list(&["dns"], "Set custom DNS servers"),
    FlagSpec::list(&["dns-search"], "Set custom DNS search domains"),
    FlagSpec::list(&["add-host"], "Add a custom host-to-IP mapping (host:ip)"),
    FlagSpec::list(&["volumes-from"], "Mount volumes from the specified container"),
    FlagSpec::list(&["lxc-conf"], "Add custom lxc options"),
    FlagSpec::list(&["cap-add"], "Add Linux capabilities"),
    FlagSpec::list(&["cap-drop"], "Drop Linux capabilities"),
    FlagSpec::list(&["security-opt"], "Security options"),
    FlagSpec::bool(&["privileged"], "Give extended privileges to this container"),
    FlagSpec::bool(&["publish-all", "P"], "Publish all exposed ports to random ports"),
    FlagSpec::bool(&["interactive", "i"], "Keep STDIN open even if not attached"),
    FlagSpec::bool(&["tty", "t"], "Allocate a pseudo-TTY"),
    FlagSpec::bool(&["read-only"], "Mount the container's root filesystem as read only"),
    FlagSpec::string(&["pid"], "PID namespace to use"),
    FlagSpec::string(&["cidfile"], "Write the container ID to the file"),
    FlagSpec::string(&["entrypoint"], "Overwrite the default ENTRYPOINT of the image"),
    FlagSpec::string(&["hostname", "h"], "Container host name"),
    FlagSpec::string(&["memory", "m"], "Memory limit"),
    FlagSpec::string(&["memory-swap"], "Total memory (memory + swap), -1 to disable swap"),
    FlagSpec::string(&["user", "u"], "Username or UID"),
    FlagSpec::string(&["workdir", "w"], "Working directory inside the container"),
    FlagSpec::string(&["cpuset"], "CPUs in which to allow execution"),
    FlagSpec::string(&["net"], "Set the network mode for the container").with_default("bridge"),
    FlagSpec::string(&["mac-address"], "Container MAC address"),
    FlagSpec::string(&["ipc"], "IPC namespace to use"),
    FlagSpec::string(&["restart"], "Restart policy to apply when a container exits"),
    FlagSpec::int(&["cpu-shares", "c"], "CPU shares (relative weight)"),
];

const EXEC_TOOL: &[FlagSpec] = &[SOURCE, DRY_RUN, NAME, COMMAND, ARG];

const EXEC_DOCKER: &[FlagSpec] = &[
    FlagSpec::bool(&["interactive", "i"], "Keep STDIN open even if not attached"),
    FlagSpec::bool(&["tty", "t"], "Allocate a pseudo-TTY"),
    FlagSpec::bool(&["detach", "d"], "Detached mode: run command in the background"),
];

const SHELL_TOOL: &[FlagSpec] = &[
    SOURCE,
    DRY_RUN,
    NAME,
    FlagSpec::string(&["shell"], "Shell to start in the container").with_default(DEFAULT_SHELL),
];

const DESTROY_TOOL: &[FlagSpec] = &[SOURCE, DRY_RUN, NAME];

const REGISTRY_TOOL: &[FlagSpec] = &[SOURCE, DRY_RUN, IMAGE, TAG];

const PULL_DOCKER: &[FlagSpec] = &[FlagSpec::bool(
    &["all-tags", "a"],
    "Download all tagged images in the repository",
)];

const IMAGES_TOOL: &[FlagSpec] = &[
    DRY_RUN,
    FlagSpec::string(&["user"], "Registry user name"),
    FlagSpec::string(&["password"], "Registry password"),
    FlagSpec::bool(&["password-stdin"], "Read the registry password from standard input"),
    FlagSpec::string(&["file"], "Docker credential file").with_default(DEFAULT_CREDENTIALS_FILE),
];

const INFO_TOOL: &[FlagSpec] = &[SOURCE];

/// The flag schema for `command`.
#[must_use]
pub fn schema_for(command: Subcommand) -> FlagSchema {
    let (usage, about, tool, docker): (&str, &str, &[FlagSpec], &[FlagSpec]) = match command {
        Subcommand::Build => (
            "fugu build [LABEL] [OPTIONS] [PATH | URL]",
            "Build an image from a Dockerfile",
            BUILD_TOOL,
            BUILD_DOCKER,
        ),
        Subcommand::Run => (
            "fugu run [LABEL] [OPTIONS] [COMMAND] [ARG...]",
            "Run a command in a new container",
            RUN_TOOL,
            RUN_DOCKER,
        ),
        Subcommand::Exec => (
            "fugu exec [LABEL] [OPTIONS] [COMMAND] [ARG...]",
            "Run a command in a running container",
            EXEC_TOOL,
            EXEC_DOCKER,
        ),
        Subcommand::Shell => (
            "fugu shell [LABEL] [OPTIONS]",
            "Open an interactive shell in a running container",
            SHELL_TOOL,
            EXEC_DOCKER,
        ),
        Subcommand::Destroy => (
            "fugu destroy [LABEL] [OPTIONS]",
            "Kill and remove a container",
            DESTROY_TOOL,
            &[],
        ),
        Subcommand::Push => (
            "fugu push [LABEL] [OPTIONS] [TAG]",
            "Push an image to a registry",
            REGISTRY_TOOL,
            &[],
        ),
        Subcommand::Pull => (
            "fugu pull [LABEL] [OPTIONS] [TAG]",
            "Pull an image from a registry",
            REGISTRY_TOOL,
            PULL_DOCKER,
        ),
        Subcommand::Images => (
            "fugu images [OPTIONS] [REGISTRY]",
            "List images, locally or in a registry",
            IMAGES_TOOL,
            &[],
        ),
        Subcommand::ShowData => (
            "fugu show-data [LABEL] [OPTIONS]",
            "Print the merged data of a label",
            INFO_TOOL,
            &[],
        ),
        Subcommand::ShowLabels => (
            "fugu show-labels [OPTIONS]",
            "List the labels of the configuration",
            INFO_TOOL,
            &[],
        ),
    };
    FlagSchema::new(
        command.as_str(),
        usage,
        about,
        vec![
            FlagGroup::new(GroupKind::Tool, tool.to_vec()),
            FlagGroup::new(GroupKind::Passthrough, docker.to_vec()),
        ],
    )
}
