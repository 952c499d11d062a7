//! Command construction for containers.
//!
//! Operations: `run` (create + start), `start`, `stop`, `rm`, plus the
//! inspection commands the reconciliation layer reads live state with.
//! For `start`, `stop` and `rm` the container name is the final positional
//! token unless a cidfile selects the target, in which case the name is
//! omitted entirely.

use std::path::PathBuf;

use capstan_core::ContainerSpec;

use crate::line::CommandLine;
use crate::option::{flag, option, repeated};

/// Options for `container run`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Write the container ID to this file.
    pub cidfile: Option<PathBuf>,

    /// Cgroup configuration (`enabled`|`disabled`|`no-conmon`|`split`).
    pub cgroups: Option<String>,

    /// Read the pod ID from this file and run inside that pod.
    pub pod_id_file: Option<PathBuf>,

    /// sd-notify behaviour (`container`|`conmon`|`ignore`).
    pub sdnotify: Option<String>,

    /// Run in the background and print the container ID.
    pub detach: bool,

    /// Replace an existing container with the same name.
    pub replace: bool,
}

/// Options for `container start`.
#[derive(Debug, Clone, Default)]
pub struct StartOptions {
    /// Read the container ID from this file.
    pub cidfile: Option<PathBuf>,
}

/// Options for `container stop`.
#[derive(Debug, Clone, Default)]
pub struct StopOptions {
    /// Ignore errors when the container is missing.
    pub ignore: bool,

    /// Read the container ID from this file.
    pub cidfile: Option<PathBuf>,

    /// Seconds to wait before killing the container.
    pub time: Option<u32>,
}

/// Options for `container rm`.
#[derive(Debug, Clone, Default)]
pub struct RmOptions {
    /// Force removal of a running or unusable container.
    pub force: bool,

    /// Ignore errors when the container is missing.
    pub ignore: bool,

    /// Read the container ID from this file.
    pub cidfile: Option<PathBuf>,

    /// Seconds to wait for stop before killing the container.
    pub time: Option<u32>,
}

/// Builds the `run` command that creates and starts the container.
///
/// The image and command are always the final tokens; podman treats them
/// as positional.
pub fn run(container: &ContainerSpec, opts: &RunOptions) -> CommandLine {
    let mut cmd = CommandLine::new("container", "run");
    cmd.push_opt(option("cidfile", opts.cidfile.as_ref().map(|p| p.display())));
    cmd.push_opt(option("cgroups", opts.cgroups.as_deref()));
    cmd.push_opt(option(
        "pod-id-file",
        opts.pod_id_file.as_ref().map(|p| p.display()),
    ));
    cmd.push_opt(option("sdnotify", opts.sdnotify.as_deref()));
    cmd.push_opt(flag("detach", opts.detach));
    cmd.push_opt(flag("replace", opts.replace));
    cmd.extend(repeated("network", &container.networks));
    cmd.extend(repeated("publish", &container.publish));
    cmd.push_opt(option("hostname", container.hostname.as_deref()));
    cmd.extend(repeated("uidmap", &container.uidmap));
    cmd.extend(repeated("gidmap", &container.gidmap));
    cmd.push(format!("--name={}", container.name));
    cmd.extend(repeated("volume", &container.volumes));
    for (key, value) in &container.env {
        cmd.push(format!("--env={}={}", key, value));
    }
    cmd.push_opt(option(
        "env-file",
        container.env_file.as_ref().map(|p| p.display()),
    ));
    cmd.push_opt(option("entrypoint", container.entrypoint.as_deref()));
    cmd.push_opt(option("user", container.user.as_deref()));
    cmd.push(&container.image);
    if let Some(command) = &container.command {
        cmd.push(command);
    }
    cmd
}

/// Builds the `start` command for a stopped container.
pub fn start(container: &ContainerSpec, opts: &StartOptions) -> CommandLine {
    let mut cmd = CommandLine::new("container", "start");
    cmd.push_opt(option("cidfile", opts.cidfile.as_ref().map(|p| p.display())));
    if opts.cidfile.is_none() {
        cmd.push(&container.name);
    }
    cmd
}

/// Builds the `stop` command.
pub fn stop(container: &ContainerSpec, opts: &StopOptions) -> CommandLine {
    let mut cmd = CommandLine::new("container", "stop");
    cmd.push_opt(option("cidfile", opts.cidfile.as_ref().map(|p| p.display())));
    cmd.push_opt(flag("ignore", opts.ignore));
    cmd.push_opt(option("time", opts.time));
    if opts.cidfile.is_none() {
        cmd.push(&container.name);
    }
    cmd
}

/// Builds the `rm` command.
pub fn rm(container: &ContainerSpec, opts: &RmOptions) -> CommandLine {
    let mut cmd = CommandLine::new("container", "rm");
    cmd.push_opt(option("cidfile", opts.cidfile.as_ref().map(|p| p.display())));
    cmd.push_opt(flag("force", opts.force));
    cmd.push_opt(flag("ignore", opts.ignore));
    cmd.push_opt(option("time", opts.time));
    if opts.cidfile.is_none() {
        cmd.push(&container.name);
    }
    cmd
}

/// Builds the `inspect` command used to read live state for a name.
pub fn inspect(name: &str) -> CommandLine {
    let mut cmd = CommandLine::new("container", "inspect");
    cmd.push(name);
    cmd
}

/// Builds the listing command used for discovery.
pub fn ps() -> CommandLine {
    let mut cmd = CommandLine::new("container", "ps");
    cmd.push("--all");
    cmd.push("--format=json");
    cmd
}
