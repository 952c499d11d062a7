//! Command construction for networks.

use capstan_core::NetworkSpec;

use crate::line::CommandLine;
use crate::option::{flag, option};

/// Options for `network rm`.
#[derive(Debug, Clone, Default)]
pub struct RmOptions {
    /// Remove the network even if containers are attached.
    pub force: bool,
}

/// Builds the `create` command. The network name is the final token.
///
/// Each subnet renders as its own `--subnet` token, immediately followed
/// by a `--gateway` token when the subnet pins one; podman pairs the
/// repeated options positionally.
pub fn create(network: &NetworkSpec) -> CommandLine {
    let mut cmd = CommandLine::new("network", "create");
    cmd.push_opt(option("driver", network.driver.as_deref()));
    cmd.push_opt(flag("internal", network.internal));
    for subnet in &network.subnets {
        cmd.push(format!("--subnet={}", subnet.subnet));
        cmd.push_opt(option("gateway", subnet.gateway.as_deref()));
    }
    cmd.push(&network.name);
    cmd
}

/// Builds the `rm` command.
pub fn rm(network: &NetworkSpec, opts: &RmOptions) -> CommandLine {
    let mut cmd = CommandLine::new("network", "rm");
    cmd.push_opt(flag("force", opts.force));
    cmd.push(&network.name);
    cmd
}

/// Builds the `inspect` command used to read live state for a name.
pub fn inspect(name: &str) -> CommandLine {
    let mut cmd = CommandLine::new("network", "inspect");
    cmd.push(name);
    cmd
}

/// Builds the listing command used for discovery.
pub fn ls() -> CommandLine {
    let mut cmd = CommandLine::new("network", "ls");
    cmd.push("--format=json");
    cmd
}
