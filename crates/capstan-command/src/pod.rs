//! Command construction for pods.
//!
//! Operations: `create`, `start`, `stop`, `rm`. A pod-id-file, when
//! supplied, substitutes for the pod name as the target selector.

use std::path::PathBuf;

use capstan_core::PodSpec;

use crate::line::CommandLine;
use crate::option::{flag, option, repeated};

/// Options for `pod create`.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Path to the file that receives the PID of conmon.
    pub infra_conmon_pidfile: Option<PathBuf>,

    /// Write the pod ID to this file.
    pub pod_id_file: Option<PathBuf>,

    /// Behaviour when the last container exits (`continue`|`stop`).
    pub exit_policy: Option<String>,

    /// Replace an existing pod with the same name.
    pub replace: bool,
}

/// Options for `pod start`.
#[derive(Debug, Clone, Default)]
pub struct StartOptions {
    /// Read the pod ID from this file.
    pub pod_id_file: Option<PathBuf>,
}

/// Options for `pod stop`.
#[derive(Debug, Clone, Default)]
pub struct StopOptions {
    /// Ignore errors when the pod is missing.
    pub ignore: bool,

    /// Read the pod ID from this file.
    pub pod_id_file: Option<PathBuf>,

    /// Seconds to wait before killing the pod.
    pub time: Option<u32>,
}

/// Options for `pod rm`.
#[derive(Debug, Clone, Default)]
pub struct RmOptions {
    /// Force removal by first stopping all containers in the pod.
    pub force: bool,

    /// Ignore errors when the pod is missing.
    pub ignore: bool,

    /// Read the pod ID from this file.
    pub pod_id_file: Option<PathBuf>,

    /// Seconds to wait for stop before killing the pod.
    pub time: Option<u32>,
}

/// Builds the `create` command. The pod name is always the final token.
pub fn create(pod: &PodSpec, opts: &CreateOptions) -> CommandLine {
    let mut cmd = CommandLine::new("pod", "create");
    cmd.push_opt(option(
        "infra-conmon-pidfile",
        opts.infra_conmon_pidfile.as_ref().map(|p| p.display()),
    ));
    cmd.push_opt(option(
        "pod-id-file",
        opts.pod_id_file.as_ref().map(|p| p.display()),
    ));
    cmd.push_opt(option("exit-policy", opts.exit_policy.as_deref()));
    cmd.push_opt(flag("replace", opts.replace));
    cmd.extend(repeated("network", &pod.networks));
    cmd.extend(repeated("publish", &pod.publish));
    cmd.push_opt(option("hostname", pod.hostname.as_deref()));
    cmd.extend(repeated("uidmap", &pod.uidmap));
    cmd.extend(repeated("gidmap", &pod.gidmap));
    cmd.push(format!("--name={}", pod.name));
    cmd
}

/// Builds the `start` command.
pub fn start(pod: &PodSpec, opts: &StartOptions) -> CommandLine {
    let mut cmd = CommandLine::new("pod", "start");
    cmd.push_opt(option(
        "pod-id-file",
        opts.pod_id_file.as_ref().map(|p| p.display()),
    ));
    if opts.pod_id_file.is_none() {
        cmd.push(&pod.name);
    }
    cmd
}

/// Builds the `stop` command.
pub fn stop(pod: &PodSpec, opts: &StopOptions) -> CommandLine {
    let mut cmd = CommandLine::new("pod", "stop");
    cmd.push_opt(option(
        "pod-id-file",
        opts.pod_id_file.as_ref().map(|p| p.display()),
    ));
    cmd.push_opt(flag("ignore", opts.ignore));
    cmd.push_opt(option("time", opts.time));
    if opts.pod_id_file.is_none() {
        cmd.push(&pod.name);
    }
    cmd
}

/// Builds the `rm` command.
pub fn rm(pod: &PodSpec, opts: &RmOptions) -> CommandLine {
    let mut cmd = CommandLine::new("pod", "rm");
    cmd.push_opt(option(
        "pod-id-file",
        opts.pod_id_file.as_ref().map(|p| p.display()),
    ));
    cmd.push_opt(flag("force", opts.force));
    cmd.push_opt(flag("ignore", opts.ignore));
    cmd.push_opt(option("time", opts.time));
    if opts.pod_id_file.is_none() {
        cmd.push(&pod.name);
    }
    cmd
}

/// Builds the `inspect` command used to read live state for a name.
pub fn inspect(name: &str) -> CommandLine {
    let mut cmd = CommandLine::new("pod", "inspect");
    cmd.push(name);
    cmd
}

/// Builds the listing command used for discovery.
pub fn ps() -> CommandLine {
    let mut cmd = CommandLine::new("pod", "ps");
    cmd.push("--format=json");
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use capstan_core::{NetworkAttachment, PublishSpec};

    fn spec() -> PodSpec {
        PodSpec::builder("web").build()
    }

    #[test]
    fn test_create_ordering() {
        let pod = PodSpec::builder("web")
            .network(NetworkAttachment::new("front"))
            .publish(PublishSpec::tcp(80).host_port(8080))
            .hostname("web.internal")
            .build();

        let cmd = create(
            &pod,
            &CreateOptions {
                exit_policy: Some("stop".to_string()),
                replace: true,
                ..Default::default()
            },
        );
        assert_eq!(
            cmd.to_string(),
            "/usr/bin/podman pod create --exit-policy=stop --replace --network=front \
             --publish=8080:80/tcp --hostname=web.internal --name=web"
        );
    }

    #[test]
    fn test_name_is_final_token_of_create() {
        let cmd = create(&spec(), &CreateOptions::default());
        assert_eq!(cmd.tokens().last().map(String::as_str), Some("--name=web"));
    }

    #[test]
    fn test_start_stop_rm_target_selection() {
        assert_eq!(
            start(&spec(), &StartOptions::default()).to_string(),
            "/usr/bin/podman pod start web"
        );

        let id_file = StartOptions {
            pod_id_file: Some(PathBuf::from("/run/web.pod")),
        };
        assert_eq!(
            start(&spec(), &id_file).to_string(),
            "/usr/bin/podman pod start --pod-id-file=/run/web.pod"
        );

        let cmd = stop(
            &spec(),
            &StopOptions {
                ignore: true,
                time: Some(5),
                ..Default::default()
            },
        );
        assert_eq!(
            cmd.to_string(),
            "/usr/bin/podman pod stop --ignore --time=5 web"
        );

        let cmd = rm(
            &spec(),
            &RmOptions {
                force: true,
                pod_id_file: Some(PathBuf::from("/run/web.pod")),
                ..Default::default()
            },
        );
        assert_eq!(
            cmd.to_string(),
            "/usr/bin/podman pod rm --pod-id-file=/run/web.pod --force"
        );
        assert!(!cmd.tokens().contains(&"web".to_string()));
    }
}
