//! Live state read back from podman.
//!
//! Inspect and listing commands emit JSON; the types here model the
//! fields the planners compare against the specs and nothing more.
//! Podman prints inspect results as a one-element array for a single
//! name, so parsing peels that layer off.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

use capstan_core::{Error, Result};

use crate::channel::ExecOutput;

/// Returns true when a failed inspect means the resource does not
/// exist, as opposed to podman itself failing.
pub fn is_missing(output: &ExecOutput) -> bool {
    if output.success() {
        return false;
    }
    let stderr = output.stderr.to_lowercase();
    stderr.contains("no such") || stderr.contains("not found")
}

/// Parses an inspect payload for a single resource.
///
/// # Errors
///
/// Returns [`Error::Discovery`] when the payload holds zero or more
/// than one entry, and [`Error::Parse`] when it is not valid JSON for
/// the expected shape.
pub fn parse_inspect<T: DeserializeOwned>(stdout: &str, kind: &str, name: &str) -> Result<T> {
    // Older podman releases print a bare object for `pod inspect`.
    match serde_json::from_str::<Vec<T>>(stdout) {
        Ok(mut entries) => match entries.len() {
            1 => Ok(entries.remove(0)),
            0 => Err(Error::discovery(format!(
                "inspect of {kind} {name} returned no entries"
            ))),
            n => Err(Error::discovery(format!(
                "inspect of {kind} {name} returned {n} entries"
            ))),
        },
        Err(_) => serde_json::from_str::<T>(stdout).map_err(Error::from),
    }
}

/// Parses a `--format=json` listing payload.
pub fn parse_listing<T: DeserializeOwned>(stdout: &str) -> Result<Vec<T>> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(stdout).map_err(Error::from)
}

/// Raw `container inspect` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerInspect {
    /// Container id.
    #[serde(rename = "Id")]
    pub id: String,

    /// Container name.
    #[serde(rename = "Name")]
    pub name: String,

    /// Image reference the container was created from.
    #[serde(rename = "ImageName", default)]
    pub image_name: String,

    /// Runtime state.
    #[serde(rename = "State", default)]
    pub state: ContainerState,

    /// Creation-time configuration.
    #[serde(rename = "Config", default)]
    pub config: ContainerConfig,

    /// Network attachments.
    #[serde(rename = "NetworkSettings", default)]
    pub network_settings: NetworkSettings,

    /// Mounted volumes and binds.
    #[serde(rename = "Mounts", default)]
    pub mounts: Vec<Mount>,
}

/// The `State` block of a container inspect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerState {
    /// Status string ("running", "exited", "created", ...).
    #[serde(rename = "Status", default)]
    pub status: String,

    /// Whether the container is currently running.
    #[serde(rename = "Running", default)]
    pub running: bool,
}

/// The `Config` block of a container inspect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerConfig {
    /// Environment as `KEY=value` strings.
    #[serde(rename = "Env", default)]
    pub env: Vec<String>,

    /// User the container runs as.
    #[serde(rename = "User", default)]
    pub user: String,
}

/// The `NetworkSettings` block of a container inspect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkSettings {
    /// Attached networks keyed by name.
    #[serde(rename = "Networks", default)]
    pub networks: BTreeMap<String, serde_json::Value>,
}

/// One entry of the `Mounts` array.
#[derive(Debug, Clone, Deserialize)]
pub struct Mount {
    /// Mount type ("bind" or "volume").
    #[serde(rename = "Type", default)]
    pub mount_type: String,

    /// Host path or volume name.
    #[serde(rename = "Source", default)]
    pub source: String,

    /// Path inside the container.
    #[serde(rename = "Destination", default)]
    pub destination: String,
}

/// Comparable summary of a live container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveContainer {
    /// Container id.
    pub id: String,

    /// Container name.
    pub name: String,

    /// Whether it is running right now.
    pub running: bool,

    /// Image reference it was created from.
    pub image: String,

    /// Names of attached networks, sorted.
    pub networks: Vec<String>,

    /// Mounts as `source:destination` pairs, sorted.
    pub mounts: Vec<String>,

    /// Environment as `KEY=value` strings.
    pub env: Vec<String>,
}

impl From<ContainerInspect> for LiveContainer {
    fn from(inspect: ContainerInspect) -> Self {
        let mut networks: Vec<String> = inspect.network_settings.networks.into_keys().collect();
        networks.sort();
        let mut mounts: Vec<String> = inspect
            .mounts
            .iter()
            .map(|m| format!("{}:{}", m.source, m.destination))
            .collect();
        mounts.sort();
        Self {
            id: inspect.id,
            // Docker-compatible payloads prefix names with a slash.
            name: inspect.name.trim_start_matches('/').to_string(),
            running: inspect.state.running,
            image: inspect.image_name,
            networks,
            mounts,
            env: inspect.config.env,
        }
    }
}

/// Raw `pod inspect` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PodInspect {
    /// Pod id.
    #[serde(rename = "Id")]
    pub id: String,

    /// Pod name.
    #[serde(rename = "Name")]
    pub name: String,

    /// Aggregate state ("Created", "Running", "Exited", "Degraded").
    #[serde(rename = "State", default)]
    pub state: String,

    /// Infra container configuration.
    #[serde(rename = "InfraConfig", default)]
    pub infra_config: Option<InfraConfig>,
}

/// The `InfraConfig` block of a pod inspect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InfraConfig {
    /// Networks the infra container joins.
    #[serde(rename = "Networks", default)]
    pub networks: Vec<String>,
}

/// Comparable summary of a live pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivePod {
    /// Pod id.
    pub id: String,

    /// Pod name.
    pub name: String,

    /// Whether the pod counts as running.
    pub running: bool,

    /// Names of attached networks, sorted.
    pub networks: Vec<String>,
}

impl From<PodInspect> for LivePod {
    fn from(inspect: PodInspect) -> Self {
        let mut networks = inspect
            .infra_config
            .map(|infra| infra.networks)
            .unwrap_or_default();
        networks.sort();
        Self {
            id: inspect.id,
            name: inspect.name,
            // A degraded pod still has containers up; treat it as
            // running so convergence restarts rather than recreates.
            running: matches!(inspect.state.as_str(), "Running" | "Degraded"),
            networks,
        }
    }
}

/// Raw `network inspect` payload. Podman 4+ emits lowercase keys here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LiveNetwork {
    /// Network name.
    pub name: String,

    /// Driver in use.
    #[serde(default)]
    pub driver: String,

    /// Configured subnets.
    #[serde(default)]
    pub subnets: Vec<LiveSubnet>,

    /// Whether the network is isolated from outside traffic.
    #[serde(default)]
    pub internal: bool,
}

/// One subnet of a live network.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LiveSubnet {
    /// CIDR range.
    pub subnet: String,

    /// Gateway address, if pinned.
    #[serde(default)]
    pub gateway: Option<String>,
}

/// Raw `image inspect` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LiveImage {
    /// Image id.
    #[serde(rename = "Id")]
    pub id: String,

    /// Tags pointing at this image.
    #[serde(rename = "RepoTags", default)]
    pub repo_tags: Vec<String>,
}

/// One entry of `container ps --all --format=json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerListEntry {
    /// Container id.
    #[serde(rename = "Id")]
    pub id: String,

    /// Names of the container (podman reports a list).
    #[serde(rename = "Names", default)]
    pub names: Vec<String>,

    /// State string ("running", "exited", ...).
    #[serde(rename = "State", default)]
    pub state: String,
}

/// One entry of `pod ps --format=json`.
#[derive(Debug, Clone, Deserialize)]
pub struct PodListEntry {
    /// Pod id.
    #[serde(rename = "Id")]
    pub id: String,

    /// Pod name.
    #[serde(rename = "Name")]
    pub name: String,

    /// Status string ("Running", "Exited", ...).
    #[serde(rename = "Status", default)]
    pub status: String,
}

/// One entry of `network ls --format=json`.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkListEntry {
    /// Network name.
    pub name: String,

    /// Driver in use.
    #[serde(default)]
    pub driver: String,
}

/// One entry of `image ls --format=json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageListEntry {
    /// Image id.
    #[serde(rename = "Id")]
    pub id: String,

    /// Tags pointing at this image; empty for dangling images.
    #[serde(rename = "Names", default)]
    pub names: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER_JSON: &str = r#"[{
        "Id": "0f5a3b",
        "Name": "db",
        "ImageName": "docker.io/library/postgres:13",
        "State": {"Status": "running", "Running": true},
        "Config": {"Env": ["PATH=/usr/bin", "PGDATA=/data"], "User": ""},
        "NetworkSettings": {"Networks": {"backend": {}, "frontend": {}}},
        "Mounts": [
            {"Type": "bind", "Source": "/srv/pg", "Destination": "/data"}
        ]
    }]"#;

    #[test]
    fn test_container_summary() {
        let inspect: ContainerInspect = parse_inspect(CONTAINER_JSON, "container", "db").unwrap();
        let live = LiveContainer::from(inspect);
        assert_eq!(live.name, "db");
        assert!(live.running);
        assert_eq!(live.networks, vec!["backend", "frontend"]);
        assert_eq!(live.mounts, vec!["/srv/pg:/data"]);
    }

    #[test]
    fn test_inspect_rejects_multiple_entries() {
        let json = r#"[{"Id": "a", "Name": "x"}, {"Id": "b", "Name": "y"}]"#;
        let err = parse_inspect::<ContainerInspect>(json, "container", "x").unwrap_err();
        assert!(err.to_string().contains("2 entries"));
    }

    #[test]
    fn test_pod_inspect_accepts_bare_object() {
        let json = r#"{"Id": "9a", "Name": "web", "State": "Degraded",
                       "InfraConfig": {"Networks": ["frontend"]}}"#;
        let live = LivePod::from(parse_inspect::<PodInspect>(json, "pod", "web").unwrap());
        assert!(live.running);
        assert_eq!(live.networks, vec!["frontend"]);
    }

    #[test]
    fn test_network_inspect_lowercase_keys() {
        let json = r#"[{"name": "backend", "driver": "bridge", "internal": true,
                        "subnets": [{"subnet": "172.42.0.0/24", "gateway": "172.42.0.1"}]}]"#;
        let live: LiveNetwork = parse_inspect(json, "network", "backend").unwrap();
        assert!(live.internal);
        assert_eq!(live.subnets[0].gateway.as_deref(), Some("172.42.0.1"));
    }

    #[test]
    fn test_is_missing() {
        let output = ExecOutput::new("", "Error: no such container db", 125);
        assert!(is_missing(&output));

        let output = ExecOutput::new("", "Error: network backend: network not found", 125);
        assert!(is_missing(&output));

        let output = ExecOutput::new("", "cannot connect to podman socket", 125);
        assert!(!is_missing(&output));

        assert!(!is_missing(&ExecOutput::ok("[]")));
    }

    #[test]
    fn test_empty_listing() {
        let entries: Vec<ImageListEntry> = parse_listing("").unwrap();
        assert!(entries.is_empty());
    }
}
