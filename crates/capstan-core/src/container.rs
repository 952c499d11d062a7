//! Container specification.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::value::{DesiredState, IdMap, NetworkAttachment, PublishSpec, VolumeMount};

/// Desired state of a single container.
///
/// The name is the stable identity: it targets the container on the podman
/// command line and is the lookup key for idempotent discovery of existing
/// state. All list attributes keep their declared order, which is also the
/// order they are rendered in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
    /// Container name, unique per host.
    pub name: String,

    /// Image reference (registry/repository:tag).
    pub image: String,

    /// Command to run inside the container.
    pub command: Option<String>,

    /// Entrypoint override.
    pub entrypoint: Option<String>,

    /// User to run as inside the container.
    pub user: Option<String>,

    /// Environment entries, insertion-ordered, keys unique.
    pub env: Vec<(String, String)>,

    /// Path to an environment file on the host.
    pub env_file: Option<PathBuf>,

    /// Networks to attach to, in order.
    pub networks: Vec<NetworkAttachment>,

    /// Ports to publish, in order.
    pub publish: Vec<PublishSpec>,

    /// Hostname inside the container.
    pub hostname: Option<String>,

    /// Uid mappings, in order.
    pub uidmap: Vec<IdMap>,

    /// Gid mappings, in order.
    pub gidmap: Vec<IdMap>,

    /// Volume mounts, in order.
    pub volumes: Vec<VolumeMount>,

    /// Host user owning the container (rootless podman).
    pub owner: Option<String>,

    /// Desired lifecycle state.
    pub state: DesiredState,
}

impl ContainerSpec {
    /// Creates a new spec builder for the given name and image.
    pub fn builder(name: impl Into<String>, image: impl Into<String>) -> ContainerSpecBuilder {
        ContainerSpecBuilder {
            spec: ContainerSpec {
                name: name.into(),
                image: image.into(),
                command: None,
                entrypoint: None,
                user: None,
                env: Vec::new(),
                env_file: None,
                networks: Vec::new(),
                publish: Vec::new(),
                hostname: None,
                uidmap: Vec::new(),
                gidmap: Vec::new(),
                volumes: Vec::new(),
                owner: None,
                state: DesiredState::Running,
            },
        }
    }
}

/// Builder for [`ContainerSpec`].
#[derive(Debug)]
pub struct ContainerSpecBuilder {
    spec: ContainerSpec,
}

impl ContainerSpecBuilder {
    /// Sets the command to run.
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.spec.command = Some(command.into());
        self
    }

    /// Sets the entrypoint override.
    pub fn entrypoint(mut self, entrypoint: impl Into<String>) -> Self {
        self.spec.entrypoint = Some(entrypoint.into());
        self
    }

    /// Sets the container user.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.spec.user = Some(user.into());
        self
    }

    /// Adds an environment entry, replacing any previous value for the key.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.spec.env.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.spec.env.push((key, value)),
        }
        self
    }

    /// Sets the environment file path.
    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.spec.env_file = Some(path.into());
        self
    }

    /// Adds a network attachment.
    pub fn network(mut self, network: NetworkAttachment) -> Self {
        self.spec.networks.push(network);
        self
    }

    /// Adds a published port.
    pub fn publish(mut self, publish: PublishSpec) -> Self {
        self.spec.publish.push(publish);
        self
    }

    /// Sets the hostname.
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.spec.hostname = Some(hostname.into());
        self
    }

    /// Adds a uid mapping.
    pub fn uidmap(mut self, map: IdMap) -> Self {
        self.spec.uidmap.push(map);
        self
    }

    /// Adds a gid mapping.
    pub fn gidmap(mut self, map: IdMap) -> Self {
        self.spec.gidmap.push(map);
        self
    }

    /// Adds a volume mount.
    pub fn volume(mut self, volume: VolumeMount) -> Self {
        self.spec.volumes.push(volume);
        self
    }

    /// Sets the owning host user.
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.spec.owner = Some(owner.into());
        self
    }

    /// Sets the desired lifecycle state.
    pub fn state(mut self, state: DesiredState) -> Self {
        self.spec.state = state;
        self
    }

    /// Builds the spec.
    pub fn build(self) -> ContainerSpec {
        self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let spec = ContainerSpec::builder("db", "docker.io/library/postgres:13").build();
        assert_eq!(spec.name, "db");
        assert_eq!(spec.image, "docker.io/library/postgres:13");
        assert_eq!(spec.state, DesiredState::Running);
        assert!(spec.env.is_empty());
    }

    #[test]
    fn test_env_keys_unique() {
        let spec = ContainerSpec::builder("db", "postgres:13")
            .env("POSTGRES_USER", "test")
            .env("POSTGRES_PASSWORD", "test")
            .env("POSTGRES_USER", "admin")
            .build();

        assert_eq!(
            spec.env,
            vec![
                ("POSTGRES_USER".to_string(), "admin".to_string()),
                ("POSTGRES_PASSWORD".to_string(), "test".to_string()),
            ]
        );
    }

    #[test]
    fn test_env_preserves_insertion_order() {
        let spec = ContainerSpec::builder("db", "postgres:13")
            .env("B", "2")
            .env("A", "1")
            .build();

        let keys: Vec<&str> = spec.env.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["B", "A"]);
    }
}
