//! Pod specification.

use serde::{Deserialize, Serialize};

use crate::value::{DesiredState, IdMap, NetworkAttachment, PublishSpec};

/// Desired state of a pod.
///
/// Same identity invariant as [`crate::ContainerSpec`]: the name targets
/// the pod on the command line and keys discovery of existing state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodSpec {
    /// Pod name, unique per host.
    pub name: String,

    /// Networks to attach to, in order.
    pub networks: Vec<NetworkAttachment>,

    /// Ports to publish, in order.
    pub publish: Vec<PublishSpec>,

    /// Hostname inside the pod.
    pub hostname: Option<String>,

    /// Uid mappings, in order.
    pub uidmap: Vec<IdMap>,

    /// Gid mappings, in order.
    pub gidmap: Vec<IdMap>,

    /// Host user owning the pod (rootless podman).
    pub owner: Option<String>,

    /// Desired lifecycle state.
    pub state: DesiredState,
}

impl PodSpec {
    /// Creates a new spec builder for the given pod name.
    pub fn builder(name: impl Into<String>) -> PodSpecBuilder {
        PodSpecBuilder {
            spec: PodSpec {
                name: name.into(),
                networks: Vec::new(),
                publish: Vec::new(),
                hostname: None,
                uidmap: Vec::new(),
                gidmap: Vec::new(),
                owner: None,
                state: DesiredState::Running,
            },
        }
    }
}

/// Builder for [`PodSpec`].
#[derive(Debug)]
pub struct PodSpecBuilder {
    spec: PodSpec,
}

impl PodSpecBuilder {
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
    pub fn build(self) -> PodSpec {
        self.spec
    }
}
