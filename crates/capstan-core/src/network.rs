//! Network specification.

use serde::{Deserialize, Serialize};

use crate::value::{CliValue, Presence};

/// A subnet carved out of a podman network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    /// Subnet in CIDR notation.
    pub subnet: String,

    /// Gateway address inside the subnet, if pinned.
    pub gateway: Option<String>,
}

impl Subnet {
    /// Creates a subnet from CIDR notation.
    pub fn new(subnet: impl Into<String>) -> Self {
        Self {
            subnet: subnet.into(),
            gateway: None,
        }
    }

    /// Pins the gateway address.
    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = Some(gateway.into());
        self
    }
}

impl CliValue for Subnet {
    fn cli_option(&self) -> String {
        self.subnet.clone()
    }
}

/// Desired state of a podman network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Network name, unique per host.
    pub name: String,

    /// Network driver (`bridge` when unset).
    pub driver: Option<String>,

    /// Whether the network is isolated from external routing.
    pub internal: bool,

    /// Subnets assigned to the network, in order.
    pub subnets: Vec<Subnet>,

    /// Host user owning the network (rootless podman).
    pub owner: Option<String>,

    /// Desired presence.
    pub presence: Presence,
}

impl NetworkSpec {
    /// Creates a new spec builder for the given network name.
    pub fn builder(name: impl Into<String>) -> NetworkSpecBuilder {
        NetworkSpecBuilder {
            spec: NetworkSpec {
                name: name.into(),
                driver: None,
                internal: false,
                subnets: Vec::new(),
                owner: None,
                presence: Presence::Present,
            },
        }
    }
}

/// Builder for [`NetworkSpec`].
#[derive(Debug)]
pub struct NetworkSpecBuilder {
    spec: NetworkSpec,
}

impl NetworkSpecBuilder {
    /// Sets the network driver.
    pub fn driver(mut self, driver: impl Into<String>) -> Self {
        self.spec.driver = Some(driver.into());
        self
    }

    /// Marks the network as internal.
    pub fn internal(mut self, internal: bool) -> Self {
        self.spec.internal = internal;
        self
    }

    /// Adds a subnet.
    pub fn subnet(mut self, subnet: Subnet) -> Self {
        self.spec.subnets.push(subnet);
        self
    }

    /// Sets the owning host user.
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.spec.owner = Some(owner.into());
        self
    }

    /// Sets the desired presence.
    pub fn presence(mut self, presence: Presence) -> Self {
        self.spec.presence = presence;
        self
    }

    /// Builds the spec.
    pub fn build(self) -> NetworkSpec {
        self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let net = NetworkSpec::builder("test-net")
            .subnet(Subnet::new("172.42.0.0/24").with_gateway("172.42.0.1"))
            .build();

        assert_eq!(net.name, "test-net");
        assert_eq!(net.presence, Presence::Present);
        assert_eq!(net.subnets[0].cli_option(), "172.42.0.0/24");
    }
}
