//! Remote host description.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Identifies the host a resource is converged on and how to reach it.
///
/// Owned by the calling engine and passed by reference into the handlers;
/// immutable for the duration of a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostDescriptor {
    /// Host address (name or IP).
    pub address: String,

    /// Remote user to authenticate as.
    pub user: Option<String>,

    /// SSH port, when not the default.
    pub port: Option<u16>,

    /// Identity file for key-based authentication.
    pub identity_file: Option<PathBuf>,

    /// Timeout for establishing the connection.
    pub connect_timeout: Duration,

    /// Additional `-o` style SSH options.
    pub ssh_options: Vec<String>,
}

impl HostDescriptor {
    /// Creates a descriptor for the given address with default settings.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            user: None,
            port: None,
            identity_file: None,
            connect_timeout: Duration::from_secs(10),
            ssh_options: Vec::new(),
        }
    }

    /// Creates a new descriptor builder.
    pub fn builder(address: impl Into<String>) -> HostDescriptorBuilder {
        HostDescriptorBuilder {
            descriptor: Self::new(address),
        }
    }

    /// Returns the `user@host` destination string.
    pub fn destination(&self) -> String {
        match &self.user {
            Some(user) => format!("{}@{}", user, self.address),
            None => self.address.clone(),
        }
    }
}

/// Builder for [`HostDescriptor`].
#[derive(Debug)]
pub struct HostDescriptorBuilder {
    descriptor: HostDescriptor,
}

impl HostDescriptorBuilder {
    /// Sets the remote user.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.descriptor.user = Some(user.into());
        self
    }

    /// Sets the SSH port.
    pub fn port(mut self, port: u16) -> Self {
        self.descriptor.port = Some(port);
        self
    }

    /// Sets the identity file.
    pub fn identity_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.descriptor.identity_file = Some(path.into());
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.descriptor.connect_timeout = timeout;
        self
    }

    /// Adds an `-o` style SSH option.
    pub fn ssh_option(mut self, option: impl Into<String>) -> Self {
        self.descriptor.ssh_options.push(option.into());
        self
    }

    /// Builds the descriptor.
    pub fn build(self) -> HostDescriptor {
        self.descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination() {
        let host = HostDescriptor::new("db.example.com");
        assert_eq!(host.destination(), "db.example.com");

        let host = HostDescriptor::builder("db.example.com").user("admin").build();
        assert_eq!(host.destination(), "admin@db.example.com");
    }

    #[test]
    fn test_builder() {
        let host = HostDescriptor::builder("10.0.0.5")
            .user("deploy")
            .port(2222)
            .connect_timeout(Duration::from_secs(3))
            .ssh_option("StrictHostKeyChecking=no")
            .build();

        assert_eq!(host.port, Some(2222));
        assert_eq!(host.connect_timeout, Duration::from_secs(3));
        assert_eq!(host.ssh_options, vec!["StrictHostKeyChecking=no"]);
    }
}
