//! Value objects used inside resource specs.
//!
//! Each multi-valued spec attribute is a value object with exactly one
//! canonical CLI rendering, exposed through [`CliValue`]. The command
//! builder renders repeatable options as one `--name=<cli_option>` token
//! per element, so the rendering here is the single source of truth for
//! how an element appears on the podman command line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Canonical CLI fragment for a value object.
///
/// Any value used in a repeatable option must implement this; the command
/// builder never probes attributes dynamically.
pub trait CliValue {
    /// Returns the canonical option value for this element.
    fn cli_option(&self) -> String;
}

/// Desired lifecycle state for a container or pod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DesiredState {
    /// The entity exists and is running.
    Running,
    /// The entity exists but is stopped.
    Stopped,
    /// The entity does not exist.
    Absent,
}

impl Default for DesiredState {
    fn default() -> Self {
        Self::Running
    }
}

/// Desired presence for resources without a run state (networks, images).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Presence {
    /// The resource exists on the host.
    Present,
    /// The resource has been removed from the host.
    Absent,
}

impl Default for Presence {
    fn default() -> Self {
        Self::Present
    }
}

/// Attachment of a container or pod to a named network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAttachment {
    /// Name of the network to attach to.
    pub name: String,

    /// Static address inside the network, if any.
    pub ip: Option<IpAddr>,
}

impl NetworkAttachment {
    /// Creates an attachment to a named network.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ip: None,
        }
    }

    /// Sets a static address inside the network.
    pub fn with_ip(mut self, ip: IpAddr) -> Self {
        self.ip = Some(ip);
        self
    }
}

impl CliValue for NetworkAttachment {
    fn cli_option(&self) -> String {
        match self.ip {
            Some(ip) => format!("{}:ip={}", self.name, ip),
            None => self.name.clone(),
        }
    }
}

/// Port protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Protocol {
    /// TCP protocol.
    Tcp,
    /// UDP protocol.
    Udp,
}

impl Default for Protocol {
    fn default() -> Self {
        Self::Tcp
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "tcp"),
            Self::Udp => write!(f, "udp"),
        }
    }
}

/// A published port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishSpec {
    /// Container port.
    pub container_port: u16,

    /// Host port (if None, the engine assigns one).
    pub host_port: Option<u16>,

    /// Host IP to bind to.
    pub host_ip: Option<IpAddr>,

    /// Protocol (tcp/udp).
    pub protocol: Protocol,
}

impl PublishSpec {
    /// Creates a TCP port publication.
    pub fn tcp(container_port: u16) -> Self {
        Self {
            container_port,
            host_port: None,
            host_ip: None,
            protocol: Protocol::Tcp,
        }
    }

    /// Creates a UDP port publication.
    pub fn udp(container_port: u16) -> Self {
        Self {
            container_port,
            host_port: None,
            host_ip: None,
            protocol: Protocol::Udp,
        }
    }

    /// Sets the host port.
    pub fn host_port(mut self, port: u16) -> Self {
        self.host_port = Some(port);
        self
    }

    /// Sets the host IP to bind to.
    pub fn host_ip(mut self, ip: IpAddr) -> Self {
        self.host_ip = Some(ip);
        self
    }
}

impl CliValue for PublishSpec {
    fn cli_option(&self) -> String {
        match (self.host_ip, self.host_port) {
            (Some(ip), Some(hp)) => {
                format!("{}:{}:{}/{}", ip, hp, self.container_port, self.protocol)
            }
            (None, Some(hp)) => format!("{}:{}/{}", hp, self.container_port, self.protocol),
            (Some(ip), None) => format!("{}::{}/{}", ip, self.container_port, self.protocol),
            (None, None) => format!("{}/{}", self.container_port, self.protocol),
        }
    }
}

/// A single uid or gid mapping between the container and the host.
///
/// The host side may carry podman's `@` prefix to reference an
/// intermediate mapping of the invoking user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdMap {
    /// Id inside the container.
    pub container_id: String,

    /// Id on the host.
    pub host_id: String,
}

impl IdMap {
    /// Creates a new id mapping.
    pub fn new(container_id: impl Into<String>, host_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            host_id: host_id.into(),
        }
    }
}

impl CliValue for IdMap {
    fn cli_option(&self) -> String {
        format!("{}:{}", self.container_id, self.host_id)
    }
}

/// A volume mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeMount {
    /// Source path or volume name on the host.
    pub source: String,

    /// Mount point inside the container.
    pub container_dir: String,

    /// Mount options (e.g. `z`, `ro`).
    pub options: Vec<String>,
}

impl VolumeMount {
    /// Creates a mount with no options.
    pub fn new(source: impl Into<String>, container_dir: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            container_dir: container_dir.into(),
            options: Vec::new(),
        }
    }

    /// Adds a mount option.
    pub fn option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }
}

impl CliValue for VolumeMount {
    fn cli_option(&self) -> String {
        if self.options.is_empty() {
            format!("{}:{}", self.source, self.container_dir)
        } else {
            format!(
                "{}:{}:{}",
                self.source,
                self.container_dir,
                self.options.join(",")
            )
        }
    }
}
