//! Shared resource model for capstan.
//!
//! This crate provides the vocabulary shared by the command builder and the
//! reconciliation handlers: host descriptors, desired-state resource specs
//! (containers, pods, networks, images), the value objects those specs are
//! composed of, and the error taxonomy.
//!
//! Specs are plain attribute sets constructed once per reconciliation pass
//! by the calling engine. They are read-only inputs everywhere else: the
//! command builder renders them into CLI invocations, the handlers compare
//! them against live state. Every multi-valued attribute (network
//! attachments, published ports, id mappings, volume mounts) is a value
//! object with a single canonical CLI rendering, exposed through the
//! [`CliValue`] trait.

#![warn(missing_docs)]

pub mod container;
pub mod error;
pub mod host;
pub mod image;
pub mod network;
pub mod pod;
pub mod value;

pub use container::{ContainerSpec, ContainerSpecBuilder};
pub use error::{Error, Result};
pub use host::{HostDescriptor, HostDescriptorBuilder};
pub use image::ImageSpec;
pub use network::{NetworkSpec, NetworkSpecBuilder, Subnet};
pub use pod::{PodSpec, PodSpecBuilder};
pub use value::{
    CliValue, DesiredState, IdMap, NetworkAttachment, Presence, Protocol, PublishSpec, VolumeMount,
};
