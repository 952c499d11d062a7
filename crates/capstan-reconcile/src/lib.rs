//! Reconciliation of capstan resources against live podman state.
//!
//! This crate drives the convergence loop: read live state over an
//! execution channel, plan the gap with a pure function, apply the
//! planned steps strictly in order, and stop at the first failure.
//! Every pass is idempotent; re-running a pass after a partial failure
//! continues from whatever state the host is actually in.
//!
//! # Architecture
//!
//! - [`channel`] is the only layer that performs I/O. [`SshChannel`]
//!   multiplexes a pass over one SSH master connection;
//!   [`LocalChannel`] runs against a local podman;
//!   [`ScriptedChannel`] replays canned conversations in tests.
//! - [`plan`] holds the pure planners and per-kind step alphabets.
//! - [`handler`] ties spec, live state, and plan together per resource
//!   kind, and [`converge`] owns the channel lifecycle around a pass.
//! - [`discovery`] lists unmanaged resources by name pattern.
//!
//! # Example
//!
//! ```ignore
//! use capstan_core::{ContainerSpec, HostDescriptor};
//! use capstan_reconcile::{converge, ChannelConfig, ContainerHandler};
//!
//! async fn deploy() -> capstan_core::Result<()> {
//!     let host = HostDescriptor::builder("db.example.com").user("deploy").build();
//!     let spec = ContainerSpec::builder("db", "docker.io/library/postgres:13").build();
//!
//!     let report = converge(&ContainerHandler::new(), &host, ChannelConfig::default(), &spec).await?;
//!     if report.changed() {
//!         println!("applied: {:?}", report.steps);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod channel;
pub mod discovery;
pub mod handler;
pub mod live;
pub mod plan;
pub mod report;

pub use channel::{Channel, ChannelConfig, ExecOutput, LocalChannel, ScriptedChannel, SshChannel};
pub use handler::{
    converge, converge_over, ContainerHandler, ImageHandler, NetworkHandler, PodHandler,
    ResourceHandler,
};
pub use live::{LiveContainer, LiveImage, LiveNetwork, LivePod};
pub use plan::{
    plan_container, plan_image, plan_network, plan_pod, ContainerStep, ImageStep, NetworkStep,
    Plan, PlanStep, PodStep,
};
pub use report::ConvergeReport;
