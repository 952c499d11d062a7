//! Resource handlers and the converge driver.
//!
//! A handler ties one resource kind together: it reads live state over
//! a channel, plans the gap with a pure function, and applies the
//! planned steps in order. The driver owns the channel lifecycle so a
//! handler can never leak a connection, and it stops at the first
//! failed step; the next pass re-reads live state and picks up from
//! wherever the host actually is.

use async_trait::async_trait;
use capstan_command::CommandLine;
use capstan_core::{Error, HostDescriptor, Result};
use tracing::{debug, info, warn};

use crate::channel::{Channel, ChannelConfig, ExecOutput, SshChannel};
use crate::plan::{Plan, PlanStep};
use crate::report::ConvergeReport;

mod container;
mod image;
mod network;
mod pod;

pub use container::ContainerHandler;
pub use image::ImageHandler;
pub use network::NetworkHandler;
pub use pod::PodHandler;

/// Core trait for per-kind reconciliation handlers.
///
/// `read` and `apply` do I/O over the channel; `plan` is pure. The
/// split keeps every state transition unit-testable without a host.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// The desired-state spec this handler converges.
    type Spec: Send + Sync;

    /// The live summary read back from the host.
    type Live: Send + Sync;

    /// The step alphabet of this resource kind.
    type Step: PlanStep;

    /// Resource kind label, used in reports and logs.
    fn kind(&self) -> &'static str;

    /// The identity of a spec on its host.
    fn name<'a>(&self, spec: &'a Self::Spec) -> &'a str;

    /// Reads the live state for a spec, `None` when the resource does
    /// not exist on the host.
    async fn read(
        &self,
        channel: &mut dyn Channel,
        spec: &Self::Spec,
    ) -> Result<Option<Self::Live>>;

    /// Plans the steps that converge live state onto the spec.
    fn plan(&self, spec: &Self::Spec, live: Option<&Self::Live>) -> Plan<Self::Step>;

    /// Applies one step, returning the rendered command that ran.
    async fn apply(
        &self,
        channel: &mut dyn Channel,
        spec: &Self::Spec,
        step: Self::Step,
    ) -> Result<String>;
}

/// Converges one resource on a remote host.
///
/// Opens an SSH channel, runs the pass, and releases the channel
/// whether the pass succeeded or not.
///
/// # Errors
///
/// Propagates the first error of the pass. A failed `close` is logged
/// but never masks the pass result.
pub async fn converge<H: ResourceHandler>(
    handler: &H,
    host: &HostDescriptor,
    config: ChannelConfig,
    spec: &H::Spec,
) -> Result<ConvergeReport> {
    let mut channel = SshChannel::connect(host, config).await?;
    let result = converge_over(handler, &mut channel, spec).await;
    if let Err(err) = channel.close().await {
        warn!(host = %channel.host(), error = %err, "Failed to release channel");
    }
    result
}

/// Converges one resource over an already-open channel.
///
/// The caller keeps ownership of the channel; batch engines reuse one
/// channel for every resource of a host.
pub async fn converge_over<H: ResourceHandler>(
    handler: &H,
    channel: &mut dyn Channel,
    spec: &H::Spec,
) -> Result<ConvergeReport> {
    let resource = format!("{}/{}", handler.kind(), handler.name(spec));

    let live = handler.read(channel, spec).await?;
    let plan = handler.plan(spec, live.as_ref());
    if plan.is_noop() {
        debug!(resource = %resource, "Resource already converged");
        return Ok(ConvergeReport::unchanged(resource));
    }

    info!(
        resource = %resource,
        host = %channel.host(),
        steps = ?plan.described(),
        "Converging resource"
    );
    let mut commands = Vec::with_capacity(plan.steps().len());
    for step in plan.steps() {
        commands.push(handler.apply(channel, spec, *step).await?);
    }

    Ok(ConvergeReport {
        resource,
        steps: plan.described().iter().map(|s| s.to_string()).collect(),
        commands,
    })
}

/// Runs a command and turns a non-zero exit into an error.
pub(crate) async fn run_checked(
    channel: &mut dyn Channel,
    command: &CommandLine,
) -> Result<ExecOutput> {
    debug!(command = %command, "Running command");
    let output = channel.run(command).await?;
    if !output.success() {
        return Err(Error::command_failed(
            command.to_string(),
            output.exit_code,
            output.stderr.trim(),
        ));
    }
    Ok(output)
}

/// Runs an inspect command, mapping "no such X" failures to `None`.
pub(crate) async fn run_inspect(
    channel: &mut dyn Channel,
    command: &CommandLine,
) -> Result<Option<ExecOutput>> {
    debug!(command = %command, "Reading live state");
    let output = channel.run(command).await?;
    if crate::live::is_missing(&output) {
        return Ok(None);
    }
    if !output.success() {
        return Err(Error::command_failed(
            command.to_string(),
            output.exit_code,
            output.stderr.trim(),
        ));
    }
    Ok(Some(output))
}
