//! Container reconciliation handler.

use async_trait::async_trait;
use capstan_command::container;
use capstan_core::{ContainerSpec, Result};

use super::{run_checked, run_inspect, ResourceHandler};
use crate::channel::Channel;
use crate::live::{self, ContainerInspect, LiveContainer};
use crate::plan::{plan_container, ContainerStep, Plan};

/// Converges containers onto their specs.
#[derive(Debug, Clone)]
pub struct ContainerHandler {
    stop_timeout: Option<u32>,
}

impl ContainerHandler {
    /// Creates a handler with podman's default stop timeout.
    pub fn new() -> Self {
        Self { stop_timeout: None }
    }

    /// Sets how long `stop` waits before killing, in seconds.
    pub fn stop_timeout(mut self, seconds: u32) -> Self {
        self.stop_timeout = Some(seconds);
        self
    }
}

impl Default for ContainerHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceHandler for ContainerHandler {
    type Spec = ContainerSpec;
    type Live = LiveContainer;
    type Step = ContainerStep;

    fn kind(&self) -> &'static str {
        "container"
    }

    fn name<'a>(&self, spec: &'a ContainerSpec) -> &'a str {
        &spec.name
    }

    async fn read(
        &self,
        channel: &mut dyn Channel,
        spec: &ContainerSpec,
    ) -> Result<Option<LiveContainer>> {
        let output = match run_inspect(channel, &container::inspect(&spec.name)).await? {
            Some(output) => output,
            None => return Ok(None),
        };
        let inspect: ContainerInspect =
            live::parse_inspect(&output.stdout, self.kind(), &spec.name)?;
        Ok(Some(LiveContainer::from(inspect)))
    }

    fn plan(&self, spec: &ContainerSpec, live: Option<&LiveContainer>) -> Plan<ContainerStep> {
        plan_container(spec, live)
    }

    async fn apply(
        &self,
        channel: &mut dyn Channel,
        spec: &ContainerSpec,
        step: ContainerStep,
    ) -> Result<String> {
        let command = match step {
            ContainerStep::Run => container::run(
                spec,
                &container::RunOptions {
                    detach: true,
                    ..Default::default()
                },
            ),
            ContainerStep::Start => container::start(spec, &container::StartOptions::default()),
            ContainerStep::Stop => container::stop(
                spec,
                &container::StopOptions {
                    time: self.stop_timeout,
                    ..Default::default()
                },
            ),
            ContainerStep::Remove => container::rm(spec, &container::RmOptions::default()),
        };
        run_checked(channel, &command).await?;
        Ok(command.to_string())
    }
}
