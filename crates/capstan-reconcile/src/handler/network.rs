//! Network reconciliation handler.

use async_trait::async_trait;
use capstan_command::network;
use capstan_core::{NetworkSpec, Result};

use super::{run_checked, run_inspect, ResourceHandler};
use crate::channel::Channel;
use crate::live::{self, LiveNetwork};
use crate::plan::{plan_network, NetworkStep, Plan};

/// Converges networks onto their specs.
#[derive(Debug, Clone, Default)]
pub struct NetworkHandler {
    force_remove: bool,
}

impl NetworkHandler {
    /// Creates a network handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes networks even when containers are still attached.
    pub fn force_remove(mut self) -> Self {
        self.force_remove = true;
        self
    }
}

#[async_trait]
impl ResourceHandler for NetworkHandler {
    type Spec = NetworkSpec;
    type Live = LiveNetwork;
    type Step = NetworkStep;

    fn kind(&self) -> &'static str {
        "network"
    }

    fn name<'a>(&self, spec: &'a NetworkSpec) -> &'a str {
        &spec.name
    }

    async fn read(
        &self,
        channel: &mut dyn Channel,
        spec: &NetworkSpec,
    ) -> Result<Option<LiveNetwork>> {
        let output = match run_inspect(channel, &network::inspect(&spec.name)).await? {
            Some(output) => output,
            None => return Ok(None),
        };
        let inspect: LiveNetwork = live::parse_inspect(&output.stdout, self.kind(), &spec.name)?;
        Ok(Some(inspect))
    }

    fn plan(&self, spec: &NetworkSpec, live: Option<&LiveNetwork>) -> Plan<NetworkStep> {
        plan_network(spec, live)
    }

    async fn apply(
        &self,
        channel: &mut dyn Channel,
        spec: &NetworkSpec,
        step: NetworkStep,
    ) -> Result<String> {
        let command = match step {
            NetworkStep::Create => network::create(spec),
            NetworkStep::Remove => network::rm(
                spec,
                &network::RmOptions {
                    force: self.force_remove,
                },
            ),
        };
        run_checked(channel, &command).await?;
        Ok(command.to_string())
    }
}
