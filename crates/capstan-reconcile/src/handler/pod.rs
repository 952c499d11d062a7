//! Pod reconciliation handler.

use async_trait::async_trait;
use capstan_command::pod;
use capstan_core::{PodSpec, Result};

use super::{run_checked, run_inspect, ResourceHandler};
use crate::channel::Channel;
use crate::live::{self, LivePod, PodInspect};
use crate::plan::{plan_pod, Plan, PodStep};

/// Converges pods onto their specs.
///
/// Pod removal takes its member containers with it; specs that manage
/// members individually converge those before the pod.
#[derive(Debug, Clone, Default)]
pub struct PodHandler;

impl PodHandler {
    /// Creates a pod handler.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResourceHandler for PodHandler {
    type Spec = PodSpec;
    type Live = LivePod;
    type Step = PodStep;

    fn kind(&self) -> &'static str {
        "pod"
    }

    fn name<'a>(&self, spec: &'a PodSpec) -> &'a str {
        &spec.name
    }

    async fn read(&self, channel: &mut dyn Channel, spec: &PodSpec) -> Result<Option<LivePod>> {
        let output = match run_inspect(channel, &pod::inspect(&spec.name)).await? {
            Some(output) => output,
            None => return Ok(None),
        };
        let inspect: PodInspect = live::parse_inspect(&output.stdout, self.kind(), &spec.name)?;
        Ok(Some(LivePod::from(inspect)))
    }

    fn plan(&self, spec: &PodSpec, live: Option<&LivePod>) -> Plan<PodStep> {
        plan_pod(spec, live)
    }

    async fn apply(
        &self,
        channel: &mut dyn Channel,
        spec: &PodSpec,
        step: PodStep,
    ) -> Result<String> {
        let command = match step {
            PodStep::Create => pod::create(spec, &pod::CreateOptions::default()),
            PodStep::Start => pod::start(spec, &pod::StartOptions::default()),
            PodStep::Stop => pod::stop(spec, &pod::StopOptions::default()),
            PodStep::Remove => pod::rm(spec, &pod::RmOptions::default()),
        };
        run_checked(channel, &command).await?;
        Ok(command.to_string())
    }
}
