//! Image reconciliation handler.

use async_trait::async_trait;
use capstan_command::image;
use capstan_core::{ImageSpec, Result};

use super::{run_checked, run_inspect, ResourceHandler};
use crate::channel::Channel;
use crate::live::{self, LiveImage};
use crate::plan::{plan_image, ImageStep, Plan};

/// Converges local image presence onto specs.
///
/// An image that is already present is never re-pulled; updating a
/// moving tag is an explicit removal followed by a fresh pass.
#[derive(Debug, Clone, Default)]
pub struct ImageHandler;

impl ImageHandler {
    /// Creates an image handler.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResourceHandler for ImageHandler {
    type Spec = ImageSpec;
    type Live = LiveImage;
    type Step = ImageStep;

    fn kind(&self) -> &'static str {
        "image"
    }

    fn name<'a>(&self, spec: &'a ImageSpec) -> &'a str {
        spec.reference()
    }

    async fn read(&self, channel: &mut dyn Channel, spec: &ImageSpec) -> Result<Option<LiveImage>> {
        let output = match run_inspect(channel, &image::inspect(spec.reference())).await? {
            Some(output) => output,
            None => return Ok(None),
        };
        let inspect: LiveImage =
            live::parse_inspect(&output.stdout, self.kind(), spec.reference())?;
        Ok(Some(inspect))
    }

    fn plan(&self, spec: &ImageSpec, live: Option<&LiveImage>) -> Plan<ImageStep> {
        plan_image(spec.presence, live.is_some())
    }

    async fn apply(
        &self,
        channel: &mut dyn Channel,
        spec: &ImageSpec,
        step: ImageStep,
    ) -> Result<String> {
        let command = match step {
            ImageStep::Pull => image::pull(spec),
            ImageStep::Remove => image::rm(spec, &image::RmOptions::default()),
        };
        run_checked(channel, &command).await?;
        Ok(command.to_string())
    }
}
