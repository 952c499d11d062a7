//! Local execution channel.
//!
//! Runs commands directly on the machine the reconciler itself runs
//! on. Used when the target host is the local one, and handy when
//! exercising handlers against a local podman.

use async_trait::async_trait;
use capstan_command::CommandLine;
use capstan_core::{Error, Result};
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::timeout;

use super::{Channel, ChannelConfig, ExecOutput};

/// An execution channel that spawns commands as local child processes.
pub struct LocalChannel {
    config: ChannelConfig,
    closed: bool,
}

impl LocalChannel {
    /// Creates a local channel.
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            closed: false,
        }
    }
}

#[async_trait]
impl Channel for LocalChannel {
    async fn run(&mut self, command: &CommandLine) -> Result<ExecOutput> {
        if self.closed {
            return Err(Error::ChannelClosed);
        }
        let tokens = command.tokens();
        let (program, args) = match tokens.split_first() {
            Some(split) => split,
            None => return Err(Error::discovery("empty command line")),
        };
        let mut child = Command::new(program);
        child.args(args);
        child.stdin(Stdio::null());
        child.kill_on_drop(true);

        let output = timeout(self.config.command_timeout, child.output())
            .await
            .map_err(|_| Error::timeout(format!("`{}` on localhost", command)))??;
        Ok(ExecOutput::from(output))
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }

    fn host(&self) -> &str {
        "localhost"
    }
}
