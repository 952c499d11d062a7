//! Scripted channel used by the test suites.
//!
//! Replays a fixed sequence of expected commands and canned outputs,
//! recording everything that was actually run. Handler tests script
//! the podman side of a conversation and assert the exact transcript
//! afterwards.

use std::collections::VecDeque;

use async_trait::async_trait;
use capstan_command::CommandLine;
use capstan_core::{Error, Result};

use super::{Channel, ExecOutput};

/// A channel that replays pre-scripted command outputs.
#[derive(Debug, Default)]
pub struct ScriptedChannel {
    script: VecDeque<(String, ExecOutput)>,
    executed: Vec<String>,
    closed: bool,
}

impl ScriptedChannel {
    /// Creates an empty scripted channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an expected command and the output it should produce.
    pub fn expect(mut self, command: impl Into<String>, output: ExecOutput) -> Self {
        self.script.push_back((command.into(), output));
        self
    }

    /// Returns the commands that were run, in order.
    pub fn executed(&self) -> &[String] {
        &self.executed
    }

    /// Returns true if `close()` was called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns true if every scripted command was consumed.
    pub fn is_drained(&self) -> bool {
        self.script.is_empty()
    }
}

#[async_trait]
impl Channel for ScriptedChannel {
    async fn run(&mut self, command: &CommandLine) -> Result<ExecOutput> {
        if self.closed {
            return Err(Error::ChannelClosed);
        }
        let rendered = command.to_string();
        let (expected, output) = match self.script.pop_front() {
            Some(entry) => entry,
            None => {
                return Err(Error::discovery(format!(
                    "unscripted command: `{rendered}`"
                )))
            }
        };
        if rendered != expected {
            return Err(Error::discovery(format!(
                "expected `{expected}`, got `{rendered}`"
            )));
        }
        self.executed.push(rendered);
        Ok(output)
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }

    fn host(&self) -> &str {
        "scripted"
    }
}
