//! Execution channel trait definition.
//!
//! This module defines the core trait that all execution channels must
//! implement, along with supporting types for configuration and command
//! output. A channel is the only place in the workspace that performs
//! I/O: everything above it renders commands, everything below it runs
//! them.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use capstan_command::CommandLine;
use capstan_core::Result;
use serde::{Deserialize, Serialize};

mod local;
mod script;
mod ssh;

pub use local::LocalChannel;
pub use script::ScriptedChannel;
pub use ssh::SshChannel;

/// Core trait for command execution channels.
///
/// A channel runs rendered command lines on some host and reports their
/// output. Implementations never interpret the commands they carry: a
/// channel that succeeds means the process ran, not that the command
/// achieved anything. Callers inspect [`ExecOutput::success`] for that.
///
/// # Lifecycle
///
/// 1. Open a channel (for SSH this establishes the master connection)
/// 2. Call `run()` for each command of a reconciliation pass
/// 3. Call `close()` when the pass is over, even if a command failed
///
/// A closed channel rejects further commands with
/// [`capstan_core::Error::ChannelClosed`].
#[async_trait]
pub trait Channel: Send {
    /// Runs a command and waits for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be started or timed
    /// out. A command that ran and exited non-zero is NOT an error at
    /// this level; the exit code is reported in the output.
    async fn run(&mut self, command: &CommandLine) -> Result<ExecOutput>;

    /// Releases the channel and any transport it holds.
    ///
    /// Closing an already-closed channel is a no-op.
    async fn close(&mut self) -> Result<()>;

    /// Returns a label for the host this channel talks to, for logging.
    fn host(&self) -> &str;
}

/// Output from running a command over a channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecOutput {
    /// Standard output from the command.
    pub stdout: String,

    /// Standard error from the command.
    pub stderr: String,

    /// Exit code of the command.
    pub exit_code: i32,
}

impl ExecOutput {
    /// Creates a new exec output.
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, exit_code: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    /// Creates a successful output carrying only stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self::new(stdout, "", 0)
    }

    /// Returns true if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns the combined stdout and stderr.
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }

    /// Returns stdout lines as a vector.
    pub fn stdout_lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}

impl From<std::process::Output> for ExecOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            // A process killed by a signal has no code; report -1 so the
            // failure is still visible to callers.
            exit_code: output.status.code().unwrap_or(-1),
        }
    }
}

/// Configuration for execution channels.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Maximum wall-clock time for a single command.
    pub command_timeout: Duration,

    /// The ssh client binary to invoke.
    pub ssh_binary: PathBuf,

    /// Directory holding SSH control sockets.
    pub control_dir: PathBuf,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            command_timeout: Duration::from_secs(300),
            ssh_binary: PathBuf::from("ssh"),
            control_dir: std::env::temp_dir(),
        }
    }
}

impl ChannelConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-command timeout.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Sets the ssh client binary.
    pub fn ssh_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.ssh_binary = binary.into();
        self
    }

    /// Sets the directory for SSH control sockets.
    pub fn control_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.control_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exec_output() {
        let output = ExecOutput::ok("hello\nworld");
        assert!(output.success());
        assert_eq!(output.stdout_lines(), vec!["hello", "world"]);

        let output = ExecOutput::new("", "error", 1);
        assert!(!output.success());
        assert_eq!(output.combined_output(), "error");
    }

    #[test]
    fn test_exec_output_combined() {
        let output = ExecOutput::new("out", "err", 0);
        assert_eq!(output.combined_output(), "out\nerr");
    }

    #[test]
    fn test_config_builder() {
        let config = ChannelConfig::new()
            .command_timeout(Duration::from_secs(30))
            .ssh_binary("/usr/bin/ssh")
            .control_dir("/run/capstan");
        assert_eq!(config.command_timeout, Duration::from_secs(30));
        assert_eq!(config.ssh_binary, PathBuf::from("/usr/bin/ssh"));
        assert_eq!(config.control_dir, PathBuf::from("/run/capstan"));
    }
}
