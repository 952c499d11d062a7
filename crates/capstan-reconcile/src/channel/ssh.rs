//! SSH execution channel backed by the OpenSSH client.
//!
//! The channel opens a multiplexed master connection when it connects
//! and reuses it for every command of a pass, so a converge run pays
//! the SSH handshake once. `close()` tears the master down again.

use std::borrow::Cow;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use capstan_command::CommandLine;
use capstan_core::{Error, HostDescriptor, Result};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::{Channel, ChannelConfig, ExecOutput};

/// How long the master connection lingers after the last command, in
/// seconds. Long enough to span a reconciliation pass with slow
/// commands in it, short enough not to pin sockets on the host.
const CONTROL_PERSIST_SECS: u32 = 60;

/// An execution channel that runs commands on a remote host over SSH.
pub struct SshChannel {
    host: HostDescriptor,
    destination: String,
    config: ChannelConfig,
    control_path: PathBuf,
    closed: bool,
}

impl SshChannel {
    /// Connects to the host and establishes the master connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the host is unreachable or
    /// authentication fails, and [`Error::Timeout`] if the handshake
    /// does not complete within the host's connect timeout.
    pub async fn connect(host: &HostDescriptor, config: ChannelConfig) -> Result<Self> {
        let destination = host.destination();
        let socket = format!(
            "capstan-{}-{}.sock",
            destination.replace(['@', ':', '/'], "-"),
            host.port.unwrap_or(22)
        );
        let channel = Self {
            host: host.clone(),
            destination,
            control_path: config.control_dir.join(socket),
            config,
            closed: false,
        };

        let mut probe = channel.ssh_command();
        probe.arg("-o").arg(format!(
            "ConnectTimeout={}",
            channel.host.connect_timeout.as_secs().max(1)
        ));
        probe.arg(&channel.destination).arg("true");

        debug!(host = %channel.destination, "Opening SSH master connection");
        // Give the probe a little slack beyond ssh's own timeout so the
        // client can report the real failure instead of being killed.
        let budget = channel.host.connect_timeout + channel.host.connect_timeout / 2;
        let output = timeout(budget, probe.output())
            .await
            .map_err(|_| Error::timeout(format!("SSH handshake with {}", channel.destination)))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::connection(&channel.destination, stderr.trim()));
        }
        Ok(channel)
    }

    /// Base ssh invocation sharing the control socket.
    fn ssh_command(&self) -> Command {
        let mut cmd = Command::new(&self.config.ssh_binary);
        cmd.arg("-o").arg("BatchMode=yes");
        cmd.arg("-o").arg("ControlMaster=auto");
        cmd.arg("-o")
            .arg(format!("ControlPath={}", self.control_path.display()));
        cmd.arg("-o")
            .arg(format!("ControlPersist={}", CONTROL_PERSIST_SECS));
        if let Some(port) = self.host.port {
            cmd.arg("-p").arg(port.to_string());
        }
        if let Some(identity) = &self.host.identity_file {
            cmd.arg("-i").arg(identity);
        }
        for option in &self.host.ssh_options {
            cmd.arg("-o").arg(option);
        }
        cmd.stdin(Stdio::null());
        cmd.kill_on_drop(true);
        cmd
    }

    /// Renders a command line into a single remote shell word sequence.
    fn remote_script(command: &CommandLine) -> String {
        let escaped: Vec<String> = command
            .tokens()
            .iter()
            .map(|token| shell_escape::escape(Cow::Borrowed(token.as_str())).into_owned())
            .collect();
        escaped.join(" ")
    }
}

#[async_trait]
impl Channel for SshChannel {
    async fn run(&mut self, command: &CommandLine) -> Result<ExecOutput> {
        if self.closed {
            return Err(Error::ChannelClosed);
        }
        let mut ssh = self.ssh_command();
        ssh.arg(&self.destination).arg("--").arg(Self::remote_script(command));

        let output = timeout(self.config.command_timeout, ssh.output())
            .await
            .map_err(|_| Error::timeout(format!("`{}` on {}", command, self.destination)))??;
        Ok(ExecOutput::from(output))
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let mut exit = self.ssh_command();
        exit.arg("-O").arg("exit").arg(&self.destination);
        exit.stdout(Stdio::null()).stderr(Stdio::null());
        match exit.status().await {
            Ok(_) => Ok(()),
            Err(err) => {
                // The master may have timed out on its own; there is
                // nothing left to release in that case.
                warn!(host = %self.destination, error = %err, "Failed to stop SSH master");
                Ok(())
            }
        }
    }

    fn host(&self) -> &str {
        &self.destination
    }
}

impl Drop for SshChannel {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        // Best effort only; ControlPersist reaps the master anyway if
        // this fails.
        let _ = std::process::Command::new(&self.config.ssh_binary)
            .arg("-o")
            .arg(format!("ControlPath={}", self.control_path.display()))
            .arg("-O")
            .arg("exit")
            .arg(&self.destination)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capstan_command::container;
    use capstan_core::ContainerSpec;

    #[test]
    fn test_remote_script_escapes_tokens() {
        let spec = ContainerSpec::builder("db", "docker.io/library/postgres:13")
            .env("PGDATA", "/var/lib/postgresql/data")
            .build();
        let script = SshChannel::remote_script(&container::run(&spec, &Default::default()));
        assert!(script.starts_with("/usr/bin/podman container run"));
        assert!(script.contains("--env=PGDATA=/var/lib/postgresql/data"));

        let spec = ContainerSpec::builder("echo", "alpine")
            .command("echo $HOME")
            .build();
        let script = SshChannel::remote_script(&container::run(&spec, &Default::default()));
        // The remote shell must not expand variables out of the spec.
        assert!(script.contains("'echo $HOME'"));
    }
}
