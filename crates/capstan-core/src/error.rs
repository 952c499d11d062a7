//! Error types shared across the capstan crates.
//!
//! The taxonomy mirrors the failure classes of a reconciliation pass:
//! connection errors (fatal before any mutation), command execution errors
//! (non-zero exit from the container engine), and discovery errors (live
//! state that does not match any expected shape).

use thiserror::Error;

/// Result type for capstan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converging a resource.
#[derive(Debug, Error)]
pub enum Error {
    /// Could not reach or authenticate against the remote host.
    #[error("failed to connect to {host}: {reason}")]
    Connection {
        /// The host that could not be reached.
        host: String,
        /// The reason for the failure.
        reason: String,
    },

    /// A container-engine command exited with a non-zero status.
    #[error("command `{command}` failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        /// The rendered command that failed.
        command: String,
        /// The exit code reported by the remote shell.
        exit_code: i32,
        /// Captured standard error output.
        stderr: String,
    },

    /// Live state did not match any expected shape.
    #[error("discovery error: {0}")]
    Discovery(String),

    /// The remote channel was used after being closed.
    #[error("channel closed")]
    ChannelClosed,

    /// Timeout waiting for a condition.
    #[error("timeout waiting for {condition}")]
    Timeout {
        /// The condition that timed out.
        condition: String,
    },

    /// Failed to parse structured output from the container engine.
    #[error("failed to parse engine output: {0}")]
    Parse(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a connection error.
    pub fn connection(host: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Connection {
            host: host.into(),
            reason: reason.into(),
        }
    }

    /// Creates a command failure error.
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Creates a discovery error.
    pub fn discovery(reason: impl Into<String>) -> Self {
        Self::Discovery(reason.into())
    }

    /// Creates a timeout error.
    pub fn timeout(condition: impl Into<String>) -> Self {
        Self::Timeout {
            condition: condition.into(),
        }
    }

    /// Returns true if this error happened before any mutating command was
    /// issued.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Returns true if this error was reported by the container engine.
    pub fn is_command_failure(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::connection("db.example.com", "auth failure");
        assert_eq!(
            err.to_string(),
            "failed to connect to db.example.com: auth failure"
        );

        let err = Error::command_failed("/usr/bin/podman container rm db", 2, "in use");
        assert_eq!(
            err.to_string(),
            "command `/usr/bin/podman container rm db` failed with exit code 2: in use"
        );
    }

    #[test]
    fn test_error_classes() {
        assert!(Error::connection("h", "r").is_connection());
        assert!(!Error::connection("h", "r").is_command_failure());
        assert!(Error::command_failed("c", 1, "e").is_command_failure());
        assert!(!Error::discovery("ambiguous").is_connection());
    }
}
