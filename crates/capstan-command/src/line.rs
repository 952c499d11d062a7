//! The rendered command line.

use std::fmt;

/// Path of the podman binary on the managed hosts.
pub const PODMAN: &str = "/usr/bin/podman";

/// One ready-to-execute podman invocation.
///
/// An ordered token sequence; the order is fixed by the builder that
/// produced it. Ephemeral: produced and consumed within a single
/// reconciliation step, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    tokens: Vec<String>,
}

impl CommandLine {
    /// Starts a command line for the given entity noun and operation verb.
    pub(crate) fn new(noun: &str, verb: &str) -> Self {
        Self {
            tokens: vec![PODMAN.to_string(), noun.to_string(), verb.to_string()],
        }
    }

    /// Appends a token.
    pub(crate) fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    /// Appends a token when present.
    pub(crate) fn push_opt(&mut self, token: Option<String>) {
        if let Some(token) = token {
            self.tokens.push(token);
        }
    }

    /// Appends every token in the sequence.
    pub(crate) fn extend(&mut self, tokens: impl IntoIterator<Item = String>) {
        self.tokens.extend(tokens);
    }

    /// Returns the tokens in order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Consumes the command line, returning the tokens.
    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_with_spaces() {
        let mut line = CommandLine::new("container", "stop");
        line.push("--time=10");
        line.push("db");
        assert_eq!(line.to_string(), "/usr/bin/podman container stop --time=10 db");
    }

    #[test]
    fn test_push_opt_absent_leaves_no_trace() {
        let mut line = CommandLine::new("pod", "start");
        line.push_opt(None);
        line.push("web");
        assert_eq!(line.tokens(), &["/usr/bin/podman", "pod", "start", "web"]);
    }
}
