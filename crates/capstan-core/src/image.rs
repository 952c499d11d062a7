//! Image specification.

use serde::{Deserialize, Serialize};

use crate::value::Presence;

/// Desired state of an image pulled from a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSpec {
    /// Full image reference (registry/repository:tag).
    reference: String,

    /// Desired presence.
    pub presence: Presence,
}

impl ImageSpec {
    /// Creates a spec for an image that should be present on the host.
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            presence: Presence::Present,
        }
    }

    /// Sets the desired presence.
    pub fn with_presence(mut self, presence: Presence) -> Self {
        self.presence = presence;
        self
    }

    /// Returns the full image reference.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns the image name (without tag or digest).
    pub fn name(&self) -> &str {
        let without_digest = self
            .reference
            .split('@')
            .next()
            .unwrap_or(&self.reference);
        // A colon only separates a tag after the last path segment;
        // earlier ones belong to a registry port.
        match without_digest.rfind(':') {
            Some(idx) if !without_digest[idx..].contains('/') => &without_digest[..idx],
            _ => without_digest,
        }
    }

    /// Returns the image tag if present.
    pub fn tag(&self) -> Option<&str> {
        let without_digest = self.reference.split('@').next()?;
        match without_digest.rfind(':') {
            Some(idx) if !without_digest[idx..].contains('/') => Some(&without_digest[idx + 1..]),
            _ => None,
        }
    }

    /// Returns the registry if the reference names one.
    pub fn registry(&self) -> Option<&str> {
        let name = self.name();
        let first = name.split('/').next()?;
        if name.contains('/') && (first.contains('.') || first.contains(':')) {
            Some(first)
        } else {
            None
        }
    }
}

impl From<&str> for ImageSpec {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ImageSpec {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
