//! Outcome of a reconciliation pass over one resource.

use serde::{Deserialize, Serialize};

/// What a converge pass did to a single resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergeReport {
    /// Resource identity as `kind/name`.
    pub resource: String,

    /// Names of the steps that were applied, in order. Empty when the
    /// resource already matched its spec.
    pub steps: Vec<String>,

    /// The commands that were issued, rendered as they ran.
    pub commands: Vec<String>,
}

impl ConvergeReport {
    /// Creates a report for a resource that needed no changes.
    pub fn unchanged(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            steps: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Returns true when the pass changed the host.
    pub fn changed(&self) -> bool {
        !self.steps.is_empty()
    }
}
