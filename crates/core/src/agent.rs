//! Agent catalog types returned by the management plane.

use serde::{Deserialize, Serialize};

/// One row of the agent listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSummary {
    /// The trailing resource-name segment (agent short id).
    pub id: String,

    /// Human-readable name configured on the remote engine.
    pub display_name: String,

    /// Full resource name, `projects/…/locations/…/reasoningEngines/{id}`.
    pub full_name: String,
}

/// Details for a single agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDetails {
    pub display_name: String,

    /// Coarse classification of the agent's runtime.
    #[serde(rename = "type")]
    pub kind: String,
}
