//! Agent catalog — thin pass-through over the management plane listing.

use serde::Deserialize;
use tracing::debug;

use agentdeck_core::agent::{AgentDetails, AgentSummary};
use agentdeck_core::error::EngineError;
use agentdeck_core::resource::EngineName;

use crate::ReasoningEngineClient;

/// Classification reported for every engine in this catalog.
const AGENT_KIND: &str = "Reasoning Engine (ADK)";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EngineResource {
    name: String,
    #[serde(default)]
    display_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListEnginesResponse {
    #[serde(default)]
    reasoning_engines: Vec<EngineResource>,
}

fn to_summary(resource: &EngineResource) -> AgentSummary {
    AgentSummary {
        id: resource
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string(),
        display_name: resource.display_name.clone(),
        full_name: resource.name.clone(),
    }
}

impl ReasoningEngineClient {
    /// List the reasoning engines deployed under `projects/{p}/locations/{l}`.
    pub async fn list_agents(
        &self,
        project: &str,
        location: &str,
    ) -> Result<Vec<AgentSummary>, EngineError> {
        let url = format!(
            "{}/v1/projects/{}/locations/{}/reasoningEngines",
            self.base_url(),
            project,
            location
        );
        let response = self
            .http()
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header().await?)
            .send()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;
        let response = Self::check_status(response).await?;

        let listing: ListEnginesResponse =
            response.json().await.map_err(|e| EngineError::Api {
                status: 200,
                message: format!("Failed to parse engine listing: {e}"),
            })?;
        debug!(count = listing.reasoning_engines.len(), "Listed reasoning engines");

        Ok(listing.reasoning_engines.iter().map(to_summary).collect())
    }

    /// Fetch details for one engine.
    pub async fn get_agent(&self, engine: &EngineName) -> Result<AgentDetails, EngineError> {
        let url = format!("{}/v1/{}", self.base_url(), engine);
        let response = self
            .http()
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header().await?)
            .send()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;
        let response = Self::check_status(response).await?;

        let resource: EngineResource = response.json().await.map_err(|e| EngineError::Api {
            status: 200,
            message: format!("Failed to parse engine resource: {e}"),
        })?;

        Ok(AgentDetails {
            display_name: resource.display_name,
            kind: AGENT_KIND.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_parses_camel_case_wire_format() {
        let listing: ListEnginesResponse = serde_json::from_str(
            r#"{
                "reasoningEngines": [
                    {"name": "projects/p/locations/l/reasoningEngines/111", "displayName": "Weather"},
                    {"name": "projects/p/locations/l/reasoningEngines/222"}
                ]
            }"#,
        )
        .unwrap();

        let summaries: Vec<AgentSummary> =
            listing.reasoning_engines.iter().map(to_summary).collect();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, "111");
        assert_eq!(summaries[0].display_name, "Weather");
        assert_eq!(
            summaries[0].full_name,
            "projects/p/locations/l/reasoningEngines/111"
        );
        assert_eq!(summaries[1].display_name, "");
    }

    #[test]
    fn empty_listing_parses() {
        let listing: ListEnginesResponse = serde_json::from_str("{}").unwrap();
        assert!(listing.reasoning_engines.is_empty());
    }
}
