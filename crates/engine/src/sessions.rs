//! Session creation against the management plane.
//!
//! Creating a session is asynchronous: the POST returns an operation which
//! the poller then drives to completion. Callers that can run without a
//! session use the fallback variant, which downgrades any failure to a
//! warning and "no session".

use tracing::{info, warn};

use agentdeck_core::error::EngineError;
use agentdeck_core::resource::EngineName;

use crate::ReasoningEngineClient;
use crate::operation::{Operation, OperationPoller, extract_session_id};

impl ReasoningEngineClient {
    /// Create a session on `engine` for `user_id` and wait for the
    /// resulting operation, returning the new session id.
    pub async fn create_session(
        &self,
        engine: &EngineName,
        user_id: &str,
        poller: &OperationPoller,
    ) -> Result<String, EngineError> {
        let url = format!("{}/v1/{}/sessions", self.base_url(), engine);
        let body = serde_json::json!({ "userId": user_id });
        info!(engine = %engine.engine_id(), "Creating session");

        let response = self
            .http()
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header().await?)
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;
        let response = Self::check_status(response).await?;

        let operation: Operation = response.json().await.map_err(|e| EngineError::Api {
            status: 200,
            message: format!("Failed to parse operation: {e}"),
        })?;

        let terminal = poller.wait(self, operation).await?;
        extract_session_id(&terminal)
            .ok_or_else(|| EngineError::MissingSessionId(terminal.name.clone()))
    }

    /// Create a session, or fall back to "no session" on any failure.
    ///
    /// Failures are logged at warning level so persistent bootstrap
    /// problems stay visible to operators; callers proceed with an empty
    /// session id.
    pub async fn create_session_or_fallback(
        &self,
        engine: &EngineName,
        user_id: &str,
        poller: &OperationPoller,
    ) -> Option<String> {
        match self.create_session(engine, user_id, poller).await {
            Ok(session_id) => {
                info!(engine = %engine.engine_id(), session = %session_id, "Session created");
                Some(session_id)
            }
            Err(e) => {
                warn!(engine = %engine.engine_id(), error = %e, "Session creation failed — proceeding without a session");
                None
            }
        }
    }
}
