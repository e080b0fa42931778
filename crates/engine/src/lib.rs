//! Remote reasoning-engine client for Agentdeck.
//!
//! Talks to the hosted service over two surfaces:
//! - the management plane (agent catalog, session creation, long-running
//!   operation polling), addressed by resource path, and
//! - the data plane (`:streamQuery`), which answers with newline-delimited
//!   JSON chunks.
//!
//! Both authenticate with opaque bearer tokens from a
//! [`TokenProvider`](agentdeck_core::TokenProvider).

pub mod auth;
pub mod catalog;
pub mod operation;
pub mod query;
pub mod sessions;

use std::sync::Arc;

use agentdeck_core::TokenProvider;
use agentdeck_core::error::EngineError;
use tracing::warn;

pub use operation::{Operation, OperationFetcher, OperationPoller, extract_session_id};
pub use query::{NO_TEXT_FALLBACK, QueryRequest, reassemble};

/// HTTP client for one regional deployment of the reasoning-engine service.
pub struct ReasoningEngineClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ReasoningEngineClient {
    /// Create a client for the given region.
    pub fn new(location: &str, tokens: Arc<dyn TokenProvider>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: format!("https://{location}-aiplatform.googleapis.com"),
            tokens,
        }
    }

    /// Override the endpoint host (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Render the Authorization header value for the next request.
    pub(crate) async fn auth_header(&self) -> Result<String, EngineError> {
        Ok(format!("Bearer {}", self.tokens.bearer_token().await?))
    }

    /// Triage a response: pass 2xx through, turn anything else into an
    /// [`EngineError::Api`] with a best-effort message from the body.
    pub(crate) async fn check_status(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, EngineError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        warn!(status = code, body = %body, "Reasoning-engine API error");
        Err(EngineError::Api {
            status: code,
            message: query::extract_error_message(&body),
        })
    }
}
