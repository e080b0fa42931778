//! Token provider implementations.
//!
//! The remote service wants a cloud-platform-scoped bearer token on every
//! call. Two sources are supported: a fixed token handed in via config or
//! environment, and the gcloud CLI's application-default credentials.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use agentdeck_config::AuthConfig;
use agentdeck_core::TokenProvider;
use agentdeck_core::error::EngineError;

/// A fixed bearer token, typically from `AGENTDECK_ACCESS_TOKEN`.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn bearer_token(&self) -> Result<String, EngineError> {
        if self.token.is_empty() {
            return Err(EngineError::Auth("Configured token is empty".into()));
        }
        Ok(self.token.clone())
    }
}

/// Mints tokens by shelling out to `gcloud auth print-access-token`.
pub struct GcloudTokenProvider;

#[async_trait]
impl TokenProvider for GcloudTokenProvider {
    fn name(&self) -> &str {
        "gcloud"
    }

    async fn bearer_token(&self) -> Result<String, EngineError> {
        debug!("Minting access token via gcloud");
        let output = tokio::process::Command::new("gcloud")
            .args(["auth", "print-access-token"])
            .output()
            .await
            .map_err(|e| EngineError::Auth(format!("Failed to run gcloud: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Auth(format!(
                "gcloud auth print-access-token failed: {}",
                stderr.trim()
            )));
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(EngineError::Auth("gcloud returned an empty token".into()));
        }
        Ok(token)
    }
}

/// Pick a token provider from the `[auth]` config section.
pub fn provider_from_config(auth: &AuthConfig) -> Arc<dyn TokenProvider> {
    match &auth.access_token {
        Some(token) if !token.is_empty() => Arc::new(StaticTokenProvider::new(token.clone())),
        _ => Arc::new(GcloudTokenProvider),
    }
}
