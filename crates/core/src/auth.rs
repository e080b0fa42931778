//! The token seam — how the rest of the system obtains bearer tokens.
//!
//! Credentials are an external collaborator: this crate only knows that
//! *something* can produce an opaque bearer token for the cloud-platform
//! scope. Implementations (static token, gcloud CLI) live in the engine
//! crate.

use async_trait::async_trait;

use crate::error::EngineError;

/// Supplies opaque bearer tokens for calls to the remote service.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "static", "gcloud").
    fn name(&self) -> &str;

    /// Fetch a bearer token. Called per request; implementations may cache.
    async fn bearer_token(&self) -> std::result::Result<String, EngineError>;
}
