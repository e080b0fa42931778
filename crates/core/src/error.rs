//! Error types for the Agentdeck domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Agentdeck operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Remote service errors ---
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the remote reasoning-engine service.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("API request failed: {message} (status: {status})")]
    Api { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Operation {operation} not done after {attempts} polls")]
    OperationTimedOut { operation: String, attempts: u32 },

    #[error("Wait for operation {0} was cancelled")]
    Cancelled(String),

    #[error("Invalid resource name: {0}")]
    InvalidResource(String),

    #[error("Terminal operation {0} carried no session id")]
    MissingSessionId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_status_and_message() {
        let err = Error::Engine(EngineError::Api {
            status: 429,
            message: "rate limited".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("rate limited"));
    }

    #[test]
    fn timeout_error_displays_attempts() {
        let err = EngineError::OperationTimedOut {
            operation: "projects/p/locations/l/operations/123".into(),
            attempts: 150,
        };
        assert!(err.to_string().contains("150"));
        assert!(err.to_string().contains("operations/123"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = Error::Config {
            message: "GCP_PROJECT_ID must be set".into(),
        };
        assert!(err.to_string().contains("GCP_PROJECT_ID"));
    }
}
