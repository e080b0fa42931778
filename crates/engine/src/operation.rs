//! Long-running operation polling.
//!
//! Session creation is asynchronous on the remote side: the initiation call
//! returns an [`Operation`] handle which must be re-fetched until `done`.
//! [`OperationPoller`] owns that loop — fixed interval, bounded attempts,
//! cancellable — and [`extract_session_id`] resolves the session id from
//! the terminal operation.

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use agentdeck_core::error::EngineError;

use crate::ReasoningEngineClient;

/// Default seconds between status fetches.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;
/// Default fetch bound; at the default interval this is a five-minute wait.
const DEFAULT_MAX_ATTEMPTS: u32 = 150;

/// An asynchronous unit of work on the remote service.
///
/// Immutable once `done` is true; the service owns its lifecycle and this
/// code only ever holds a transient snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    /// Opaque operation name, also the handle for re-fetching.
    pub name: String,

    #[serde(default)]
    pub done: bool,

    /// Terminal payload; present only once `done` is true.
    #[serde(default)]
    pub response: Option<serde_json::Value>,
}

/// The fetch seam: anything that can re-fetch an operation by name.
#[async_trait]
pub trait OperationFetcher: Send + Sync {
    async fn fetch(&self, name: &str) -> Result<Operation, EngineError>;
}

#[async_trait]
impl OperationFetcher for ReasoningEngineClient {
    async fn fetch(&self, name: &str) -> Result<Operation, EngineError> {
        let url = format!("{}/v1/{}", self.base_url(), name);
        let response = self
            .http()
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header().await?)
            .send()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;
        let response = Self::check_status(response).await?;
        response.json().await.map_err(|e| EngineError::Api {
            status: 200,
            message: format!("Failed to parse operation: {e}"),
        })
    }
}

/// Waits for an operation to complete.
///
/// When `done` first turns true on the Nth fetch, exactly N fetches are
/// performed. Exhausting the attempt bound yields
/// [`EngineError::OperationTimedOut`]; firing the cancellation token yields
/// [`EngineError::Cancelled`].
pub struct OperationPoller {
    interval: std::time::Duration,
    max_attempts: u32,
    cancel: CancellationToken,
}

impl Default for OperationPoller {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationPoller {
    pub fn new() -> Self {
        Self {
            interval: std::time::Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            cancel: CancellationToken::new(),
        }
    }

    /// Build a poller from the `[poll]` config section.
    pub fn from_config(poll: &agentdeck_config::PollConfig) -> Self {
        Self::new()
            .with_interval(std::time::Duration::from_secs(poll.interval_secs))
            .with_max_attempts(poll.max_attempts)
    }

    pub fn with_interval(mut self, interval: std::time::Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Attach a cancellation token; firing it aborts the wait.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Wait until `initial` (or a later snapshot of it) is done.
    pub async fn wait(
        &self,
        fetcher: &dyn OperationFetcher,
        initial: Operation,
    ) -> Result<Operation, EngineError> {
        if initial.done {
            return Ok(initial);
        }

        let name = initial.name;
        for attempt in 1..=self.max_attempts {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!(operation = %name, attempt, "Operation wait cancelled");
                    return Err(EngineError::Cancelled(name));
                }
                _ = tokio::time::sleep(self.interval) => {}
            }

            let operation = fetcher.fetch(&name).await?;
            if operation.done {
                debug!(operation = %name, attempt, "Operation completed");
                return Ok(operation);
            }
            trace!(operation = %name, attempt, "Operation still pending");
        }

        Err(EngineError::OperationTimedOut {
            operation: name,
            attempts: self.max_attempts,
        })
    }
}

/// Resolve the session id from a terminal operation.
///
/// Fallback chain, first non-empty match wins: a `sessionId`/`session_id`
/// field on the response, an `id` field on the response, then the path
/// segment after `sessions/` in the operation's own name.
pub fn extract_session_id(operation: &Operation) -> Option<String> {
    let from_response = |key: &str| {
        operation
            .response
            .as_ref()?
            .get(key)?
            .as_str()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    from_response("sessionId")
        .or_else(|| from_response("session_id"))
        .or_else(|| from_response("id"))
        .or_else(|| {
            let (_, rest) = operation.name.split_once("sessions/")?;
            let id = rest.split('/').next().unwrap_or_default();
            (!id.is_empty()).then(|| id.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Returns scripted operations in sequence, counting fetches.
    struct ScriptedFetcher {
        operations: Mutex<VecDeque<Operation>>,
        fetches: Mutex<u32>,
    }

    impl ScriptedFetcher {
        fn new(operations: Vec<Operation>) -> Self {
            Self {
                operations: Mutex::new(operations.into()),
                fetches: Mutex::new(0),
            }
        }

        fn fetches(&self) -> u32 {
            *self.fetches.lock().unwrap()
        }
    }

    #[async_trait]
    impl OperationFetcher for ScriptedFetcher {
        async fn fetch(&self, name: &str) -> Result<Operation, EngineError> {
            *self.fetches.lock().unwrap() += 1;
            self.operations
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| EngineError::Network(format!("fetcher exhausted for {name}")))
        }
    }

    fn pending(name: &str) -> Operation {
        Operation {
            name: name.into(),
            done: false,
            response: None,
        }
    }

    fn done_with(name: &str, response: serde_json::Value) -> Operation {
        Operation {
            name: name.into(),
            done: true,
            response: Some(response),
        }
    }

    const OP: &str = "projects/p/locations/l/reasoningEngines/9/operations/42";

    #[tokio::test(start_paused = true)]
    async fn done_on_nth_poll_means_n_fetches() {
        let fetcher = ScriptedFetcher::new(vec![
            pending(OP),
            pending(OP),
            done_with(OP, serde_json::json!({"sessionId": "s-1"})),
        ]);
        let poller = OperationPoller::new().with_max_attempts(10);

        let terminal = poller.wait(&fetcher, pending(OP)).await.unwrap();
        assert!(terminal.done);
        assert_eq!(fetcher.fetches(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn already_done_operation_skips_fetching() {
        let fetcher = ScriptedFetcher::new(vec![]);
        let poller = OperationPoller::new();

        let initial = done_with(OP, serde_json::json!({"id": "s-2"}));
        let terminal = poller.wait(&fetcher, initial).await.unwrap();
        assert_eq!(extract_session_id(&terminal).as_deref(), Some("s-2"));
        assert_eq!(fetcher.fetches(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn attempt_bound_yields_timeout() {
        let fetcher = ScriptedFetcher::new(vec![pending(OP), pending(OP), pending(OP)]);
        let poller = OperationPoller::new().with_max_attempts(3);

        let err = poller.wait(&fetcher, pending(OP)).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::OperationTimedOut { attempts: 3, .. }
        ));
        assert_eq!(fetcher.fetches(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_aborts_before_fetching() {
        let fetcher = ScriptedFetcher::new(vec![pending(OP)]);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let poller = OperationPoller::new().with_cancellation(cancel);

        let err = poller.wait(&fetcher, pending(OP)).await.unwrap_err();
        assert!(matches!(err, EngineError::Cancelled(_)));
        assert_eq!(fetcher.fetches(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_errors_propagate() {
        let fetcher = ScriptedFetcher::new(vec![]);
        let poller = OperationPoller::new().with_max_attempts(5);

        let err = poller.wait(&fetcher, pending(OP)).await.unwrap_err();
        assert!(matches!(err, EngineError::Network(_)));
    }

    #[test]
    fn extraction_prefers_session_id_field() {
        let op = done_with(
            OP,
            serde_json::json!({"sessionId": "from-field", "id": "ignored"}),
        );
        assert_eq!(extract_session_id(&op).as_deref(), Some("from-field"));
    }

    #[test]
    fn extraction_accepts_snake_case_session_id() {
        let op = done_with(OP, serde_json::json!({"session_id": "snake"}));
        assert_eq!(extract_session_id(&op).as_deref(), Some("snake"));
    }

    #[test]
    fn extraction_falls_back_to_id_field() {
        let op = done_with(OP, serde_json::json!({"id": "from-id"}));
        assert_eq!(extract_session_id(&op).as_deref(), Some("from-id"));
    }

    #[test]
    fn extraction_derives_from_operation_name() {
        let op = Operation {
            name: "projects/p/locations/l/reasoningEngines/9/sessions/4567/operations/1".into(),
            done: true,
            response: Some(serde_json::json!({})),
        };
        assert_eq!(extract_session_id(&op).as_deref(), Some("4567"));
    }

    #[test]
    fn extraction_skips_empty_fields() {
        let op = Operation {
            name: "engines/9/sessions/789".into(),
            done: true,
            response: Some(serde_json::json!({"sessionId": "", "id": ""})),
        };
        assert_eq!(extract_session_id(&op).as_deref(), Some("789"));
    }

    #[test]
    fn extraction_gives_up_without_any_source() {
        let op = done_with(OP, serde_json::json!({}));
        assert_eq!(extract_session_id(&op), None);
    }
}
