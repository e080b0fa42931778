//! Per-agent chat session tracking.
//!
//! The gateway keeps one session id per agent for the life of the process.
//! Ids are generated locally (the remote service accepts caller-chosen
//! session ids on the data plane), never expired, and never persisted —
//! restarting the process resets every conversation.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

/// Process-wide map from agent short id to a generated session id.
///
/// Thread-safe via `std::sync::Mutex` (non-async, held briefly). The entry
/// API makes insert-if-absent atomic, so concurrent first calls for the
/// same agent observe a single winner.
#[derive(Debug, Default)]
pub struct SessionMap {
    sessions: Mutex<HashMap<String, String>>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the session id for `agent_id`, generating and recording a
    /// fresh one on first use.
    pub fn get_or_create(&self, agent_id: &str) -> String {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions
            .entry(agent_id.to_string())
            .or_insert_with(|| Uuid::new_v4().to_string())
            .clone()
    }

    /// Number of agents with an active session.
    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
