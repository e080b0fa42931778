//! Data-plane queries and streamed-response reassembly.
//!
//! `:streamQuery` answers with one JSON object per line. The protocol here
//! is deliberately forgiving: malformed lines are noise, not errors, and
//! only the last line carrying `output.text` decides the final answer.

use serde::Serialize;
use tracing::{debug, trace, warn};

use agentdeck_core::error::EngineError;
use agentdeck_core::resource::EngineName;

use crate::ReasoningEngineClient;

/// Returned when no stream line carried any text.
pub const NO_TEXT_FALLBACK: &str = "Agent processed the request but returned no parsable text.";

/// Body of a `:streamQuery` call. The wire keys are part of the protocol.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub message: String,
    pub user_id: String,
    pub session_id: String,
}

/// Reduce a newline-delimited JSON body to the final answer string.
///
/// Last text chunk wins; lines that fail to parse are skipped; a body with
/// no text at all yields [`NO_TEXT_FALLBACK`].
pub fn reassemble(body: &str) -> String {
    let mut last_text: Option<String> = None;
    for line in body.lines() {
        record_line(line, &mut last_text, |_| {});
    }
    last_text.unwrap_or_else(|| NO_TEXT_FALLBACK.to_string())
}

/// Parse one stream line and fold it into the running reduction.
/// `observe` sees every line that parses, text-bearing or not.
fn record_line<F>(line: &str, last_text: &mut Option<String>, mut observe: F)
where
    F: FnMut(&serde_json::Value),
{
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let chunk: serde_json::Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            trace!(error = %e, "Ignoring unparseable stream line");
            return;
        }
    };

    observe(&chunk);
    if let Some(text) = chunk_text(&chunk) {
        *last_text = Some(text.to_string());
    }
}

/// The text payload of one stream chunk, when the chunk carries an
/// object-valued `output` with a string `text` field.
fn chunk_text(chunk: &serde_json::Value) -> Option<&str> {
    chunk.get("output")?.as_object()?.get("text")?.as_str()
}

/// Best-effort extraction of a human-readable message from an error body,
/// expected shape `{"error": {"message": …}}`.
pub(crate) fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return "Could not parse error response from API.".into();
    };
    value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .unwrap_or("Unknown API error")
        .to_string()
}

impl ReasoningEngineClient {
    /// Send a query and reduce the streamed response to its final text.
    pub async fn stream_query(
        &self,
        engine: &EngineName,
        request: &QueryRequest,
    ) -> Result<String, EngineError> {
        self.stream_query_with(engine, request, |_| {}).await
    }

    /// Like [`stream_query`](Self::stream_query), but invokes `on_chunk`
    /// for every parsed line as it arrives, so callers can display
    /// intermediate chunks.
    pub async fn stream_query_with<F>(
        &self,
        engine: &EngineName,
        request: &QueryRequest,
        mut on_chunk: F,
    ) -> Result<String, EngineError>
    where
        F: FnMut(&serde_json::Value),
    {
        use futures::StreamExt;

        let url = format!("{}/v1/{}:streamQuery", self.base_url(), engine);
        debug!(engine = %engine.engine_id(), session = %request.session_id, "Sending streamQuery request");

        let response = self
            .http()
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header().await?)
            .json(request)
            .send()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;
        let response = Self::check_status(response).await?;

        let mut byte_stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut last_text: Option<String> = None;

        while let Some(chunk_result) = byte_stream.next().await {
            let bytes = chunk_result.map_err(|e| {
                warn!(error = %e, "streamQuery body interrupted");
                EngineError::Network(e.to_string())
            })?;
            buffer.push_str(&String::from_utf8_lossy(&bytes));

            while let Some(line_end) = buffer.find('\n') {
                let line = buffer[..line_end].trim_end_matches('\r').to_string();
                buffer = buffer[line_end + 1..].to_string();
                record_line(&line, &mut last_text, &mut on_chunk);
            }
        }

        // The last line is usually not newline-terminated.
        record_line(&buffer, &mut last_text, &mut on_chunk);

        Ok(last_text.unwrap_or_else(|| NO_TEXT_FALLBACK.to_string()))
    }
}
