//! `agentdeck probe` — Exercise the remote session/query API directly.
//!
//! Creates a session through the long-running-operation flow (falling back
//! to no session when that fails), then sends one query and prints each
//! stream chunk as it arrives.

use agentdeck_config::AppConfig;
use agentdeck_core::resource::EngineName;
use agentdeck_engine::auth::provider_from_config;
use agentdeck_engine::{OperationPoller, QueryRequest, ReasoningEngineClient};

const DEFAULT_MESSAGE: &str = "What can you do?";

pub async fn run(
    engine_override: Option<String>,
    message: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let engine_arg = engine_override
        .or_else(|| config.probe.engine.clone())
        .ok_or("No engine selected — pass --engine or set probe.engine in config.toml")?;

    // Accept either a full resource name or a bare engine id.
    let engine: EngineName = if engine_arg.contains('/') {
        engine_arg.parse()?
    } else {
        EngineName::new(&config.project, &config.location, &engine_arg)?
    };

    let tokens = provider_from_config(&config.auth);
    let client = ReasoningEngineClient::new(&config.location, tokens);
    let poller = OperationPoller::from_config(&config.poll);

    println!("🔎 Probing {engine}");

    let session_id = client
        .create_session_or_fallback(&engine, &config.gateway.user_id, &poller)
        .await
        .unwrap_or_default();
    if session_id.is_empty() {
        println!("   No session — querying without one");
    } else {
        println!("   Session: {session_id}");
    }

    let request = QueryRequest {
        message: message.unwrap_or_else(|| DEFAULT_MESSAGE.into()),
        user_id: config.gateway.user_id.clone(),
        session_id,
    };

    println!("   Query: {}", request.message);
    let text = client
        .stream_query_with(&engine, &request, |chunk| {
            println!("   chunk: {chunk}");
        })
        .await?;

    println!("\n{text}");

    Ok(())
}
