//! HTTP gateway for Agentdeck.
//!
//! Exposes the agent catalog and a chat relay over REST, serves the
//! embedded frontend, and keeps one session id per agent for the life of
//! the process.
//!
//! Built on Axum; every request is relayed to the remote reasoning-engine
//! service, so the gateway itself holds no conversation state beyond the
//! session map.

pub mod frontend;

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use agentdeck_config::AppConfig;
use agentdeck_core::agent::{AgentDetails, AgentSummary};
use agentdeck_core::error::EngineError;
use agentdeck_core::resource::EngineName;
use agentdeck_core::session::SessionMap;
use agentdeck_engine::{QueryRequest, ReasoningEngineClient};

/// Shared application state for the gateway.
pub struct AppState {
    pub config: AppConfig,
    pub engine: ReasoningEngineClient,
    pub sessions: SessionMap,
}

pub type SharedState = Arc<AppState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    let port = state.config.gateway.port;

    // CORS: only allow same-origin by default; the embedded frontend is
    // served from this process, so nothing wider is needed.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::exact(
            format!("http://localhost:{port}").parse().unwrap(),
        ))
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/agents", get(list_agents_handler))
        .route("/api/agent/{agent_id}", get(agent_details_handler))
        .route("/api/chat", post(chat_handler))
        .with_state(state)
        .merge(frontend::frontend_router())
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let tokens = agentdeck_engine::auth::provider_from_config(&config.auth);
    let engine = ReasoningEngineClient::new(&config.location, tokens);
    let state = Arc::new(AppState {
        engine,
        sessions: SessionMap::new(),
        config,
    });

    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ── Error mapping ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map an upstream failure to a caller-facing response.
///
/// API errors keep their extracted message (the caller asked the remote
/// service to do something and deserves to know why it refused); anything
/// else is logged in full and reported generically.
fn engine_error_response(e: EngineError) -> ApiError {
    match e {
        EngineError::Api { status, message } => {
            error!(status, message = %message, "Upstream API error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("API Error: {message}"),
                }),
            )
        }
        other => {
            error!(error = %other, "Unexpected error handling request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "An internal server error occurred.".into(),
                }),
            )
        }
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_agents_handler(
    State(state): State<SharedState>,
) -> Result<Json<Vec<AgentSummary>>, ApiError> {
    state
        .engine
        .list_agents(&state.config.project, &state.config.location)
        .await
        .map(Json)
        .map_err(engine_error_response)
}

async fn agent_details_handler(
    State(state): State<SharedState>,
    Path(agent_id): Path<String>,
) -> Result<Json<AgentDetails>, ApiError> {
    let engine = EngineName::new(&state.config.project, &state.config.location, &agent_id)
        .map_err(|e| bad_request(e.to_string()))?;

    state
        .engine
        .get_agent(&engine)
        .await
        .map(Json)
        .map_err(engine_error_response)
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    agent_full_name: String,
    #[serde(default)]
    prompt: String,
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if payload.agent_full_name.is_empty() || payload.prompt.is_empty() {
        return Err(bad_request("agent_full_name and prompt are required"));
    }

    let engine: EngineName = payload
        .agent_full_name
        .parse()
        .map_err(|e: EngineError| bad_request(e.to_string()))?;

    let session_id = state.sessions.get_or_create(engine.engine_id());
    info!(agent = %engine.engine_id(), session = %session_id, "Relaying chat prompt");

    let request = QueryRequest {
        message: payload.prompt,
        user_id: state.config.gateway.user_id.clone(),
        session_id,
    };

    let text = state
        .engine
        .stream_query(&engine, &request)
        .await
        .map_err(engine_error_response)?;

    Ok(Json(ChatResponse { response: text }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use agentdeck_engine::auth::StaticTokenProvider;

    fn test_state() -> SharedState {
        let config = AppConfig {
            project: "demo-project".into(),
            location: "us-central1".into(),
            ..AppConfig::default()
        };
        let engine = ReasoningEngineClient::new(
            &config.location,
            Arc::new(StaticTokenProvider::new("test-token")),
        );
        Arc::new(AppState {
            engine,
            sessions: SessionMap::new(),
            config,
        })
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8_lossy(&bytes).to_string()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = build_router(test_state());

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn chat_rejects_missing_fields() {
        let app = build_router(test_state());

        let req = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"prompt": "hello"}"#))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("required"));
    }

    #[tokio::test]
    async fn chat_rejects_malformed_agent_name() {
        let app = build_router(test_state());

        let req = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"agent_full_name": "not-a-resource-path", "prompt": "hello"}"#,
            ))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("Invalid resource name"));
    }

    #[tokio::test]
    async fn chat_reuses_session_for_same_agent() {
        let state = test_state();
        let first = state.sessions.get_or_create("engine-1");
        let second = state.sessions.get_or_create("engine-1");
        assert_eq!(first, second);
    }

    #[test]
    fn upstream_api_error_surfaces_message_with_500() {
        let (status, Json(body)) = engine_error_response(EngineError::Api {
            status: 429,
            message: "rate limited".into(),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.error.contains("rate limited"));
    }

    #[test]
    fn unexpected_error_is_reported_generically() {
        let (status, Json(body)) =
            engine_error_response(EngineError::Network("connection reset".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "An internal server error occurred.");
        assert!(!body.error.contains("connection reset"));
    }
}
