//! skald server library logic.
//!
//! Assembles the HTTP/WebSocket surface around the conversation pipeline
//! and the streaming relay. Provider capabilities are negotiated once at
//! startup and injected through [`AppState`]; handlers never construct
//! provider adapters themselves.

pub mod api;
pub mod api_agent;
pub mod api_ws;
pub mod config;
pub mod fallback;
pub mod pipeline;
pub mod relay;
pub mod session;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use pipeline::AgentPipeline;
use serde_json::{json, Value};
use session::SessionStore;
use skald_voice::Capabilities;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Maximum request body size for JSON endpoints (1 MiB).
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Maximum request body size for audio uploads (25 MiB).
const MAX_AUDIO_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Negotiated provider capabilities.
    pub capabilities: Capabilities,
    /// Conversation history, keyed by session ID.
    pub sessions: Arc<SessionStore>,
    /// The one-shot conversation pipeline.
    pub pipeline: Arc<AgentPipeline>,
}

impl AppState {
    pub fn new(capabilities: Capabilities, sessions: Arc<SessionStore>) -> Self {
        let pipeline = Arc::new(AgentPipeline::new(&capabilities, sessions.clone()));
        Self {
            capabilities,
            sessions,
            pipeline,
        }
    }
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    // Audio upload routes need a larger body limit than the JSON surface.
    let audio_routes = Router::new()
        .route("/agent/chat/{sessionId}", post(api_agent::agent_chat_handler))
        .route("/transcribe/file", post(api::transcribe_file_handler))
        .route("/tts/echo", post(api::tts_echo_handler))
        .layer(DefaultBodyLimit::max(MAX_AUDIO_BODY_BYTES));

    Router::new()
        .route("/health", get(health))
        .route("/tts", post(api::tts_handler))
        .route("/llm/query", post(api::llm_query_handler))
        .merge(audio_routes)
        .route("/ws", get(api_ws::ws_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
