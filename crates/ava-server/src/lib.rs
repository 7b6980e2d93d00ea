//! Ava server library logic.
//!
//! A thin HTTP service whose only job is to hand callers a signed LiveKit
//! credential for a fresh appointment room. Everything after that (media,
//! transcripts, tool-call events) flows through the room itself.

pub mod api;
pub mod api_token;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Extension, Json, Router,
};
use ava_voice::VoiceService;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Join-token signer.
    pub voice_service: VoiceService,
    /// Origins allowed by CORS. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl AppState {
    pub fn from_config(config: &config::Config) -> Self {
        Self {
            voice_service: VoiceService::new(config.livekit.clone()),
            cors_origins: config.cors.allowed_origins.clone(),
        }
    }
}

/// Maximum request body size. Token requests carry a single phone number.
const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(parsed))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route("/health", get(health))
        .route(ava_types::TOKEN_PATH, post(api_token::token_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(Arc::new(state)))
}
