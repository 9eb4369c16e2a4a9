use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower::buffer::BufferLayer;
use tower::limit::RateLimitLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::trace::TraceLayer;

use crate::handlers::{create_intent, health, list_events, metrics, process_queue, validate_intent};
use crate::state::AppState;

/// Requests per rate-limit window (§4.9 is silent on ingress shaping; this
/// mirrors the teacher's default rather than inventing a new number).
const RATE_LIMIT_REQUESTS: u64 = 100;
const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/intents", post(create_intent))
        .route("/intents/{id}/validate", post(validate_intent))
        .route("/events", get(list_events))
        .route("/queue/process", post(process_queue))
        .layer(TraceLayer::new_for_http())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|err: BoxError| async move {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("unhandled internal error: {err}"),
                    )
                }))
                .layer(BufferLayer::new(1024))
                .layer(RateLimitLayer::new(RATE_LIMIT_REQUESTS, RATE_LIMIT_WINDOW)),
        )
        .layer(axum::middleware::from_fn(auth_middleware))
        .with_state(state)
}

/// Bearer-token auth stub (§9 is silent on transport auth; mirrors the
/// teacher's `auth_middleware`, which also only checks for a non-empty
/// token rather than validating against an identity provider).
async fn auth_middleware(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> Result<axum::response::Response, StatusCode> {
    let path = req.uri().path();
    if path == "/health" || path == "/metrics" {
        return Ok(next.run(req).await);
    }

    let auth_header = req.headers().get("Authorization").and_then(|h| h.to_str().ok());

    match auth_header {
        Some(auth) if auth.starts_with("Bearer ") || auth.starts_with("ApiKey ") => {
            let token = &auth[auth.find(' ').map(|i| i + 1).unwrap_or(auth.len())..];
            if token.is_empty() {
                return Err(StatusCode::UNAUTHORIZED);
            }
            Ok(next.run(req).await)
        }
        _ => {
            tracing::warn!(path, "unauthorized access attempt");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
