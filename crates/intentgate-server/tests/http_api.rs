//! Integration tests driving the HTTP surface end-to-end via `tower::oneshot`,
//! without binding a real socket.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use intentgate_checks::MockCheckRunner;
use intentgate_coherence::{HarnessConfig, MockProbeRunner};
use intentgate_core::{Event, EventType};
use intentgate_orchestrator::{OrchestratorContext, PipelineOutcome};
use intentgate_policy::PolicyConfig;
use intentgate_queue::QueueConfig;
use intentgate_risk::RiskConfig;
use intentgate_scm::MockScm;
use intentgate_server::{build_router, AppState, ServerMetrics};
use intentgate_store::{EventLog, InMemoryStore};
use serde_json::json;
use tower::ServiceExt;

fn empty_harness() -> HarnessConfig {
    HarnessConfig {
        version: 1,
        questions: Vec::new(),
    }
}

fn test_state() -> Arc<AppState> {
    let checks = Arc::new(MockCheckRunner::new());
    checks.register("lint");

    let ctx = Arc::new(OrchestratorContext {
        store: Arc::new(InMemoryStore::new()),
        scm: Arc::new(MockScm::new()),
        checks,
        scanners: Vec::new(),
        probes: Arc::new(MockProbeRunner::new()),
        risk_config: RiskConfig::default(),
        policy: PolicyConfig::default(),
        harness_config: empty_harness(),
        auto_classify: true,
        auto_confirm: true,
    });

    Arc::new(AppState {
        ctx,
        queue_config: QueueConfig::default(),
        metrics: Arc::new(ServerMetrics::new()),
    })
}

fn authed(builder: axum::http::request::Builder) -> axum::http::request::Builder {
    builder.header("Authorization", "Bearer test-token")
}

#[tokio::test]
async fn health_does_not_require_auth() {
    let app = build_router(test_state());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unauthenticated_request_is_rejected() {
    let app = build_router(test_state());
    let response = app
        .oneshot(Request::builder().uri("/events").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_then_validate_intent_round_trips_through_http() {
    let state = test_state();
    let app = build_router(state.clone());

    let create_body = json!({
        "source": "feature/demo",
        "target": "main",
        "origin_type": "human",
        "created_by": "tester",
        "technical": {"scope_hint": ["auth"]},
        "checks_required": ["lint"],
    });
    let create_response = app
        .clone()
        .oneshot(
            authed(Request::builder().method("POST").uri("/intents").header("content-type", "application/json"))
                .body(Body::from(create_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(create_response.status(), StatusCode::OK);
    let bytes = to_bytes(create_response.into_body(), usize::MAX).await.unwrap();
    let created: intentgate_core::Intent = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(created.status, intentgate_core::IntentStatus::Ready);

    let validate_uri = format!("/intents/{}/validate", created.id);
    let validate_response = app
        .oneshot(authed(Request::builder().method("POST").uri(validate_uri)).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(validate_response.status(), StatusCode::OK);
    let bytes = to_bytes(validate_response.into_body(), usize::MAX).await.unwrap();
    let outcome: PipelineOutcome = serde_json::from_slice(&bytes).unwrap();
    assert!(matches!(outcome, PipelineOutcome::Validated(_)));

    let events: Vec<Event> = state.ctx.store.query(Default::default()).await.unwrap();
    assert!(events.iter().any(|e| e.event_type == EventType::IntentValidated));
}

#[tokio::test]
async fn validating_an_unknown_intent_returns_not_found() {
    let app = build_router(test_state());
    let response = app
        .oneshot(
            authed(Request::builder().method("POST").uri("/intents/does-not-exist/validate"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_endpoint_reports_recorded_counters() {
    let state = test_state();
    let app = build_router(state.clone());

    let create_body = json!({
        "source": "feature/demo",
        "target": "main",
        "origin_type": "human",
        "created_by": "tester",
        "checks_required": ["lint"],
    });
    let create_response = app
        .clone()
        .oneshot(
            authed(Request::builder().method("POST").uri("/intents").header("content-type", "application/json"))
                .body(Body::from(create_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = to_bytes(create_response.into_body(), usize::MAX).await.unwrap();
    let created: intentgate_core::Intent = serde_json::from_slice(&bytes).unwrap();

    let validate_uri = format!("/intents/{}/validate", created.id);
    app.clone()
        .oneshot(authed(Request::builder().method("POST").uri(validate_uri)).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let metrics_response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(metrics_response.status(), StatusCode::OK);
    let bytes = to_bytes(metrics_response.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(body.contains("intentgate_intents_validated_total 1"));
}

