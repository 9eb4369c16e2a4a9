use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use intentgate_core::{EventLog, EventQuery, Intent, IntentStatus, OriginType, RiskLevel, Technical};
use intentgate_orchestrator::{validate, PipelineOutcome};
use intentgate_queue::process_once;
use intentgate_store::StorePort;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;

fn default_priority() -> i32 {
    intentgate_core::DEFAULT_PRIORITY
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4")],
        state.metrics.export_prometheus(),
    )
        .into_response()
}

/// Request body for `POST /intents`. Mirrors the caller-supplied fields of
/// [`Intent`]; everything else (`id`, timestamps, `status`, `retries`) is
/// assigned server-side.
#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    #[serde(default = "default_priority")]
    pub priority: i32,
    pub origin_type: OriginType,
    pub created_by: String,
    #[serde(default)]
    pub semantic: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub technical: Technical,
    #[serde(default)]
    pub checks_required: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub plan_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("store failure: {0}")]
    Store(String),
    #[error("pipeline failure: {0}")]
    Pipeline(String),
    #[error("not found: {0}")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

pub async fn create_intent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateIntentRequest>,
) -> Result<Json<Intent>, ApiError> {
    let now = Utc::now();
    let intent = Intent {
        id: Uuid::new_v4().to_string(),
        source: req.source,
        target: req.target,
        status: IntentStatus::Ready,
        risk_level: req.risk_level.unwrap_or(RiskLevel::Low),
        priority: req.priority,
        origin_type: req.origin_type,
        created_at: now,
        created_by: req.created_by,
        updated_at: now,
        semantic: req.semantic,
        technical: req.technical,
        checks_required: req.checks_required,
        dependencies: req.dependencies,
        retries: 0,
        tenant_id: req.tenant_id,
        plan_id: req.plan_id,
    };

    state
        .ctx
        .store
        .put_intent(intent.clone())
        .await
        .map_err(|e| ApiError::Store(e.to_string()))?;

    Ok(Json(intent))
}

pub async fn validate_intent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PipelineOutcome>, ApiError> {
    let mut intent = state
        .ctx
        .store
        .get_intent(&id)
        .await
        .map_err(|e| ApiError::Store(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(id.clone()))?;

    let outcome = validate(&mut intent, &state.ctx)
        .await
        .map_err(|e| ApiError::Pipeline(e.to_string()))?;

    match &outcome {
        PipelineOutcome::Validated(_) => state.metrics.record_validated(),
        PipelineOutcome::Blocked { .. } => state.metrics.record_blocked(),
    }

    state
        .ctx
        .store
        .put_intent(intent)
        .await
        .map_err(|e| ApiError::Store(e.to_string()))?;

    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct EventsQueryParams {
    pub intent_id: Option<String>,
    pub tenant_id: Option<String>,
    pub limit: Option<usize>,
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventsQueryParams>,
) -> Result<Json<Vec<intentgate_core::Event>>, ApiError> {
    let mut query = EventQuery::new();
    if let Some(intent_id) = params.intent_id {
        query = query.for_intent(intent_id);
    }
    if let Some(tenant_id) = params.tenant_id {
        query = query.for_tenant(tenant_id);
    }
    if let Some(limit) = params.limit {
        query = query.with_limit(limit);
    }

    let events = state
        .ctx
        .store
        .query(query)
        .await
        .map_err(|e| ApiError::Store(e.to_string()))?;

    Ok(Json(events))
}

/// `POST /queue/process`: run one queue processor pass on demand, outside
/// whatever cron or worker loop normally drives it.
pub async fn process_queue(
    State(state): State<Arc<AppState>>,
) -> Result<Json<intentgate_queue::QueueRunSummary>, ApiError> {
    let started = Instant::now();
    let summary = process_once(&state.ctx, &state.queue_config)
        .await
        .map_err(|e| ApiError::Pipeline(e.to_string()))?
        .unwrap_or_default();
    state.metrics.record_queue_run(started.elapsed());
    state.metrics.record_merged_n(summary.merged);
    Ok(Json(summary))
}
