use std::sync::Arc;

use intentgate_orchestrator::OrchestratorContext;
use intentgate_queue::QueueConfig;

use crate::metrics::ServerMetrics;

/// Shared application state, cloned cheaply (everything behind an `Arc`)
/// into every request handler via Axum's `State` extractor.
pub struct AppState {
    pub ctx: Arc<OrchestratorContext>,
    pub queue_config: QueueConfig,
    pub metrics: Arc<ServerMetrics>,
}
