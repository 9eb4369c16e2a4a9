//! Intentgate HTTP server binary. Wires the store and policy/risk/coherence
//! config into one [`OrchestratorContext`] and serves it over HTTP. An
//! ambient consumer, not where any decision logic lives; see
//! `intentgate-orchestrator` and `intentgate-queue` for that.

use std::collections::HashMap;
use std::sync::Arc;

use intentgate_checks::ProcessCheckRunner;
use intentgate_coherence::{HarnessConfig, MockProbeRunner};
use intentgate_orchestrator::OrchestratorContext;
use intentgate_policy::PolicyConfig;
use intentgate_queue::QueueConfig;
use intentgate_risk::RiskConfig;
use intentgate_scm::MockScm;
use intentgate_server::{build_router, AppState, ServerMetrics};
use intentgate_store::InMemoryStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let policy = PolicyConfig::load(None).unwrap_or_else(|err| {
        tracing::warn!(%err, "no policy config found, falling back to defaults");
        PolicyConfig::default()
    });
    let harness_config = HarnessConfig {
        version: 1,
        questions: Vec::new(),
    };

    // The SCM, scanner, and probe ports have no environment-specific
    // production adapter in this workspace yet; deployments wire a real
    // `ScmPort`/`ScannerPort`/`ProbePort` impl in. Mocks keep the server
    // runnable out of the box.
    let ctx = Arc::new(OrchestratorContext {
        store: Arc::new(InMemoryStore::new()),
        scm: Arc::new(MockScm::new()),
        checks: Arc::new(ProcessCheckRunner::new(HashMap::new())),
        scanners: Vec::new(),
        probes: Arc::new(MockProbeRunner::new()),
        risk_config: RiskConfig::default(),
        policy,
        harness_config,
        auto_classify: true,
        auto_confirm: std::env::var("INTENTGATE_AUTO_CONFIRM").is_ok(),
    });

    let state = Arc::new(AppState {
        ctx,
        queue_config: QueueConfig::default(),
        metrics: Arc::new(ServerMetrics::new()),
    });

    let app = build_router(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    tracing::info!(%addr, "intentgate server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
