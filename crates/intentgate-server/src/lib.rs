//! Thin HTTP surface over the orchestrator and queue processor (§9
//! "ambient, not core"): a consumer of `intentgate-orchestrator` and
//! `intentgate-queue`, not a place new decision logic belongs. Grounded on
//! `packages/gate/src/bin/server.rs`'s router/middleware shape.

pub mod handlers;
pub mod metrics;
pub mod router;
pub mod state;

pub use metrics::ServerMetrics;
pub use router::build_router;
pub use state::AppState;
