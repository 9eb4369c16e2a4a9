//! Event Log contract (§4.1). The concrete backend (in-memory for tests,
//! sqlx-backed for production) lives in `intentgate-store`; this crate only
//! states the port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::event::{Event, EventType};

/// Filter for `EventLog::query`. All fields are optional narrowing filters;
/// `limit` bounds the result size. Results are newest-first unless the
/// implementation documents otherwise.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub event_type: Option<EventType>,
    pub intent_id: Option<String>,
    pub tenant_id: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl EventQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of_type(mut self, t: EventType) -> Self {
        self.event_type = Some(t);
        self
    }

    pub fn for_intent(mut self, id: impl Into<String>) -> Self {
        self.intent_id = Some(id.into());
        self
    }

    pub fn for_tenant(mut self, id: impl Into<String>) -> Self {
        self.tenant_id = Some(id.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Append-only, ordered event store with a materialized Intent projection.
///
/// Implementations must serialize concurrent `append` calls so that events
/// sharing a `trace_id` remain contiguous in retrieval order (§4.1
/// "Guarantees"), and `materialize` must be idempotent under replay (P4).
#[async_trait]
pub trait EventLog: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Append an event atomically, returning its assigned id.
    async fn append(&self, event: Event) -> Result<String, Self::Error>;

    /// Ordered query over the log.
    async fn query(&self, query: EventQuery) -> Result<Vec<Event>, Self::Error>;

    /// Most recent event of `event_type`, optionally scoped to one Intent.
    async fn latest_of(
        &self,
        event_type: EventType,
        intent_id: Option<&str>,
    ) -> Result<Option<Event>, Self::Error>;
}
