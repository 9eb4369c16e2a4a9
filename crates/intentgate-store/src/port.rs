//! Store Port (§4.1, §6): the persistence seam every other crate talks to.
//! `intentgate-core` owns the data model; this crate owns how it is read back.

use async_trait::async_trait;
use intentgate_core::{Intent, IntentStatus, QueueLock, ReviewTask, SecurityFinding, WebhookDelivery};

use crate::error::StoreError;

/// Filter + ordering contract for [`StorePort::list_intents`]. The queue
/// processor's `list(status=VALIDATED, order by priority asc, created_at asc,
/// limit=N)` (§4.10) is the canonical caller; implementations always order by
/// `(priority asc, created_at asc)` regardless of filter.
#[derive(Debug, Clone, Default)]
pub struct IntentQuery {
    pub status: Option<IntentStatus>,
    pub tenant_id: Option<String>,
    pub limit: Option<usize>,
}

impl IntentQuery {
    pub fn with_status(mut self, status: IntentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Persistence seam for Intents, queue locks, webhook dedup, review tasks,
/// security findings, and the audit chain head. Implementations must be safe
/// to call from multiple concurrent orchestrator/queue workers.
#[async_trait]
pub trait StorePort: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn get_intent(&self, id: &str) -> Result<Option<Intent>, Self::Error>;

    /// Upsert by `id`.
    async fn put_intent(&self, intent: Intent) -> Result<(), Self::Error>;

    async fn list_intents(&self, query: IntentQuery) -> Result<Vec<Intent>, Self::Error>;

    /// Acquire the named advisory lock for `holder`. Returns `None` if a
    /// live (non-expired) lock is already held by someone else.
    async fn acquire_queue_lock(
        &self,
        name: &str,
        holder: &str,
    ) -> Result<Option<QueueLock>, Self::Error>;

    /// Release the named lock iff it is currently held by `holder`. Returns
    /// `false` if the lock was absent or held by someone else.
    async fn release_queue_lock(&self, name: &str, holder: &str) -> Result<bool, Self::Error>;

    /// Record a webhook delivery id. Returns `true` if this is the first time
    /// the id has been seen (caller should process it), `false` on replay.
    async fn record_webhook_delivery(
        &self,
        delivery: WebhookDelivery,
    ) -> Result<bool, Self::Error>;

    async fn upsert_review_task(&self, task: ReviewTask) -> Result<(), Self::Error>;

    async fn list_review_tasks(&self, intent_id: &str) -> Result<Vec<ReviewTask>, Self::Error>;

    async fn upsert_security_finding(&self, finding: SecurityFinding) -> Result<(), Self::Error>;

    async fn list_security_findings(
        &self,
        intent_id: &str,
    ) -> Result<Vec<SecurityFinding>, Self::Error>;

    /// Latest audit-chain hash, or `None` before the first entry is appended.
    async fn get_chain_head(&self) -> Result<Option<String>, Self::Error>;

    async fn set_chain_head(&self, hash: String) -> Result<(), Self::Error>;

    /// Last recorded coherence baseline value for a probe question, keyed by
    /// `question_id` (§4.7 "baselines are the latest accepted evaluation").
    async fn get_baseline(&self, question_id: &str) -> Result<Option<f64>, Self::Error>;

    async fn set_baseline(&self, question_id: &str, value: f64) -> Result<(), Self::Error>;
}
