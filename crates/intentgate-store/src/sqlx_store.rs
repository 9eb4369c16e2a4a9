//! Postgres-backed Store Port, behind the `sqlx-backend` feature.
//!
//! Schema and transaction shape follow the same pattern as other
//! Postgres-backed append-only logs in this ecosystem: init-on-connect DDL,
//! `LOCK TABLE ... IN EXCLUSIVE MODE` to serialize the monotonic sequence
//! read-then-insert inside `append`, `JSONB` columns for free-form payloads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use intentgate_core::{
    Event, EventLog, EventQuery, EventType, Intent, IntentStatus, QueueLock, ReviewTask,
    SecurityFinding, WebhookDelivery,
};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Acquire, Row};

use crate::error::StoreError;
use crate::port::{IntentQuery, StorePort};

#[derive(Clone)]
pub struct SqlxStore {
    pool: PgPool,
}

impl SqlxStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        Self::connect_with_options(database_url, 10, 5).await
    }

    pub async fn connect_with_options(
        database_url: &str,
        max_connections: u32,
        connect_timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(std::time::Duration::from_secs(connect_timeout_secs))
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Fatal(format!("failed to connect postgres: {e}")))?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        let ddl = [
            r#"
            CREATE TABLE IF NOT EXISTS intentgate_events (
                event_id TEXT PRIMARY KEY,
                sequence BIGINT NOT NULL UNIQUE,
                trace_id TEXT NOT NULL,
                timestamp TIMESTAMPTZ NOT NULL,
                event_type TEXT NOT NULL,
                intent_id TEXT,
                agent_id TEXT,
                tenant_id TEXT,
                payload JSONB NOT NULL,
                evidence JSONB NOT NULL,
                previous_hash TEXT,
                hash TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS intentgate_intents (
                intent_id TEXT PRIMARY KEY,
                status TEXT NOT NULL,
                priority INT NOT NULL,
                tenant_id TEXT,
                created_at TIMESTAMPTZ NOT NULL,
                data JSONB NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS intentgate_queue_locks (
                name TEXT PRIMARY KEY,
                holder TEXT NOT NULL,
                acquired_at TIMESTAMPTZ NOT NULL,
                expires_at TIMESTAMPTZ NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS intentgate_webhook_deliveries (
                delivery_id TEXT PRIMARY KEY,
                received_at TIMESTAMPTZ NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS intentgate_review_tasks (
                task_id TEXT PRIMARY KEY,
                intent_id TEXT NOT NULL,
                data JSONB NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS intentgate_security_findings (
                finding_id TEXT PRIMARY KEY,
                intent_id TEXT,
                data JSONB NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS intentgate_chain_head (
                id INT PRIMARY KEY DEFAULT 1,
                hash TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS intentgate_baselines (
                question_id TEXT PRIMARY KEY,
                value DOUBLE PRECISION NOT NULL
            )
            "#,
        ];
        for stmt in ddl {
            sqlx::query(stmt)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Fatal(format!("schema init failed: {e}")))?;
        }
        Ok(())
    }
}

#[async_trait]
impl EventLog for SqlxStore {
    type Error = StoreError;

    /// Appends under `LOCK TABLE ... IN EXCLUSIVE MODE` so the monotonic
    /// `sequence` read-then-insert is never racing another writer; the audit
    /// chain crate computes `hash`/`previous_hash` and hands them back via
    /// `evidence` before this is called, so this method just persists them.
    async fn append(&self, event: Event) -> Result<String, Self::Error> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Transient(e.to_string()))?;
        let conn = tx
            .acquire()
            .await
            .map_err(|e| StoreError::Transient(e.to_string()))?;

        sqlx::query("LOCK TABLE intentgate_events IN EXCLUSIVE MODE")
            .execute(&mut *conn)
            .await
            .map_err(|e| StoreError::Transient(e.to_string()))?;

        let last = sqlx::query("SELECT sequence FROM intentgate_events ORDER BY sequence DESC LIMIT 1")
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| StoreError::Transient(e.to_string()))?;
        let sequence: i64 = match last {
            Some(row) => {
                let seq: i64 = row
                    .try_get("sequence")
                    .map_err(|e| StoreError::Fatal(e.to_string()))?;
                seq + 1
            }
            None => 1,
        };

        let payload = serde_json::Value::Object(event.payload.clone());
        let evidence = serde_json::Value::Object(event.evidence.clone());

        sqlx::query(
            r#"
            INSERT INTO intentgate_events
                (event_id, sequence, trace_id, timestamp, event_type, intent_id, agent_id, tenant_id, payload, evidence)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&event.id)
        .bind(sequence)
        .bind(&event.trace_id)
        .bind(event.timestamp)
        .bind(event.event_type.as_str())
        .bind(&event.intent_id)
        .bind(&event.agent_id)
        .bind(&event.tenant_id)
        .bind(payload)
        .bind(evidence)
        .execute(&mut *conn)
        .await
        .map_err(|e| StoreError::Transient(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Transient(e.to_string()))?;
        Ok(event.id)
    }

    async fn query(&self, query: EventQuery) -> Result<Vec<Event>, Self::Error> {
        let limit = query.limit.unwrap_or(1000) as i64;
        let rows = sqlx::query(
            r#"
            SELECT event_id, trace_id, timestamp, event_type, intent_id, agent_id, tenant_id, payload, evidence
              FROM intentgate_events
             WHERE ($1::TEXT IS NULL OR event_type = $1)
               AND ($2::TEXT IS NULL OR intent_id = $2)
               AND ($3::TEXT IS NULL OR tenant_id = $3)
             ORDER BY sequence DESC
             LIMIT $4
            "#,
        )
        .bind(query.event_type.map(|t| t.as_str().to_string()))
        .bind(query.intent_id.clone())
        .bind(query.tenant_id.clone())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Transient(e.to_string()))?;
        rows.into_iter().map(row_to_event).collect()
    }

    async fn latest_of(
        &self,
        event_type: EventType,
        intent_id: Option<&str>,
    ) -> Result<Option<Event>, Self::Error> {
        let row = sqlx::query(
            r#"
            SELECT event_id, trace_id, timestamp, event_type, intent_id, agent_id, tenant_id, payload, evidence
              FROM intentgate_events
             WHERE event_type = $1 AND ($2::TEXT IS NULL OR intent_id = $2)
             ORDER BY sequence DESC
             LIMIT 1
            "#,
        )
        .bind(event_type.as_str())
        .bind(intent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Transient(e.to_string()))?;
        row.map(row_to_event).transpose()
    }
}

fn row_to_event(row: sqlx::postgres::PgRow) -> Result<Event, StoreError> {
    let event_type_str: String = row
        .try_get("event_type")
        .map_err(|e| StoreError::Fatal(e.to_string()))?;
    let event_type = parse_event_type(&event_type_str)?;
    let payload: serde_json::Value = row
        .try_get("payload")
        .map_err(|e| StoreError::Fatal(e.to_string()))?;
    let evidence: serde_json::Value = row
        .try_get("evidence")
        .map_err(|e| StoreError::Fatal(e.to_string()))?;
    Ok(Event {
        id: row.try_get("event_id").map_err(|e| StoreError::Fatal(e.to_string()))?,
        trace_id: row.try_get("trace_id").map_err(|e| StoreError::Fatal(e.to_string()))?,
        timestamp: row.try_get("timestamp").map_err(|e| StoreError::Fatal(e.to_string()))?,
        event_type,
        intent_id: row.try_get("intent_id").map_err(|e| StoreError::Fatal(e.to_string()))?,
        agent_id: row.try_get("agent_id").map_err(|e| StoreError::Fatal(e.to_string()))?,
        tenant_id: row.try_get("tenant_id").map_err(|e| StoreError::Fatal(e.to_string()))?,
        payload: payload.as_object().cloned().unwrap_or_default(),
        evidence: evidence.as_object().cloned().unwrap_or_default(),
    })
}

fn parse_event_type(s: &str) -> Result<EventType, StoreError> {
    use EventType::*;
    Ok(match s {
        "INTENT_CREATED" => IntentCreated,
        "INTENT_VALIDATED" => IntentValidated,
        "INTENT_BLOCKED" => IntentBlocked,
        "INTENT_REQUEUED" => IntentRequeued,
        "INTENT_REJECTED" => IntentRejected,
        "INTENT_MERGED" => IntentMerged,
        "INTENT_MERGE_FAILED" => IntentMergeFailed,
        "INTENT_DEPENDENCY_BLOCKED" => IntentDependencyBlocked,
        "SIMULATION_COMPLETED" => SimulationCompleted,
        "CHECK_COMPLETED" => CheckCompleted,
        "RISK_EVALUATED" => RiskEvaluated,
        "RISK_LEVEL_RECLASSIFIED" => RiskLevelReclassified,
        "COHERENCE_EVALUATED" => CoherenceEvaluated,
        "COHERENCE_INCONSISTENCY" => CoherenceInconsistency,
        "COHERENCE_BASELINE_UPDATED" => CoherenceBaselineUpdated,
        "POLICY_EVALUATED" => PolicyEvaluated,
        "QUEUE_PROCESSED" => QueueProcessed,
        "SECURITY_SCAN_STARTED" => SecurityScanStarted,
        "SECURITY_SCAN_COMPLETED" => SecurityScanCompleted,
        "SECURITY_FINDING_DETECTED" => SecurityFindingDetected,
        "REVIEW_REQUESTED" => ReviewRequested,
        "REVIEW_ASSIGNED" => ReviewAssigned,
        "REVIEW_COMPLETED" => ReviewCompleted,
        "REVIEW_ESCALATED" => ReviewEscalated,
        "REVIEW_CANCELLED" => ReviewCancelled,
        "INTAKE_ACCEPTED" => IntakeAccepted,
        "INTAKE_THROTTLED" => IntakeThrottled,
        "INTAKE_REJECTED" => IntakeRejected,
        "INTAKE_MODE_CHANGED" => IntakeModeChanged,
        "VALIDATION_ERROR" => ValidationError,
        "CHAIN_VERIFIED" => ChainVerified,
        "CHAIN_TAMPERED" => ChainTampered,
        other => return Err(StoreError::Fatal(format!("unknown event_type: {other}"))),
    })
}

#[async_trait]
impl StorePort for SqlxStore {
    type Error = StoreError;

    async fn get_intent(&self, id: &str) -> Result<Option<Intent>, Self::Error> {
        let row = sqlx::query("SELECT data FROM intentgate_intents WHERE intent_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Transient(e.to_string()))?;
        row.map(|r| {
            let data: serde_json::Value = r.try_get("data").map_err(|e| StoreError::Fatal(e.to_string()))?;
            serde_json::from_value(data).map_err(|e| StoreError::Fatal(e.to_string()))
        })
        .transpose()
    }

    async fn put_intent(&self, intent: Intent) -> Result<(), Self::Error> {
        let data = serde_json::to_value(&intent).map_err(|e| StoreError::Fatal(e.to_string()))?;
        sqlx::query(
            r#"
            INSERT INTO intentgate_intents (intent_id, status, priority, tenant_id, created_at, data)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (intent_id) DO UPDATE SET
                status = EXCLUDED.status,
                priority = EXCLUDED.priority,
                tenant_id = EXCLUDED.tenant_id,
                data = EXCLUDED.data
            "#,
        )
        .bind(&intent.id)
        .bind(status_str(intent.status))
        .bind(intent.priority)
        .bind(&intent.tenant_id)
        .bind(intent.created_at)
        .bind(data)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Transient(e.to_string()))?;
        Ok(())
    }

    async fn list_intents(&self, query: IntentQuery) -> Result<Vec<Intent>, Self::Error> {
        let limit = query.limit.unwrap_or(1000) as i64;
        let rows = sqlx::query(
            r#"
            SELECT data FROM intentgate_intents
             WHERE ($1::TEXT IS NULL OR status = $1)
               AND ($2::TEXT IS NULL OR tenant_id = $2)
             ORDER BY priority ASC, created_at ASC
             LIMIT $3
            "#,
        )
        .bind(query.status.map(status_str))
        .bind(query.tenant_id.clone())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Transient(e.to_string()))?;
        rows.into_iter()
            .map(|r| {
                let data: serde_json::Value =
                    r.try_get("data").map_err(|e| StoreError::Fatal(e.to_string()))?;
                serde_json::from_value(data).map_err(|e| StoreError::Fatal(e.to_string()))
            })
            .collect()
    }

    async fn acquire_queue_lock(
        &self,
        name: &str,
        holder: &str,
    ) -> Result<Option<QueueLock>, Self::Error> {
        let now: DateTime<Utc> = Utc::now();
        let lock = QueueLock::new(name, holder);
        let result = sqlx::query(
            r#"
            INSERT INTO intentgate_queue_locks (name, holder, acquired_at, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO UPDATE SET
                holder = EXCLUDED.holder,
                acquired_at = EXCLUDED.acquired_at,
                expires_at = EXCLUDED.expires_at
            WHERE intentgate_queue_locks.expires_at < $5 OR intentgate_queue_locks.holder = $2
            "#,
        )
        .bind(name)
        .bind(holder)
        .bind(lock.acquired_at)
        .bind(lock.expires_at)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Transient(e.to_string()))?;
        Ok(if result.rows_affected() > 0 {
            Some(lock)
        } else {
            None
        })
    }

    async fn release_queue_lock(&self, name: &str, holder: &str) -> Result<bool, Self::Error> {
        let result = sqlx::query("DELETE FROM intentgate_queue_locks WHERE name = $1 AND holder = $2")
            .bind(name)
            .bind(holder)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Transient(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    async fn record_webhook_delivery(
        &self,
        delivery: WebhookDelivery,
    ) -> Result<bool, Self::Error> {
        let result = sqlx::query(
            "INSERT INTO intentgate_webhook_deliveries (delivery_id, received_at) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(&delivery.id)
        .bind(delivery.received_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Transient(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    async fn upsert_review_task(&self, task: ReviewTask) -> Result<(), Self::Error> {
        let data = serde_json::to_value(&task).map_err(|e| StoreError::Fatal(e.to_string()))?;
        sqlx::query(
            r#"
            INSERT INTO intentgate_review_tasks (task_id, intent_id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (task_id) DO UPDATE SET data = EXCLUDED.data
            "#,
        )
        .bind(&task.id)
        .bind(&task.intent_id)
        .bind(data)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Transient(e.to_string()))?;
        Ok(())
    }

    async fn list_review_tasks(&self, intent_id: &str) -> Result<Vec<ReviewTask>, Self::Error> {
        let rows = sqlx::query("SELECT data FROM intentgate_review_tasks WHERE intent_id = $1")
            .bind(intent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Transient(e.to_string()))?;
        rows.into_iter()
            .map(|r| {
                let data: serde_json::Value =
                    r.try_get("data").map_err(|e| StoreError::Fatal(e.to_string()))?;
                serde_json::from_value(data).map_err(|e| StoreError::Fatal(e.to_string()))
            })
            .collect()
    }

    async fn upsert_security_finding(&self, finding: SecurityFinding) -> Result<(), Self::Error> {
        let data = serde_json::to_value(&finding).map_err(|e| StoreError::Fatal(e.to_string()))?;
        sqlx::query(
            r#"
            INSERT INTO intentgate_security_findings (finding_id, intent_id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (finding_id) DO UPDATE SET data = EXCLUDED.data
            "#,
        )
        .bind(&finding.id)
        .bind(&finding.intent_id)
        .bind(data)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Transient(e.to_string()))?;
        Ok(())
    }

    async fn list_security_findings(
        &self,
        intent_id: &str,
    ) -> Result<Vec<SecurityFinding>, Self::Error> {
        let rows = sqlx::query("SELECT data FROM intentgate_security_findings WHERE intent_id = $1")
            .bind(intent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Transient(e.to_string()))?;
        rows.into_iter()
            .map(|r| {
                let data: serde_json::Value =
                    r.try_get("data").map_err(|e| StoreError::Fatal(e.to_string()))?;
                serde_json::from_value(data).map_err(|e| StoreError::Fatal(e.to_string()))
            })
            .collect()
    }

    async fn get_chain_head(&self) -> Result<Option<String>, Self::Error> {
        let row = sqlx::query("SELECT hash FROM intentgate_chain_head WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Transient(e.to_string()))?;
        row.map(|r| r.try_get("hash").map_err(|e| StoreError::Fatal(e.to_string())))
            .transpose()
    }

    async fn set_chain_head(&self, hash: String) -> Result<(), Self::Error> {
        sqlx::query(
            r#"
            INSERT INTO intentgate_chain_head (id, hash) VALUES (1, $1)
            ON CONFLICT (id) DO UPDATE SET hash = EXCLUDED.hash
            "#,
        )
        .bind(hash)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Transient(e.to_string()))?;
        Ok(())
    }

    async fn get_baseline(&self, question_id: &str) -> Result<Option<f64>, Self::Error> {
        let row = sqlx::query("SELECT value FROM intentgate_baselines WHERE question_id = $1")
            .bind(question_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Transient(e.to_string()))?;
        row.map(|r| r.try_get("value").map_err(|e| StoreError::Fatal(e.to_string())))
            .transpose()
    }

    async fn set_baseline(&self, question_id: &str, value: f64) -> Result<(), Self::Error> {
        sqlx::query(
            r#"
            INSERT INTO intentgate_baselines (question_id, value) VALUES ($1, $2)
            ON CONFLICT (question_id) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(question_id)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Transient(e.to_string()))?;
        Ok(())
    }
}

fn status_str(status: IntentStatus) -> &'static str {
    match status {
        IntentStatus::Draft => "DRAFT",
        IntentStatus::Ready => "READY",
        IntentStatus::Validated => "VALIDATED",
        IntentStatus::Queued => "QUEUED",
        IntentStatus::Merged => "MERGED",
        IntentStatus::Rejected => "REJECTED",
    }
}
