//! In-memory reference implementation of [`EventLog`] and [`StorePort`].
//! Used by tests and by any deployment that doesn't need durability across
//! process restarts.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use intentgate_core::{
    Event, EventLog, EventQuery, EventType, Intent, QueueLock, ReviewTask, SecurityFinding,
    WebhookDelivery,
};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::port::{IntentQuery, StorePort};

#[derive(Default)]
struct State {
    events: Vec<Event>,
    intents: HashMap<String, Intent>,
    locks: HashMap<String, QueueLock>,
    webhook_deliveries: HashMap<String, WebhookDelivery>,
    review_tasks: HashMap<String, Vec<ReviewTask>>,
    security_findings: HashMap<String, Vec<SecurityFinding>>,
    chain_head: Option<String>,
    baselines: HashMap<String, f64>,
}

/// `parking_lot`-backed in-memory store. Cheap to clone via `Arc`, safe to
/// share across tokio tasks.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventLog for InMemoryStore {
    type Error = StoreError;

    async fn append(&self, event: Event) -> Result<String, Self::Error> {
        let id = event.id.clone();
        self.state.write().events.push(event);
        Ok(id)
    }

    async fn query(&self, query: EventQuery) -> Result<Vec<Event>, Self::Error> {
        let state = self.state.read();
        let mut matched: Vec<Event> = state
            .events
            .iter()
            .filter(|e| query.event_type.map_or(true, |t| e.event_type == t))
            .filter(|e| {
                query
                    .intent_id
                    .as_deref()
                    .map_or(true, |id| e.intent_id.as_deref() == Some(id))
            })
            .filter(|e| {
                query
                    .tenant_id
                    .as_deref()
                    .map_or(true, |id| e.tenant_id.as_deref() == Some(id))
            })
            .filter(|e| query.since.map_or(true, |since| e.timestamp >= since))
            .filter(|e| query.until.map_or(true, |until| e.timestamp <= until))
            .cloned()
            .collect();
        // §6 "Results are newest-first unless the implementation documents
        // otherwise" -- this implementation does not, so sort descending.
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }

    async fn latest_of(
        &self,
        event_type: EventType,
        intent_id: Option<&str>,
    ) -> Result<Option<Event>, Self::Error> {
        let state = self.state.read();
        let found = state
            .events
            .iter()
            .rev()
            .find(|e| {
                e.event_type == event_type
                    && intent_id.map_or(true, |id| e.intent_id.as_deref() == Some(id))
            })
            .cloned();
        Ok(found)
    }
}

#[async_trait]
impl StorePort for InMemoryStore {
    type Error = StoreError;

    async fn get_intent(&self, id: &str) -> Result<Option<Intent>, Self::Error> {
        Ok(self.state.read().intents.get(id).cloned())
    }

    async fn put_intent(&self, intent: Intent) -> Result<(), Self::Error> {
        self.state.write().intents.insert(intent.id.clone(), intent);
        Ok(())
    }

    async fn list_intents(&self, query: IntentQuery) -> Result<Vec<Intent>, Self::Error> {
        let state = self.state.read();
        let mut matched: Vec<Intent> = state
            .intents
            .values()
            .filter(|i| query.status.map_or(true, |s| i.status == s))
            .filter(|i| {
                query
                    .tenant_id
                    .as_deref()
                    .map_or(true, |t| i.tenant_id.as_deref() == Some(t))
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }

    async fn acquire_queue_lock(
        &self,
        name: &str,
        holder: &str,
    ) -> Result<Option<QueueLock>, Self::Error> {
        let mut state = self.state.write();
        let now = Utc::now();
        if let Some(existing) = state.locks.get(name) {
            if !existing.is_expired(now) && existing.holder != holder {
                return Ok(None);
            }
        }
        let lock = QueueLock::new(name, holder);
        state.locks.insert(name.to_string(), lock.clone());
        Ok(Some(lock))
    }

    async fn release_queue_lock(&self, name: &str, holder: &str) -> Result<bool, Self::Error> {
        let mut state = self.state.write();
        match state.locks.get(name) {
            Some(existing) if existing.holder == holder => {
                state.locks.remove(name);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn record_webhook_delivery(
        &self,
        delivery: WebhookDelivery,
    ) -> Result<bool, Self::Error> {
        let mut state = self.state.write();
        if state.webhook_deliveries.contains_key(&delivery.id) {
            return Ok(false);
        }
        state
            .webhook_deliveries
            .insert(delivery.id.clone(), delivery);
        Ok(true)
    }

    async fn upsert_review_task(&self, task: ReviewTask) -> Result<(), Self::Error> {
        let mut state = self.state.write();
        let tasks = state.review_tasks.entry(task.intent_id.clone()).or_default();
        if let Some(existing) = tasks.iter_mut().find(|t| t.id == task.id) {
            *existing = task;
        } else {
            tasks.push(task);
        }
        Ok(())
    }

    async fn list_review_tasks(&self, intent_id: &str) -> Result<Vec<ReviewTask>, Self::Error> {
        Ok(self
            .state
            .read()
            .review_tasks
            .get(intent_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn upsert_security_finding(&self, finding: SecurityFinding) -> Result<(), Self::Error> {
        let mut state = self.state.write();
        let key = finding.intent_id.clone().unwrap_or_default();
        let findings = state.security_findings.entry(key).or_default();
        if let Some(existing) = findings.iter_mut().find(|f| f.id == finding.id) {
            *existing = finding;
        } else {
            findings.push(finding);
        }
        Ok(())
    }

    async fn list_security_findings(
        &self,
        intent_id: &str,
    ) -> Result<Vec<SecurityFinding>, Self::Error> {
        Ok(self
            .state
            .read()
            .security_findings
            .get(intent_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_chain_head(&self) -> Result<Option<String>, Self::Error> {
        Ok(self.state.read().chain_head.clone())
    }

    async fn set_chain_head(&self, hash: String) -> Result<(), Self::Error> {
        self.state.write().chain_head = Some(hash);
        Ok(())
    }

    async fn get_baseline(&self, question_id: &str) -> Result<Option<f64>, Self::Error> {
        Ok(self.state.read().baselines.get(question_id).copied())
    }

    async fn set_baseline(&self, question_id: &str, value: f64) -> Result<(), Self::Error> {
        self.state
            .write()
            .baselines
            .insert(question_id.to_string(), value);
        Ok(())
    }
}

/// Helper retained for callers that want a fresh random id without pulling in
/// `uuid` directly.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use intentgate_core::{IntentStatus, OriginType, RiskLevel};

    fn sample_intent(id: &str, priority: i32) -> Intent {
        Intent {
            id: id.to_string(),
            source: "feature/x".into(),
            target: "main".into(),
            status: IntentStatus::Validated,
            risk_level: RiskLevel::Low,
            priority,
            origin_type: OriginType::Human,
            created_at: Utc::now(),
            created_by: "tester".into(),
            updated_at: Utc::now(),
            semantic: Default::default(),
            technical: Default::default(),
            checks_required: vec![],
            dependencies: vec![],
            retries: 0,
            tenant_id: None,
            plan_id: None,
        }
    }

    #[tokio::test]
    async fn list_intents_orders_by_priority_then_created_at() {
        let store = InMemoryStore::new();
        store.put_intent(sample_intent("b", 5)).await.unwrap();
        store.put_intent(sample_intent("a", 1)).await.unwrap();
        store.put_intent(sample_intent("c", 1)).await.unwrap();
        let listed = store
            .list_intents(IntentQuery::default().with_status(IntentStatus::Validated))
            .await
            .unwrap();
        assert_eq!(listed[0].priority, 1);
        assert_eq!(listed[2].id, "b");
    }

    #[tokio::test]
    async fn queue_lock_excludes_other_holders_until_expired() {
        let store = InMemoryStore::new();
        let first = store.acquire_queue_lock("queue", "worker-1").await.unwrap();
        assert!(first.is_some());
        let second = store.acquire_queue_lock("queue", "worker-2").await.unwrap();
        assert!(second.is_none());
        assert!(store.release_queue_lock("queue", "worker-1").await.unwrap());
        let third = store.acquire_queue_lock("queue", "worker-2").await.unwrap();
        assert!(third.is_some());
    }

    #[tokio::test]
    async fn webhook_delivery_dedup() {
        let store = InMemoryStore::new();
        let first = store
            .record_webhook_delivery(WebhookDelivery::new("delivery-1"))
            .await
            .unwrap();
        let second = store
            .record_webhook_delivery(WebhookDelivery::new("delivery-1"))
            .await
            .unwrap();
        assert!(first);
        assert!(!second);
    }
}
