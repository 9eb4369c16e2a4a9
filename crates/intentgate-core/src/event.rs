//! Event: the immutable, append-only record every decision is built from.
//!
//! See spec §3 "Event" and §6 "Event log (stable contract)" for the closed
//! `event_type` vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Closed vocabulary of event types. Ordering here is purely declarative;
/// no code should depend on discriminant values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    IntentCreated,
    IntentValidated,
    IntentBlocked,
    IntentRequeued,
    IntentRejected,
    IntentMerged,
    IntentMergeFailed,
    IntentDependencyBlocked,
    SimulationCompleted,
    CheckCompleted,
    RiskEvaluated,
    RiskLevelReclassified,
    CoherenceEvaluated,
    CoherenceInconsistency,
    CoherenceBaselineUpdated,
    PolicyEvaluated,
    QueueProcessed,
    SecurityScanStarted,
    SecurityScanCompleted,
    SecurityFindingDetected,
    ReviewRequested,
    ReviewAssigned,
    ReviewCompleted,
    ReviewEscalated,
    ReviewCancelled,
    IntakeAccepted,
    IntakeThrottled,
    IntakeRejected,
    IntakeModeChanged,
    ValidationError,
    ChainVerified,
    ChainTampered,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::IntentCreated => "INTENT_CREATED",
            EventType::IntentValidated => "INTENT_VALIDATED",
            EventType::IntentBlocked => "INTENT_BLOCKED",
            EventType::IntentRequeued => "INTENT_REQUEUED",
            EventType::IntentRejected => "INTENT_REJECTED",
            EventType::IntentMerged => "INTENT_MERGED",
            EventType::IntentMergeFailed => "INTENT_MERGE_FAILED",
            EventType::IntentDependencyBlocked => "INTENT_DEPENDENCY_BLOCKED",
            EventType::SimulationCompleted => "SIMULATION_COMPLETED",
            EventType::CheckCompleted => "CHECK_COMPLETED",
            EventType::RiskEvaluated => "RISK_EVALUATED",
            EventType::RiskLevelReclassified => "RISK_LEVEL_RECLASSIFIED",
            EventType::CoherenceEvaluated => "COHERENCE_EVALUATED",
            EventType::CoherenceInconsistency => "COHERENCE_INCONSISTENCY",
            EventType::CoherenceBaselineUpdated => "COHERENCE_BASELINE_UPDATED",
            EventType::PolicyEvaluated => "POLICY_EVALUATED",
            EventType::QueueProcessed => "QUEUE_PROCESSED",
            EventType::SecurityScanStarted => "SECURITY_SCAN_STARTED",
            EventType::SecurityScanCompleted => "SECURITY_SCAN_COMPLETED",
            EventType::SecurityFindingDetected => "SECURITY_FINDING_DETECTED",
            EventType::ReviewRequested => "REVIEW_REQUESTED",
            EventType::ReviewAssigned => "REVIEW_ASSIGNED",
            EventType::ReviewCompleted => "REVIEW_COMPLETED",
            EventType::ReviewEscalated => "REVIEW_ESCALATED",
            EventType::ReviewCancelled => "REVIEW_CANCELLED",
            EventType::IntakeAccepted => "INTAKE_ACCEPTED",
            EventType::IntakeThrottled => "INTAKE_THROTTLED",
            EventType::IntakeRejected => "INTAKE_REJECTED",
            EventType::IntakeModeChanged => "INTAKE_MODE_CHANGED",
            EventType::ValidationError => "VALIDATION_ERROR",
            EventType::ChainVerified => "CHAIN_VERIFIED",
            EventType::ChainTampered => "CHAIN_TAMPERED",
        }
    }
}

/// An immutable event. Never mutated or deleted in place; retention pruning
/// is the only sanctioned bulk removal (out of core scope).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub trace_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: EventType,
    #[serde(default)]
    pub intent_id: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub payload: Map<String, Value>,
    #[serde(default)]
    pub evidence: Map<String, Value>,
}

impl Event {
    /// Build a new event with a fresh id, stamped `now`.
    pub fn new(
        trace_id: impl Into<String>,
        event_type: EventType,
        intent_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            trace_id: trace_id.into(),
            timestamp: Utc::now(),
            event_type,
            intent_id,
            agent_id: None,
            tenant_id: None,
            payload: Map::new(),
            evidence: Map::new(),
        }
    }

    pub fn with_payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_evidence(mut self, evidence: Map<String, Value>) -> Self {
        self.evidence = evidence;
        self
    }

    pub fn with_tenant(mut self, tenant_id: Option<String>) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    pub fn with_agent(mut self, agent_id: Option<String>) -> Self {
        self.agent_id = agent_id;
        self
    }
}
