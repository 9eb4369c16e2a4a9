//! Ambient intake-side entities the distilled spec is silent on but a
//! complete system carries: webhook delivery dedup and intake-pressure mode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Dedup record for one externally-delivered webhook, keyed by the sender's
/// delivery id (§5 "webhook ingestion is concurrent and idempotent").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookDelivery {
    pub id: String,
    pub received_at: DateTime<Utc>,
}

impl WebhookDelivery {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            received_at: Utc::now(),
        }
    }
}

/// Intake pressure mode the caller (rate limiter / ops) can set; the queue
/// processor consults it but does not own its semantics (§4.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntakeMode {
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "THROTTLE")]
    Throttle,
    #[serde(rename = "PAUSE-CRITICAL-ONLY")]
    PauseCriticalOnly,
}

impl Default for IntakeMode {
    fn default() -> Self {
        IntakeMode::Open
    }
}
