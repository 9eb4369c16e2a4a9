//! Review task projection. Reviewer workflow itself is a thin external
//! consumer (out of core scope, §1); the core only needs to know whether an
//! Intent has pending or rejected review tasks (§4.10 queue pseudocode).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
    Escalated,
    Cancelled,
}

impl ReviewStatus {
    pub fn is_pending(self) -> bool {
        matches!(self, ReviewStatus::Pending | ReviewStatus::Escalated)
    }

    pub fn is_rejected(self) -> bool {
        matches!(self, ReviewStatus::Rejected)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewTask {
    pub id: String,
    pub intent_id: String,
    pub status: ReviewStatus,
    pub assignee: Option<String>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
