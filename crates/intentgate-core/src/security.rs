//! Normalized security finding model (§4.4 Scanner Port).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FindingCategory {
    Sast,
    Sca,
    Secrets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityFinding {
    pub id: String,
    pub scanner: String,
    pub category: FindingCategory,
    pub severity: Severity,
    pub file: String,
    pub line: Option<u32>,
    pub rule: String,
    pub evidence: String,
    pub confidence: f64,
    pub intent_id: Option<String>,
    pub tenant_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl SecurityFinding {
    /// Secrets findings are always `HIGH` severity, and their evidence is
    /// truncated to the rule name plus the first 8 bytes of the match
    /// (§4.4), never the full secret.
    pub fn redact_secret_evidence(rule: &str, raw_match: &[u8]) -> String {
        let sample: Vec<u8> = raw_match.iter().take(8).copied().collect();
        format!("{rule}:{}", hex_encode(&sample))
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
