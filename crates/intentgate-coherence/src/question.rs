//! Coherence questions (§4.7, §6 "Coherence harness file"): a configured
//! probe command plus a baseline-relative assertion.

use serde::{Deserialize, Serialize};

/// Severity used to weight a failed question into the coherence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestionSeverity {
    Critical,
    High,
    Medium,
}

impl QuestionSeverity {
    /// §4.7 "weights {CRITICAL:30, HIGH:20, MEDIUM:10}".
    pub fn weight(self) -> f64 {
        match self {
            QuestionSeverity::Critical => 30.0,
            QuestionSeverity::High => 20.0,
            QuestionSeverity::Medium => 10.0,
        }
    }
}

/// One configured probe. `check` is the command line to run; `assertion` is
/// parsed by [`crate::expr`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    pub check: String,
    pub assertion: String,
    pub severity: QuestionSeverity,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// §6 "Coherence harness file (JSON)": `{version, questions: [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    pub version: u32,
    pub questions: Vec<Question>,
}

impl HarnessConfig {
    pub fn from_json(raw: &str) -> Result<Self, crate::error::CoherenceError> {
        serde_json::from_str(raw)
            .map_err(|e| crate::error::CoherenceError::InvalidAssertion("<config>".into(), e.to_string()))
    }

    pub fn enabled_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| q.enabled)
    }
}
