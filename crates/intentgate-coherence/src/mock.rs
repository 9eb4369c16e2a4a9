use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::CoherenceError;
use crate::probe::ProbePort;

/// Scripted probe results for tests, keyed by question id.
#[derive(Default)]
pub struct MockProbeRunner {
    results: RwLock<HashMap<String, f64>>,
    failures: RwLock<HashMap<String, CoherenceErrorKind>>,
}

#[derive(Clone, Copy)]
enum CoherenceErrorKind {
    Timeout,
}

impl MockProbeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_result(&self, question_id: &str, value: f64) {
        self.results.write().insert(question_id.to_string(), value);
    }

    pub fn set_timeout(&self, question_id: &str) {
        self.failures
            .write()
            .insert(question_id.to_string(), CoherenceErrorKind::Timeout);
    }
}

#[async_trait]
impl ProbePort for MockProbeRunner {
    async fn run(&self, question_id: &str, _check: &str) -> Result<f64, CoherenceError> {
        if self.failures.read().contains_key(question_id) {
            return Err(CoherenceError::ProbeTimeout(question_id.to_string()));
        }
        self.results
            .read()
            .get(question_id)
            .copied()
            .ok_or_else(|| CoherenceError::ProbeFailed(question_id.to_string(), "no scripted result".into()))
    }
}
