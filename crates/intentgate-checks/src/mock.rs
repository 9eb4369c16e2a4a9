use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use intentgate_core::CheckResult;
use parking_lot::RwLock;

use crate::error::CheckError;
use crate::port::CheckPort;

/// In-memory check runner for tests. Each check name has an optional queue
/// of scripted results (consumed in order, useful for flaky-check
/// scenarios); once the queue is drained, `default_result` (or an
/// always-pass fallback) is returned.
#[derive(Default)]
pub struct MockCheckRunner {
    known: RwLock<std::collections::HashSet<String>>,
    scripted: RwLock<HashMap<String, VecDeque<CheckResult>>>,
    defaults: RwLock<HashMap<String, CheckResult>>,
}

impl MockCheckRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: &str) {
        self.known.write().insert(name.to_string());
    }

    pub fn queue_result(&self, name: &str, result: CheckResult) {
        self.register(name);
        self.scripted
            .write()
            .entry(name.to_string())
            .or_default()
            .push_back(result);
    }

    pub fn set_default(&self, name: &str, result: CheckResult) {
        self.register(name);
        self.defaults.write().insert(name.to_string(), result);
    }
}

#[async_trait]
impl CheckPort for MockCheckRunner {
    type Error = CheckError;

    fn is_known(&self, check_name: &str) -> bool {
        self.known.read().contains(check_name)
    }

    async fn run(&self, check_name: &str) -> Result<CheckResult, Self::Error> {
        if let Some(result) = self
            .scripted
            .write()
            .get_mut(check_name)
            .and_then(|q| q.pop_front())
        {
            return Ok(result);
        }
        if let Some(result) = self.defaults.read().get(check_name).cloned() {
            return Ok(result);
        }
        Ok(CheckResult {
            name: check_name.to_string(),
            passed: true,
            details: String::new(),
            duration_ms: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_results_are_consumed_in_order() {
        let runner = MockCheckRunner::new();
        runner.queue_result(
            "unit_tests",
            CheckResult {
                name: "unit_tests".into(),
                passed: false,
                details: "flake 1".into(),
                duration_ms: 10,
            },
        );
        runner.queue_result(
            "unit_tests",
            CheckResult {
                name: "unit_tests".into(),
                passed: true,
                details: String::new(),
                duration_ms: 10,
            },
        );
        let first = runner.run("unit_tests").await.unwrap();
        let second = runner.run("unit_tests").await.unwrap();
        assert!(!first.passed);
        assert!(second.passed);
    }

    #[tokio::test]
    async fn unknown_check_is_not_known() {
        let runner = MockCheckRunner::new();
        assert!(!runner.is_known("nonexistent_check"));
    }

    #[tokio::test]
    async fn unregistered_check_defaults_to_pass() {
        let runner = MockCheckRunner::new();
        runner.register("lint");
        let result = runner.run("lint").await.unwrap();
        assert!(result.passed);
    }
}
