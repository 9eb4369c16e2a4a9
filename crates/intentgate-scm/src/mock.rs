use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::ScmError;
use crate::model::{Commit, Simulation};
use crate::port::ScmPort;

/// In-memory SCM used by tests and by deployments without a real VCS
/// backend wired up yet. Presets are keyed by `(source, target)`; absent
/// presets default to a clean, conflict-free merge.
#[derive(Default)]
pub struct MockScm {
    simulations: RwLock<HashMap<(String, String), Simulation>>,
    merge_failures: RwLock<HashMap<(String, String), String>>,
    logs: RwLock<HashMap<(String, String), Vec<Commit>>>,
}

impl MockScm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_simulation(&self, source: &str, target: &str, simulation: Simulation) {
        self.simulations
            .write()
            .insert((source.to_string(), target.to_string()), simulation);
    }

    pub fn set_merge_failure(&self, source: &str, target: &str, reason: impl Into<String>) {
        self.merge_failures
            .write()
            .insert((source.to_string(), target.to_string()), reason.into());
    }

    pub fn set_log(&self, base: &str, head: &str, commits: Vec<Commit>) {
        self.logs
            .write()
            .insert((base.to_string(), head.to_string()), commits);
    }
}

#[async_trait]
impl ScmPort for MockScm {
    type Error = ScmError;

    async fn simulate(&self, source: &str, target: &str) -> Result<Simulation, Self::Error> {
        let key = (source.to_string(), target.to_string());
        if let Some(sim) = self.simulations.read().get(&key).cloned() {
            return Ok(sim);
        }
        Ok(Simulation {
            mergeable: true,
            conflicts: vec![],
            files_changed: vec![],
            base_commit: format!("{target}@base"),
            head_commit: format!("{source}@head"),
        })
    }

    async fn execute_merge(&self, source: &str, target: &str) -> Result<String, Self::Error> {
        let key = (source.to_string(), target.to_string());
        if let Some(reason) = self.merge_failures.read().get(&key).cloned() {
            return Err(ScmError::MergeExecutionError(reason));
        }
        Ok(format!("merged-{source}-into-{target}"))
    }

    async fn log_between(&self, base: &str, head: &str) -> Result<Vec<Commit>, Self::Error> {
        let key = (base.to_string(), head.to_string());
        Ok(self.logs.read().get(&key).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_simulation_is_clean() {
        let scm = MockScm::new();
        let sim = scm.simulate("feature/a", "main").await.unwrap();
        assert!(sim.mergeable);
        assert!(sim.conflicts.is_empty());
    }

    #[tokio::test]
    async fn preset_conflicts_are_returned() {
        let scm = MockScm::new();
        scm.set_simulation(
            "feature/b",
            "main",
            Simulation {
                mergeable: false,
                conflicts: vec!["src/a.rs".into(), "src/b.rs".into()],
                files_changed: vec!["src/a.rs".into(), "src/b.rs".into()],
                base_commit: "base".into(),
                head_commit: "head".into(),
            },
        );
        let sim = scm.simulate("feature/b", "main").await.unwrap();
        assert!(!sim.mergeable);
        assert_eq!(sim.conflicts.len(), 2);
    }

    #[tokio::test]
    async fn merge_failure_surfaces_as_error() {
        let scm = MockScm::new();
        scm.set_merge_failure("feature/c", "main", "scratch area unavailable");
        let err = scm.execute_merge("feature/c", "main").await.unwrap_err();
        assert!(matches!(err, ScmError::MergeExecutionError(_)));
    }
}
