//! Intent: a structured proposal to merge a source ref into a target ref.
//!
//! See spec §3 "Data Model" and the Intent invariants 1-5.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Default priority assigned to an Intent that does not specify one.
pub const DEFAULT_PRIORITY: i32 = 3;

/// Lifecycle status. Transitions follow
/// `DRAFT -> READY -> VALIDATED -> QUEUED -> MERGED`, with `REJECTED`
/// reachable from any non-terminal status. `MERGED` and `REJECTED` are
/// terminal (invariant 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IntentStatus {
    Draft,
    Ready,
    Validated,
    Queued,
    Merged,
    Rejected,
}

impl IntentStatus {
    /// Whether this status has no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, IntentStatus::Merged | IntentStatus::Rejected)
    }

    /// Validate a status transition against invariant 1. `MERGED` from
    /// `VALIDATED` is the explicit-confirmation path (invariant 5); `MERGED`
    /// from `QUEUED` is the auto-confirm path.
    pub fn can_transition_to(self, to: IntentStatus) -> bool {
        use IntentStatus::*;
        if self.is_terminal() {
            return false;
        }
        match (self, to) {
            (Draft, Ready) => true,
            (Ready, Validated) => true,
            (Validated, Queued) => true,
            (Queued, Merged) => true,
            (Validated, Merged) => true,
            // A blocked/requeued Intent returns to READY for another pass.
            (Validated, Ready) => true,
            (Queued, Ready) => true,
            (_, Rejected) => true,
            _ => false,
        }
    }
}

/// Risk classification, ordered `LOW < MEDIUM < HIGH < CRITICAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Classify a composite risk score per spec §4.6.
    pub fn classify(risk_score: f64) -> RiskLevel {
        if risk_score >= 75.0 {
            RiskLevel::Critical
        } else if risk_score >= 50.0 {
            RiskLevel::High
        } else if risk_score >= 25.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

/// Provenance of an Intent, used to select policy overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginType {
    Human,
    Agent,
    Integration,
}

impl OriginType {
    pub fn as_str(self) -> &'static str {
        match self {
            OriginType::Human => "human",
            OriginType::Agent => "agent",
            OriginType::Integration => "integration",
        }
    }
}

/// Technical context. `scope_hint` is the only field ever consulted by
/// automated decisions (graph building); `affected_modules` and anything
/// else are informational only and preserved in insertion order via the
/// underlying JSON map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Technical {
    #[serde(default)]
    pub scope_hint: Vec<String>,
    #[serde(default)]
    pub affected_modules: Vec<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// A structured proposal to merge `source` into `target`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub id: String,
    pub source: String,
    pub target: String,
    pub status: IntentStatus,
    pub risk_level: RiskLevel,
    #[serde(default = "default_priority")]
    pub priority: i32,
    pub origin_type: OriginType,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub semantic: serde_json::Map<String, Value>,
    #[serde(default)]
    pub technical: Technical,
    #[serde(default)]
    pub checks_required: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub retries: u32,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub plan_id: Option<String>,
}

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

impl Intent {
    /// Validate invariants 2 and 3 (retry bound, acyclic/self-free
    /// dependencies) that are checkable without consulting other Intents.
    pub fn validate_self(&self, max_retries: u32) -> Result<(), CoreError> {
        if self.retries > max_retries {
            return Err(CoreError::RetryBoundExceeded {
                retries: self.retries,
                max: max_retries,
            });
        }
        let mut seen = HashSet::new();
        for dep in &self.dependencies {
            if dep == &self.id {
                return Err(CoreError::SelfDependency(self.id.clone()));
            }
            if !seen.insert(dep.clone()) {
                return Err(CoreError::DuplicateDependency(self.id.clone(), dep.clone()));
            }
        }
        Ok(())
    }

    /// Validate invariant 3's cycle-freedom against the full dependency
    /// closure. `resolve` looks up another Intent's `dependencies` list by
    /// id; Intents not found are treated as leaves.
    pub fn validate_acyclic<'a, F>(&'a self, resolve: F) -> Result<(), CoreError>
    where
        F: Fn(&str) -> Option<&'a [String]>,
    {
        let mut visiting = HashSet::new();
        let mut visited = HashSet::new();
        if has_cycle(&self.id, &self.dependencies, &resolve, &mut visiting, &mut visited) {
            return Err(CoreError::DependencyCycle(self.id.clone()));
        }
        Ok(())
    }

    /// Attempt a status transition, enforcing invariant 1.
    pub fn transition(&mut self, to: IntentStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(to) {
            return Err(CoreError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Effective check set per §9 Open Question: profile checks unioned with
    /// any explicit `checks_required` the Intent carries.
    pub fn effective_checks(&self, profile_checks: &HashSet<String>) -> HashSet<String> {
        let mut effective: HashSet<String> = profile_checks.clone();
        effective.extend(self.checks_required.iter().cloned());
        effective
    }
}

fn has_cycle<'a, F>(
    id: &'a str,
    deps: &'a [String],
    resolve: &F,
    visiting: &mut HashSet<String>,
    visited: &mut HashSet<String>,
) -> bool
where
    F: Fn(&str) -> Option<&'a [String]>,
{
    if visited.contains(id) {
        return false;
    }
    if !visiting.insert(id.to_string()) {
        return true;
    }
    for dep in deps {
        if dep == id {
            return true;
        }
        let dep_deps = resolve(dep).unwrap_or(&[]);
        if has_cycle(dep, dep_deps, resolve, visiting, visited) {
            return true;
        }
    }
    visiting.remove(id);
    visited.insert(id.to_string());
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_intent(id: &str, deps: Vec<&str>) -> Intent {
        Intent {
            id: id.to_string(),
            source: "feature/a".into(),
            target: "main".into(),
            status: IntentStatus::Ready,
            risk_level: RiskLevel::Low,
            priority: DEFAULT_PRIORITY,
            origin_type: OriginType::Human,
            created_at: Utc::now(),
            created_by: "tester".into(),
            updated_at: Utc::now(),
            semantic: Default::default(),
            technical: Default::default(),
            checks_required: vec![],
            dependencies: deps.into_iter().map(String::from).collect(),
            retries: 0,
            tenant_id: None,
            plan_id: None,
        }
    }

    #[test]
    fn lifecycle_happy_path() {
        let mut i = base_intent("i1", vec![]);
        assert!(i.transition(IntentStatus::Validated).is_ok());
        assert!(i.transition(IntentStatus::Queued).is_ok());
        assert!(i.transition(IntentStatus::Merged).is_ok());
        assert!(i.transition(IntentStatus::Ready).is_err());
    }

    #[test]
    fn rejected_reachable_from_any_nonterminal() {
        for status in [
            IntentStatus::Draft,
            IntentStatus::Ready,
            IntentStatus::Validated,
            IntentStatus::Queued,
        ] {
            let mut i = base_intent("i1", vec![]);
            i.status = status;
            assert!(i.transition(IntentStatus::Rejected).is_ok());
        }
    }

    #[test]
    fn terminal_statuses_reject_further_transitions() {
        let mut i = base_intent("i1", vec![]);
        i.status = IntentStatus::Merged;
        assert!(i.transition(IntentStatus::Ready).is_err());
        let mut i = base_intent("i1", vec![]);
        i.status = IntentStatus::Rejected;
        assert!(i.transition(IntentStatus::Ready).is_err());
    }

    #[test]
    fn self_dependency_rejected() {
        let i = base_intent("i1", vec!["i1"]);
        assert!(matches!(
            i.validate_self(3),
            Err(CoreError::SelfDependency(_))
        ));
    }

    #[test]
    fn retry_bound_enforced() {
        let mut i = base_intent("i1", vec![]);
        i.retries = 4;
        assert!(matches!(
            i.validate_self(3),
            Err(CoreError::RetryBoundExceeded { .. })
        ));
    }

    #[test]
    fn dependency_cycle_detected() {
        let i3 = base_intent("i3", vec!["i4"]);
        let i4 = base_intent("i4", vec!["i3"]);
        let table: HashMap<&str, &Intent> = [("i3", &i3), ("i4", &i4)].into_iter().collect();
        let resolve = |id: &str| table.get(id).map(|i| i.dependencies.as_slice());
        assert!(i3.validate_acyclic(resolve).is_err());
    }

    #[test]
    fn acyclic_dependency_chain_ok() {
        let i3 = base_intent("i3", vec![]);
        let i4 = base_intent("i4", vec!["i3"]);
        let table: HashMap<&str, &Intent> = [("i3", &i3), ("i4", &i4)].into_iter().collect();
        let resolve = |id: &str| table.get(id).map(|i| i.dependencies.as_slice());
        assert!(i4.validate_acyclic(resolve).is_ok());
    }

    #[test]
    fn risk_level_classification_boundaries() {
        assert_eq!(RiskLevel::classify(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::classify(24.9), RiskLevel::Low);
        assert_eq!(RiskLevel::classify(25.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(49.9), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(50.0), RiskLevel::High);
        assert_eq!(RiskLevel::classify(74.9), RiskLevel::High);
        assert_eq!(RiskLevel::classify(75.0), RiskLevel::Critical);
        assert_eq!(RiskLevel::classify(100.0), RiskLevel::Critical);
    }

    #[test]
    fn effective_checks_union_profile_and_explicit() {
        let mut i = base_intent("i1", vec![]);
        i.checks_required = vec!["security_scan".to_string()];
        let profile: HashSet<String> = ["lint".to_string()].into_iter().collect();
        let effective = i.effective_checks(&profile);
        assert!(effective.contains("lint"));
        assert!(effective.contains("security_scan"));
    }
}
