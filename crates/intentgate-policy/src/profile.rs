//! Risk-level policy profiles (§4.8, §6 default table).

use std::collections::{HashMap, HashSet};

use intentgate_core::{OriginType, RiskLevel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityThresholds {
    #[serde(default)]
    pub max_critical: u32,
    pub max_high: u32,
}

/// One risk-level's gate thresholds (§3 "PolicyProfile").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyProfile {
    pub entropy_budget: f64,
    pub containment_min: f64,
    /// Informational per §9's open question unless config explicitly binds
    /// it to a gate; not consulted by [`crate::gates::evaluate`] today.
    pub blast_limit: f64,
    pub checks: HashSet<String>,
    pub coherence_pass: f64,
    pub coherence_warn: f64,
    pub security: SecurityThresholds,
}

impl PolicyProfile {
    /// §4.8 "max_critical is always 0 for every profile" — enforced
    /// regardless of what config supplies.
    pub fn security_max_critical(&self) -> u32 {
        0
    }

    /// Merge `other`'s present fields over `self` (used for origin
    /// overrides, §4.8 "profile(risk_level, origin_type)").
    fn merged_with(&self, partial: &PartialPolicyProfile) -> PolicyProfile {
        let mut merged = self.clone();
        if let Some(v) = partial.entropy_budget {
            merged.entropy_budget = v;
        }
        if let Some(v) = partial.containment_min {
            merged.containment_min = v;
        }
        if let Some(v) = partial.blast_limit {
            merged.blast_limit = v;
        }
        if let Some(ref v) = partial.checks {
            merged.checks = v.clone();
        }
        if let Some(v) = partial.coherence_pass {
            merged.coherence_pass = v;
        }
        if let Some(v) = partial.coherence_warn {
            merged.coherence_warn = v;
        }
        if let Some(ref v) = partial.security {
            if let Some(max_high) = v.max_high {
                merged.security.max_high = max_high;
            }
        }
        merged
    }
}

/// Partial profile override, as carried in `origin_overrides` (§6). Every
/// field optional; absent fields pass through unchanged (§4.8 "Unknown keys
/// pass through unchanged").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialPolicyProfile {
    #[serde(default)]
    pub entropy_budget: Option<f64>,
    #[serde(default)]
    pub containment_min: Option<f64>,
    #[serde(default)]
    pub blast_limit: Option<f64>,
    #[serde(default)]
    pub checks: Option<HashSet<String>>,
    #[serde(default)]
    pub coherence_pass: Option<f64>,
    #[serde(default)]
    pub coherence_warn: Option<f64>,
    #[serde(default)]
    pub security: Option<PartialSecurityThresholds>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialSecurityThresholds {
    #[serde(default)]
    pub max_high: Option<u32>,
}

/// The four base profiles plus origin-based overrides (§4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskProfiles {
    pub low: PolicyProfile,
    pub medium: PolicyProfile,
    pub high: PolicyProfile,
    pub critical: PolicyProfile,
    #[serde(default)]
    pub origin_overrides: HashMap<String, HashMap<String, PartialPolicyProfile>>,
}

impl RiskProfiles {
    pub fn base(&self, level: RiskLevel) -> &PolicyProfile {
        match level {
            RiskLevel::Low => &self.low,
            RiskLevel::Medium => &self.medium,
            RiskLevel::High => &self.high,
            RiskLevel::Critical => &self.critical,
        }
    }

    pub fn base_mut(&mut self, level: RiskLevel) -> &mut PolicyProfile {
        match level {
            RiskLevel::Low => &mut self.low,
            RiskLevel::Medium => &mut self.medium,
            RiskLevel::High => &mut self.high,
            RiskLevel::Critical => &mut self.critical,
        }
    }

    /// §4.8 "profile(risk_level, origin_type) = base profile merged with
    /// any origin_overrides[origin_type][risk_level], falling back to
    /// origin_overrides[origin_type]["_default"]".
    pub fn resolve(&self, level: RiskLevel, origin: OriginType) -> PolicyProfile {
        let base = self.base(level).clone();
        let Some(by_level) = self.origin_overrides.get(origin.as_str()) else {
            return base;
        };
        let partial = by_level
            .get(level_key(level))
            .or_else(|| by_level.get("_default"));
        match partial {
            Some(partial) => base.merged_with(partial),
            None => base,
        }
    }
}

fn level_key(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "low",
        RiskLevel::Medium => "medium",
        RiskLevel::High => "high",
        RiskLevel::Critical => "critical",
    }
}

fn checks(names: &[&str]) -> HashSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for RiskProfiles {
    /// §4.8 "Default profiles (selected values)" table. `blast_limit` has no
    /// value in the source table; defaults here are informational only
    /// (DESIGN.md records this as a resolved open question).
    fn default() -> Self {
        Self {
            low: PolicyProfile {
                entropy_budget: 25.0,
                containment_min: 0.30,
                blast_limit: 20.0,
                checks: checks(&["lint"]),
                coherence_pass: 75.0,
                coherence_warn: 60.0,
                security: SecurityThresholds { max_critical: 0, max_high: 5 },
            },
            medium: PolicyProfile {
                entropy_budget: 18.0,
                containment_min: 0.50,
                blast_limit: 15.0,
                checks: checks(&["lint"]),
                coherence_pass: 75.0,
                coherence_warn: 60.0,
                security: SecurityThresholds { max_critical: 0, max_high: 2 },
            },
            high: PolicyProfile {
                entropy_budget: 12.0,
                containment_min: 0.70,
                blast_limit: 10.0,
                checks: checks(&["lint", "unit_tests"]),
                coherence_pass: 80.0,
                coherence_warn: 65.0,
                security: SecurityThresholds { max_critical: 0, max_high: 0 },
            },
            critical: PolicyProfile {
                entropy_budget: 6.0,
                containment_min: 0.85,
                blast_limit: 5.0,
                checks: checks(&["lint", "unit_tests"]),
                coherence_pass: 85.0,
                coherence_warn: 70.0,
                security: SecurityThresholds { max_critical: 0, max_high: 0 },
            },
            origin_overrides: HashMap::new(),
        }
    }
}
