//! The five policy gates (§4.8). All five are always computed, regardless
//! of whether an earlier gate already failed, so diagnostics are complete.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::profile::PolicyProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateName {
    Verification,
    Containment,
    Entropy,
    Security,
    Coherence,
}

impl GateName {
    pub fn as_str(self) -> &'static str {
        match self {
            GateName::Verification => "verification",
            GateName::Containment => "containment",
            GateName::Entropy => "entropy",
            GateName::Security => "security",
            GateName::Coherence => "coherence",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateResult {
    pub gate: GateName,
    pub passed: bool,
    pub value: f64,
    pub threshold: f64,
    pub reason: String,
}

/// Inputs consulted by the five gates; gathered by the orchestrator from
/// the check runner, scanner, and coherence harness results.
#[derive(Debug, Clone)]
pub struct GateEvidence<'a> {
    pub checks_passed: &'a HashSet<String>,
    pub containment_score: f64,
    pub entropy_score: f64,
    pub security_critical_count: u32,
    pub security_high_count: u32,
    pub coherence_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PolicyVerdict {
    Allow,
    Block,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateEvaluation {
    pub verdict: PolicyVerdict,
    pub gates: Vec<GateResult>,
}

impl GateEvaluation {
    pub fn failed_gates(&self) -> impl Iterator<Item = &GateResult> {
        self.gates.iter().filter(|g| !g.passed)
    }
}

/// §4.8: evaluate all five gates against `profile` and `evidence`. Every
/// gate runs regardless of earlier results, so the returned list always has
/// exactly five entries in gate-declaration order.
pub fn evaluate(profile: &PolicyProfile, evidence: &GateEvidence<'_>) -> GateEvaluation {
    let verification = verification_gate(profile, evidence);
    let containment = containment_gate(profile, evidence);
    let entropy = entropy_gate(profile, evidence);
    let security = security_gate(profile, evidence);
    let coherence = coherence_gate(profile, evidence);

    let gates = vec![verification, containment, entropy, security, coherence];
    let verdict = if gates.iter().all(|g| g.passed) {
        PolicyVerdict::Allow
    } else {
        PolicyVerdict::Block
    };

    GateEvaluation { verdict, gates }
}

fn verification_gate(profile: &PolicyProfile, evidence: &GateEvidence<'_>) -> GateResult {
    let missing: Vec<&String> = profile
        .checks
        .iter()
        .filter(|required| !evidence.checks_passed.contains(*required))
        .collect();
    let passed = missing.is_empty();
    let reason = if passed {
        "all required checks passed".to_string()
    } else {
        let missing_list: Vec<&str> = missing.iter().map(|s| s.as_str()).collect();
        format!("missing required checks: {}", missing_list.join(", "))
    };
    GateResult {
        gate: GateName::Verification,
        passed,
        value: (profile.checks.len() - missing.len()) as f64,
        threshold: profile.checks.len() as f64,
        reason,
    }
}

fn containment_gate(profile: &PolicyProfile, evidence: &GateEvidence<'_>) -> GateResult {
    let passed = evidence.containment_score >= profile.containment_min;
    GateResult {
        gate: GateName::Containment,
        passed,
        value: evidence.containment_score,
        threshold: profile.containment_min,
        reason: format!(
            "containment_score {:.3} {} containment_min {:.3}",
            evidence.containment_score,
            if passed { ">=" } else { "<" },
            profile.containment_min
        ),
    }
}

fn entropy_gate(profile: &PolicyProfile, evidence: &GateEvidence<'_>) -> GateResult {
    let passed = evidence.entropy_score <= profile.entropy_budget;
    GateResult {
        gate: GateName::Entropy,
        passed,
        value: evidence.entropy_score,
        threshold: profile.entropy_budget,
        reason: format!(
            "entropy_score {:.3} {} entropy_budget {:.3}",
            evidence.entropy_score,
            if passed { "<=" } else { ">" },
            profile.entropy_budget
        ),
    }
}

fn security_gate(profile: &PolicyProfile, evidence: &GateEvidence<'_>) -> GateResult {
    let max_critical = profile.security_max_critical();
    let passed = evidence.security_critical_count <= max_critical
        && evidence.security_high_count <= profile.security.max_high;
    let value = (evidence.security_critical_count * 10 + evidence.security_high_count) as f64;
    let threshold = (max_critical * 10 + profile.security.max_high) as f64;
    GateResult {
        gate: GateName::Security,
        passed,
        value,
        threshold,
        reason: format!(
            "critical={} (max {}), high={} (max {})",
            evidence.security_critical_count, max_critical, evidence.security_high_count, profile.security.max_high
        ),
    }
}

fn coherence_gate(profile: &PolicyProfile, evidence: &GateEvidence<'_>) -> GateResult {
    let passed = evidence.coherence_score >= profile.coherence_warn;
    GateResult {
        gate: GateName::Coherence,
        passed,
        value: evidence.coherence_score,
        threshold: profile.coherence_warn,
        reason: format!(
            "coherence_score {:.3} {} coherence_warn {:.3}",
            evidence.coherence_score,
            if passed { ">=" } else { "<" },
            profile.coherence_warn
        ),
    }
}
