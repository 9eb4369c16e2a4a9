//! Risk gate (§4.8): separate from the five always-computed gates, this
//! evaluates the composite risk signals against configured maxima and
//! decides whether to actually block using a deterministic SHA-256 canary
//! bucket, mirroring the teacher's percentage-rollout hashing in
//! `packages/gate/src/feature_flags.rs` but using SHA-256 over the Intent
//! ID rather than `DefaultHasher`, since the bucket must be stable across
//! process restarts and implementations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskGateMode {
    /// Breaches are recorded as `would_block=true` but never block.
    Shadow,
    /// Breaches block the Intent if the canary bucket falls under
    /// `enforce_ratio`.
    Enforce,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskGateConfig {
    pub mode: RiskGateMode,
    pub enforce_ratio: f64,
    pub max_risk_score: f64,
    pub max_damage_score: f64,
    pub max_propagation_score: f64,
}

impl Default for RiskGateConfig {
    /// No spec-mandated default; shadow mode at 50% enforce ratio is the
    /// conservative rollout posture (DESIGN.md records this as a resolved
    /// open question) so a fresh deployment observes before it blocks.
    fn default() -> Self {
        Self {
            mode: RiskGateMode::Shadow,
            enforce_ratio: 0.5,
            max_risk_score: 90.0,
            max_damage_score: 90.0,
            max_propagation_score: 90.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskGateEvidence {
    pub breached: bool,
    pub would_block: bool,
    pub blocked: bool,
    pub bucket: f64,
    pub breaching_signals: Vec<String>,
}

/// §4.8: `bucket = uint32(SHA256(intent_id)[0:4]) / 2^32 ∈ [0,1)`. Reuses
/// `intentgate-flags`' rollout bucket hash rather than redefining it, per
/// §9's "percentage rollout hashing reused for the risk-gate's canary
/// bucket rather than duplicated".
pub fn canary_bucket(intent_id: &str) -> f64 {
    intentgate_flags::bucket(intent_id)
}

/// Evaluate the risk gate for one Intent. Returns evidence recording
/// whether the breach actually blocked (only possible in `enforce` mode).
pub fn evaluate(
    config: &RiskGateConfig,
    intent_id: &str,
    risk_score: f64,
    damage_score: f64,
    propagation_score: f64,
) -> RiskGateEvidence {
    let mut breaching_signals = Vec::new();
    if risk_score > config.max_risk_score {
        breaching_signals.push("risk_score".to_string());
    }
    if damage_score > config.max_damage_score {
        breaching_signals.push("damage_score".to_string());
    }
    if propagation_score > config.max_propagation_score {
        breaching_signals.push("propagation_score".to_string());
    }
    let breached = !breaching_signals.is_empty();
    let bucket = canary_bucket(intent_id);

    if !breached {
        return RiskGateEvidence {
            breached: false,
            would_block: false,
            blocked: false,
            bucket,
            breaching_signals,
        };
    }

    let would_block = true;
    let blocked = match config.mode {
        RiskGateMode::Shadow => false,
        RiskGateMode::Enforce => bucket < config.enforce_ratio,
    };

    RiskGateEvidence {
        breached,
        would_block,
        blocked,
        bucket,
        breaching_signals,
    }
}
