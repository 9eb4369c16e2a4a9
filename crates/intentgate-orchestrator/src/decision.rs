//! The orchestrator's result types (§9 "Replacing exceptions-as-control-flow":
//! a discriminated `PipelineOutcome` instead of exceptions driving control
//! flow).

use intentgate_coherence::CoherenceResult;
use intentgate_policy::{GateEvaluation, RiskGateEvidence};
use intentgate_risk::RiskEvaluation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BlockReason {
    Conflicts,
    CoherenceFail,
    PolicyGate(String),
    RiskGate,
}

impl BlockReason {
    pub fn as_str(&self) -> String {
        match self {
            BlockReason::Conflicts => "conflicts".to_string(),
            BlockReason::CoherenceFail => "coherence_fail".to_string(),
            BlockReason::PolicyGate(gate) => gate.clone(),
            BlockReason::RiskGate => "risk_gate".to_string(),
        }
    }
}

/// Full accumulated evidence for one `validate()` run (§4.9 steps 1-7),
/// carried in the `INTENT_VALIDATED` payload when the run completes
/// without a short-circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub trace_id: String,
    pub risk: RiskEvaluation,
    pub coherence: CoherenceResult,
    pub gates: GateEvaluation,
    pub risk_gate: RiskGateEvidence,
}

/// §4.9 pipeline result. Only `Error` propagates as a Rust `Err`; `Blocked`
/// is a successful outcome that still emits an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineOutcome {
    Validated(Decision),
    Blocked { trace_id: String, reason: BlockReason },
}
