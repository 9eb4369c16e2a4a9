//! Policy Engine (§4.8): the five always-computed gates, risk-level
//! profiles with origin overrides, percentile-based entropy calibration,
//! and the separate risk gate with deterministic canary rollout.
//!
//! Naming ports the teacher's `Policy`/`PolicyRule`/`PolicyAction`
//! conventions (`packages/gate/src/policy.rs`) onto `PolicyProfile`/
//! `GateResult`/`PolicyVerdict`.

pub mod calibration;
pub mod config;
pub mod error;
pub mod gates;
pub mod profile;
pub mod risk_gate;

pub use calibration::{calibrate_entropy_budgets, CalibratedBudgets};
pub use config::PolicyConfig;
pub use error::PolicyConfigError;
pub use gates::{evaluate, GateEvaluation, GateEvidence, GateName, GateResult, PolicyVerdict};
pub use profile::{PartialPolicyProfile, PolicyProfile, RiskProfiles, SecurityThresholds};
pub use risk_gate::{canary_bucket, RiskGateConfig, RiskGateEvidence, RiskGateMode};
