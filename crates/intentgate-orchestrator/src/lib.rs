//! Validation Orchestrator (§4.9): wires the SCM, Check, Scanner, Risk,
//! Coherence, and Policy seams into the single `validate()` pass every
//! Intent goes through before it is eligible to queue.

pub mod chain_append;
pub mod context;
pub mod decision;
pub mod error;
pub mod validate;

pub use chain_append::append_sealed_batch;
pub use context::OrchestratorContext;
pub use decision::{BlockReason, Decision, PipelineOutcome};
pub use error::PipelineError;
pub use validate::validate;
