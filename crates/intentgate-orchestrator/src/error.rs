use thiserror::Error;

/// §7: errors that abort the current orchestrator run and surface as
/// `VALIDATION_ERROR`, distinct from a normal `INTENT_BLOCKED` outcome.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("store failure: {0}")]
    Store(String),

    #[error("scm failure: {0}")]
    Scm(String),

    #[error("intent not found: {0}")]
    IntentNotFound(String),
}
