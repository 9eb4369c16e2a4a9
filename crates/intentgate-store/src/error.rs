use thiserror::Error;

/// Store-port failure modes (§7 "StoreError").
///
/// `Transient` failures are retried with bounded exponential backoff at the
/// store-port level (see [`crate::retry::with_backoff`]); `Fatal` failures
/// abort the current orchestrator run and surface as `VALIDATION_ERROR`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transient store failure: {0}")]
    Transient(String),

    #[error("fatal store failure: {0}")]
    Fatal(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }
}
