use thiserror::Error;

/// §7: queue-processor errors abort the current run; they never retry an
/// Intent on the caller's behalf (retry accounting is the pipeline's job).
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("store failure: {0}")]
    Store(String),

    #[error("scm failure: {0}")]
    Scm(String),

    #[error("pipeline failure: {0}")]
    Pipeline(String),
}
