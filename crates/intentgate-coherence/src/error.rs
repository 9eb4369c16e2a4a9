use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoherenceError {
    #[error("malformed assertion {0:?}: {1}")]
    InvalidAssertion(String, String),

    #[error("probe {0:?} timed out")]
    ProbeTimeout(String),

    #[error("probe {0:?} failed: {1}")]
    ProbeFailed(String, String),

    #[error("probe {0:?} produced unparseable output: {1:?}")]
    UnparseableOutput(String, String),
}
