use thiserror::Error;

/// §7 "SCMError": `NotFoundRef`, `Corrupt`, `Transient`. Transient is retried
/// once by the caller; the other two surface as `VALIDATION_ERROR`.
#[derive(Debug, Error)]
pub enum ScmError {
    #[error("ref not found: {0}")]
    NotFoundRef(String),

    #[error("corrupt repository: {0}")]
    Corrupt(String),

    #[error("transient SCM failure: {0}")]
    Transient(String),

    #[error("merge execution failed: {0}")]
    MergeExecutionError(String),
}

impl ScmError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ScmError::Transient(_))
    }
}
