use thiserror::Error;

/// Errors raised while constructing or mutating core domain objects.
///
/// These are "programmer/configuration errors" in the §7 taxonomy sense when
/// they originate from malformed input at intake time (self-dependency,
/// dependency cycle); callers should reject the Intent rather than retry.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("intent {0} cannot depend on itself")]
    SelfDependency(String),

    #[error("dependency cycle detected involving intent {0}")]
    DependencyCycle(String),

    #[error("duplicate dependency {1} on intent {0}")]
    DuplicateDependency(String, String),

    #[error("invalid status transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: crate::intent::IntentStatus,
        to: crate::intent::IntentStatus,
    },

    #[error("retries {retries} exceed max_retries {max}")]
    RetryBoundExceeded { retries: u32, max: u32 },
}
