use thiserror::Error;

/// Failures a check runner cannot mask into a `CheckResult` itself — e.g. it
/// could not even spawn the subprocess. Timeouts and non-zero exits are
/// never represented here; §7 requires those to surface as a failed
/// `CheckResult`, not an error.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("failed to spawn check process: {0}")]
    SpawnFailed(String),
}
