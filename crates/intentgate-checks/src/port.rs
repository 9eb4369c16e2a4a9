use async_trait::async_trait;
use intentgate_core::CheckResult;

/// Check Port (§4.3). Each check is a named command with a hard 300 s
/// timeout and output truncated to `CHECK_OUTPUT_CAP_BYTES`. Unknown check
/// names are the caller's responsibility to skip — `is_known` lets the
/// orchestrator decide without invoking `run`.
#[async_trait]
pub trait CheckPort: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn is_known(&self, check_name: &str) -> bool;

    /// Timeout and non-zero exit both resolve to `Ok(CheckResult{passed:
    /// false, ..})`; only a genuine inability to run the check at all
    /// returns `Err`.
    async fn run(&self, check_name: &str) -> Result<CheckResult, Self::Error>;
}
