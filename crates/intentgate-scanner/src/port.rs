use async_trait::async_trait;
use intentgate_core::SecurityFinding;

/// Category-specific hard timeouts (§5 "suspension points").
pub const SAST_TIMEOUT_SECS: u64 = 120;
pub const SCA_TIMEOUT_SECS: u64 = 180;

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub intent_id: Option<String>,
    pub tenant_id: Option<String>,
}

/// Scanner Port (§4.4). `is_available` lets the orchestrator skip a
/// scanner that isn't installed without treating it as a failure.
#[async_trait]
pub trait ScannerPort: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn name(&self) -> &str;

    async fn is_available(&self) -> bool;

    async fn scan(&self, path: &str, opts: ScanOptions) -> Result<Vec<SecurityFinding>, Self::Error>;
}
