use thiserror::Error;

/// A missing scanner is never an error (§4.4 "missing scanner -> skipped,
/// recorded as such") — callers check `is_available` first. This covers only
/// a scan that started and then genuinely failed.
#[derive(Debug, Error)]
pub enum ScannerError {
    #[error("scan failed: {0}")]
    ScanFailed(String),

    #[error("scan timed out after {0}s")]
    Timeout(u64),
}
