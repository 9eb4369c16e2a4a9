//! Check result projection (§4.3 Check Port, §3 data model).

use serde::{Deserialize, Serialize};

/// Hard timeout for a single check run, per §4.3.
pub const CHECK_TIMEOUT_SECS: u64 = 300;

/// Output truncation bound for check stdout/stderr capture, per §4.3.
pub const CHECK_OUTPUT_CAP_BYTES: usize = 2000;

/// Result of running one named check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub details: String,
    pub duration_ms: u64,
}

impl CheckResult {
    pub fn timeout(name: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            name: name.into(),
            passed: false,
            details: "timeout".to_string(),
            duration_ms,
        }
    }

    /// Truncate `output` to the §4.3 capture bound, preferring to keep the
    /// tail (failure stderr usually carries the useful signal at the end).
    pub fn truncate_output(output: &str) -> String {
        if output.len() <= CHECK_OUTPUT_CAP_BYTES {
            return output.to_string();
        }
        let start = output.len() - CHECK_OUTPUT_CAP_BYTES;
        // Respect UTF-8 boundaries when truncating from the front.
        let mut start = start;
        while start < output.len() && !output.is_char_boundary(start) {
            start += 1;
        }
        output[start..].to_string()
    }
}
