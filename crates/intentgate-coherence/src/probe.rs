//! Probe execution (§4.7): each enabled question's `check` command runs in
//! isolation with a 60s timeout; the last line of stdout is parsed as a
//! float. Mirrors the check port's subprocess + timeout pattern (§4.3).

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::CoherenceError;

/// Hard timeout for one coherence probe, per §4.7/§5.
pub const PROBE_TIMEOUT_SECS: u64 = 60;

/// Runs one probe command and returns its parsed numeric result.
#[async_trait]
pub trait ProbePort: Send + Sync {
    async fn run(&self, question_id: &str, check: &str) -> Result<f64, CoherenceError>;
}

/// Parses the last non-empty line of `output` as an `f64` (§4.7 "parse the
/// last line of stdout as a float").
pub fn parse_last_line(question_id: &str, output: &str) -> Result<f64, CoherenceError> {
    output
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| CoherenceError::UnparseableOutput(question_id.to_string(), output.to_string()))?
        .trim()
        .parse::<f64>()
        .map_err(|_| CoherenceError::UnparseableOutput(question_id.to_string(), output.to_string()))
}

/// Shells out via `sh -c`, matching the check port's subprocess strategy.
pub struct ProcessProbeRunner;

#[async_trait]
impl ProbePort for ProcessProbeRunner {
    async fn run(&self, question_id: &str, check: &str) -> Result<f64, CoherenceError> {
        let child = Command::new("sh").arg("-c").arg(check).output();
        let outcome = timeout(std::time::Duration::from_secs(PROBE_TIMEOUT_SECS), child).await;
        match outcome {
            Err(_elapsed) => Err(CoherenceError::ProbeTimeout(question_id.to_string())),
            Ok(Err(io_err)) => Err(CoherenceError::ProbeFailed(question_id.to_string(), io_err.to_string())),
            Ok(Ok(output)) => {
                if !output.status.success() {
                    return Err(CoherenceError::ProbeFailed(
                        question_id.to_string(),
                        String::from_utf8_lossy(&output.stderr).to_string(),
                    ));
                }
                parse_last_line(question_id, &String::from_utf8_lossy(&output.stdout))
            }
        }
    }
}
