use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use intentgate_core::{CheckResult, CHECK_TIMEOUT_SECS};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::warn;

use crate::error::CheckError;
use crate::port::CheckPort;

/// One named check: the command line to run and the working directory it
/// runs in (the SCM port's scratch area for the Intent under validation).
#[derive(Debug, Clone)]
pub struct CheckSpec {
    pub command: String,
    pub args: Vec<String>,
    pub working_dir: String,
}

/// Subprocess-backed check runner (§4.3). Each registered check is a named
/// command with a hard 300 s timeout; output is truncated via
/// [`intentgate_core::check_result::truncate_output`].
pub struct ProcessCheckRunner {
    specs: HashMap<String, CheckSpec>,
}

impl ProcessCheckRunner {
    pub fn new(specs: HashMap<String, CheckSpec>) -> Self {
        Self { specs }
    }
}

#[async_trait]
impl CheckPort for ProcessCheckRunner {
    type Error = CheckError;

    fn is_known(&self, check_name: &str) -> bool {
        self.specs.contains_key(check_name)
    }

    async fn run(&self, check_name: &str) -> Result<CheckResult, Self::Error> {
        let spec = match self.specs.get(check_name) {
            Some(spec) => spec,
            None => {
                warn!(check = check_name, "run() called for unknown check");
                return Ok(CheckResult {
                    name: check_name.to_string(),
                    passed: true,
                    details: String::new(),
                    duration_ms: 0,
                });
            }
        };

        let start = Instant::now();
        let child = Command::new(&spec.command)
            .args(&spec.args)
            .current_dir(&spec.working_dir)
            .output();

        let outcome = timeout(Duration::from_secs(CHECK_TIMEOUT_SECS), child).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Err(_elapsed) => Ok(CheckResult::timeout(check_name, duration_ms)),
            Ok(Err(io_err)) => Err(CheckError::SpawnFailed(io_err.to_string())),
            Ok(Ok(output)) => {
                let passed = output.status.success();
                let raw = if passed { &output.stdout } else { &output.stderr };
                let details =
                    intentgate_core::check_result::truncate_output(&String::from_utf8_lossy(raw));
                Ok(CheckResult {
                    name: check_name.to_string(),
                    passed,
                    details,
                    duration_ms,
                })
            }
        }
    }
}
