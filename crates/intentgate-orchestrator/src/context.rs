//! Everything `validate()` needs to run one pass: the ports it calls out
//! through, and the configuration that shapes the decision.

use std::sync::Arc;

use intentgate_checks::{CheckError, CheckPort};
use intentgate_coherence::{HarnessConfig, ProbePort};
use intentgate_policy::PolicyConfig;
use intentgate_risk::RiskConfig;
use intentgate_scanner::{ScannerError, ScannerPort};
use intentgate_scm::{ScmError, ScmPort};
use intentgate_store::FullStore;

pub struct OrchestratorContext {
    pub store: Arc<dyn FullStore>,
    pub scm: Arc<dyn ScmPort<Error = ScmError>>,
    pub checks: Arc<dyn CheckPort<Error = CheckError>>,
    pub scanners: Vec<Arc<dyn ScannerPort<Error = ScannerError>>>,
    pub probes: Arc<dyn ProbePort>,
    pub risk_config: RiskConfig,
    pub policy: PolicyConfig,
    pub harness_config: HarnessConfig,
    /// §4.9 step 3: whether a computed risk level different from
    /// `intent.risk_level` is written back and emits
    /// `RISK_LEVEL_RECLASSIFIED`.
    pub auto_classify: bool,
    /// §4.10: whether a successfully queued Intent auto-executes its merge.
    pub auto_confirm: bool,
}
