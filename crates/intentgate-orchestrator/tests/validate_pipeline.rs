//! Integration tests for the §4.9 validation pipeline, exercising the
//! end-to-end scenarios from spec §8 that don't need the queue processor.

use std::sync::Arc;

use chrono::Utc;
use intentgate_checks::MockCheckRunner;
use intentgate_coherence::{HarnessConfig, MockProbeRunner};
use intentgate_core::{
    FindingCategory, Intent, IntentStatus, OriginType, RiskLevel, SecurityFinding, Severity,
    Technical,
};
use intentgate_orchestrator::{validate, BlockReason, OrchestratorContext, PipelineOutcome};
use intentgate_policy::PolicyConfig;
use intentgate_risk::RiskConfig;
use intentgate_scanner::MockScanner;
use intentgate_scm::{MockScm, Simulation};
use intentgate_store::{FullStore, InMemoryStore, StorePort};

fn sample_intent(risk_level: RiskLevel) -> Intent {
    Intent {
        id: format!("intent-{risk_level:?}"),
        source: "feature/a".into(),
        target: "main".into(),
        status: IntentStatus::Ready,
        risk_level,
        priority: 3,
        origin_type: OriginType::Human,
        created_at: Utc::now(),
        created_by: "tester".into(),
        updated_at: Utc::now(),
        semantic: Default::default(),
        technical: Technical {
            scope_hint: vec!["auth".into()],
            ..Default::default()
        },
        checks_required: vec![],
        dependencies: vec![],
        retries: 0,
        tenant_id: None,
        plan_id: None,
    }
}

fn empty_harness() -> HarnessConfig {
    HarnessConfig {
        version: 1,
        questions: vec![],
    }
}

struct Fixture {
    store: Arc<dyn FullStore>,
    scm: Arc<MockScm>,
    checks: Arc<MockCheckRunner>,
    scanners: Vec<Arc<MockScanner>>,
}

fn context(fixture: &Fixture) -> OrchestratorContext {
    OrchestratorContext {
        store: fixture.store.clone(),
        scm: fixture.scm.clone(),
        checks: fixture.checks.clone(),
        scanners: fixture
            .scanners
            .iter()
            .map(|s| s.clone() as Arc<dyn intentgate_scanner::ScannerPort<Error = intentgate_scanner::ScannerError>>)
            .collect(),
        probes: Arc::new(MockProbeRunner::new()),
        risk_config: RiskConfig::default(),
        policy: PolicyConfig::default(),
        harness_config: empty_harness(),
        auto_classify: true,
        auto_confirm: false,
    }
}

fn fixture() -> Fixture {
    let checks = Arc::new(MockCheckRunner::new());
    checks.register("lint");
    checks.register("unit_tests");
    Fixture {
        store: Arc::new(InMemoryStore::new()),
        scm: Arc::new(MockScm::new()),
        checks,
        scanners: vec![],
    }
}

#[tokio::test]
async fn clean_low_risk_intent_validates() {
    let fx = fixture();
    let ctx = context(&fx);
    let mut intent = sample_intent(RiskLevel::Low);

    let outcome = validate(&mut intent, &ctx).await.unwrap();

    match outcome {
        PipelineOutcome::Validated(decision) => {
            assert!(matches!(decision.gates.verdict, intentgate_policy::PolicyVerdict::Allow));
        }
        PipelineOutcome::Blocked { reason, .. } => panic!("expected validated, got blocked: {reason:?}"),
    }
    assert_eq!(intent.status, IntentStatus::Validated);
}

#[tokio::test]
async fn conflicting_merge_blocks_at_simulation() {
    let fx = fixture();
    fx.scm.set_simulation(
        "feature/a",
        "main",
        Simulation {
            mergeable: false,
            conflicts: vec!["src/a.rs".into()],
            files_changed: vec!["src/a.rs".into()],
            base_commit: "base".into(),
            head_commit: "head".into(),
        },
    );
    let ctx = context(&fx);
    let mut intent = sample_intent(RiskLevel::Low);

    let outcome = validate(&mut intent, &ctx).await.unwrap();

    match outcome {
        PipelineOutcome::Blocked { reason, .. } => {
            assert!(matches!(reason, BlockReason::Conflicts));
        }
        PipelineOutcome::Validated(_) => panic!("expected conflicts block"),
    }
    // Not reclassified, no status change on a simulation-stage block.
    assert_eq!(intent.status, IntentStatus::Ready);
}

#[tokio::test]
async fn missing_required_check_blocks_at_verification_gate() {
    let fx = fixture();
    fx.checks.queue_result(
        "lint",
        intentgate_core::CheckResult {
            name: "lint".into(),
            passed: false,
            details: "clippy found issues".into(),
            duration_ms: 5,
        },
    );
    let ctx = context(&fx);
    let mut intent = sample_intent(RiskLevel::Low);

    let outcome = validate(&mut intent, &ctx).await.unwrap();

    match outcome {
        PipelineOutcome::Blocked { reason, .. } => {
            assert!(matches!(reason, BlockReason::PolicyGate(ref g) if g == "verification"));
        }
        PipelineOutcome::Validated(_) => panic!("expected verification gate block"),
    }
}

#[tokio::test]
async fn large_change_reclassifies_risk_level_upward() {
    let fx = fixture();
    let many_files: Vec<String> = (0..80).map(|i| format!("src/mod{i}/file.rs")).collect();
    fx.scm.set_simulation(
        "feature/a",
        "main",
        Simulation {
            mergeable: true,
            conflicts: vec![],
            files_changed: many_files,
            base_commit: "base".into(),
            head_commit: "head".into(),
        },
    );
    let ctx = context(&fx);
    let mut intent = sample_intent(RiskLevel::Low);

    let _ = validate(&mut intent, &ctx).await.unwrap();

    // A sweeping change across 80 directories should never still classify
    // as the original LOW starting point.
    assert_ne!(intent.risk_level, RiskLevel::Low);
}

#[tokio::test]
async fn security_critical_finding_blocks_at_security_gate() {
    let fx = fixture();
    let scanner = Arc::new(MockScanner::new("mock-sast"));
    scanner.set_findings(vec![SecurityFinding {
        id: "f1".into(),
        scanner: "mock-sast".into(),
        category: FindingCategory::Sast,
        severity: Severity::Critical,
        file: "src/auth/login.rs".into(),
        line: Some(42),
        rule: "hardcoded-secret".into(),
        evidence: "hardcoded-secret:deadbeef".into(),
        confidence: 0.95,
        intent_id: None,
        tenant_id: None,
        timestamp: Utc::now(),
    }]);
    let mut fx = fx;
    fx.scanners = vec![scanner];
    let ctx = context(&fx);
    let mut intent = sample_intent(RiskLevel::Low);

    let outcome = validate(&mut intent, &ctx).await.unwrap();

    match outcome {
        PipelineOutcome::Blocked { reason, .. } => {
            assert!(matches!(reason, BlockReason::PolicyGate(ref g) if g == "security"));
        }
        PipelineOutcome::Validated(_) => panic!("expected security gate block"),
    }

    let findings = fx.store.list_security_findings(&intent.id).await.unwrap();
    assert_eq!(findings.len(), 1);
}

#[tokio::test]
async fn unavailable_scanner_is_skipped_not_failed() {
    let fx = fixture();
    let scanner = Arc::new(MockScanner::new("semgrep"));
    scanner.set_available(false);
    let mut fx = fx;
    fx.scanners = vec![scanner];
    let ctx = context(&fx);
    let mut intent = sample_intent(RiskLevel::Low);

    let outcome = validate(&mut intent, &ctx).await.unwrap();
    assert!(matches!(outcome, PipelineOutcome::Validated(_)));
}

#[tokio::test]
async fn validated_intent_appends_one_sound_sealed_batch_to_the_chain() {
    use intentgate_core::{EventLog, EventQuery};

    let fx = fixture();
    let ctx = context(&fx);
    let mut intent = sample_intent(RiskLevel::Low);

    let _ = validate(&mut intent, &ctx).await.unwrap();

    let head = fx.store.get_chain_head().await.unwrap();
    assert!(head.is_some());

    let mut events = fx.store.query(EventQuery::new()).await.unwrap();
    // The store documents newest-first; verify_chain wants chronological
    // (oldest-first) order.
    events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    assert!(!events.is_empty());

    let verification = intentgate_audit::verify_chain(&events);
    assert!(matches!(verification, intentgate_audit::ChainVerification::Sound));
}
