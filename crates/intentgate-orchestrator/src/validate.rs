//! The §4.9 validation pipeline. Every step is always attempted in order;
//! a short-circuit means no further step runs and the only remaining event
//! is the terminating block event -- the events already pushed for earlier
//! steps in this run still get appended as part of the batch.

use std::collections::{HashMap, HashSet};

use intentgate_checks::CheckPort;
use intentgate_coherence::Verdict;
use intentgate_core::{Event, EventType, Intent, IntentStatus, Severity};
use intentgate_graph::{build_graph, compute_metrics, GraphInput};
use intentgate_policy::{GateEvidence, PolicyVerdict};
use intentgate_scanner::{ScanOptions, ScannerPort};
use intentgate_scm::ScmPort;
use intentgate_store::StorePort;
use serde_json::{json, Map};
use uuid::Uuid;

use crate::chain_append::append_sealed_batch;
use crate::context::OrchestratorContext;
use crate::decision::{BlockReason, Decision, PipelineOutcome};
use crate::error::PipelineError;

/// Thresholds beyond which a coherence PASS/WARN is downgraded one step
/// even though the harness itself reported it clean (§4.9 step 4 "apply
/// cross-validation downgrades", §8 scenario 7). No spec-given numeric
/// value; chosen to align with the risk gate's own breach defaults
/// (documented in DESIGN.md).
const CROSS_VALIDATION_RISK_SCORE_THRESHOLD: f64 = 55.0;

fn payload(pairs: Vec<(&str, serde_json::Value)>) -> Map<String, serde_json::Value> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Run the full §4.9 pipeline against `intent`, mutating it in place
/// (status, risk_level) as the pipeline progresses. Returns the outcome and
/// persists both the Intent row and the generated event batch.
pub async fn validate(
    intent: &mut Intent,
    ctx: &OrchestratorContext,
) -> Result<PipelineOutcome, PipelineError> {
    let trace_id = Uuid::new_v4().to_string();
    let mut events: Vec<Event> = Vec::new();

    macro_rules! emit {
        ($event_type:expr, $payload:expr) => {
            events.push(
                Event::new(trace_id.clone(), $event_type, Some(intent.id.clone()))
                    .with_payload($payload)
                    .with_tenant(intent.tenant_id.clone()),
            )
        };
    }

    // Step 1: Simulation.
    let simulation = ctx
        .scm
        .simulate(&intent.source, &intent.target)
        .await
        .map_err(|e| PipelineError::Scm(e.to_string()))?;

    emit!(
        EventType::SimulationCompleted,
        payload(vec![
            ("mergeable", json!(simulation.mergeable)),
            ("conflicts", json!(simulation.conflicts)),
            ("files_changed", json!(simulation.files_changed)),
        ])
    );

    if !simulation.mergeable {
        emit!(
            EventType::IntentBlocked,
            payload(vec![("reason", json!("conflicts"))])
        );
        append_sealed_batch(ctx.store.as_ref(), events)
            .await
            .map_err(|e| PipelineError::Store(e.to_string()))?;
        return Ok(PipelineOutcome::Blocked {
            trace_id,
            reason: BlockReason::Conflicts,
        });
    }

    // Step 2: Verification. The required-check set is fixed to the
    // Intent's *current* risk-level profile -- any reclassification in
    // step 3 is only consulted again when gate 1 re-evaluates it in step 5
    // (§8 scenario 5).
    let initial_profile = ctx
        .policy
        .profiles
        .resolve(intent.risk_level, intent.origin_type);
    let required_checks = intent.effective_checks(&initial_profile.checks);

    let mut checks_passed: HashSet<String> = HashSet::new();
    for check_name in &required_checks {
        if !ctx.checks.is_known(check_name) {
            continue;
        }
        match ctx.checks.run(check_name).await {
            Ok(result) => {
                if result.passed {
                    checks_passed.insert(check_name.clone());
                }
                emit!(
                    EventType::CheckCompleted,
                    payload(vec![
                        ("check", json!(result.name)),
                        ("passed", json!(result.passed)),
                        ("duration_ms", json!(result.duration_ms)),
                    ])
                );
            }
            Err(e) => {
                // §7 "CheckTimeout / CheckFailure are recorded as a failed
                // CheckResult" -- a genuine inability to run is recorded the
                // same way, never raised.
                emit!(
                    EventType::CheckCompleted,
                    payload(vec![
                        ("check", json!(check_name)),
                        ("passed", json!(false)),
                        ("error", json!(e.to_string())),
                    ])
                );
            }
        }
    }

    // Ambient security scanning: findings accumulate into gate 4's
    // evidence. Not one of the seven numbered pipeline steps; run here
    // (after verification, before risk evaluation) since findings are
    // cheap to gather and risk evaluation does not depend on them.
    for scanner in &ctx.scanners {
        if !scanner.is_available().await {
            continue;
        }
        emit!(
            EventType::SecurityScanStarted,
            payload(vec![("scanner", json!(scanner.name()))])
        );
        let opts = ScanOptions {
            intent_id: Some(intent.id.clone()),
            tenant_id: intent.tenant_id.clone(),
        };
        match scanner.scan(&intent.source, opts).await {
            Ok(findings) => {
                for finding in &findings {
                    emit!(
                        EventType::SecurityFindingDetected,
                        payload(vec![
                            ("finding_id", json!(finding.id)),
                            ("severity", json!(format!("{:?}", finding.severity))),
                            ("rule", json!(finding.rule)),
                        ])
                    );
                    ctx.store
                        .upsert_security_finding(finding.clone())
                        .await
                        .map_err(|e| PipelineError::Store(e.to_string()))?;
                }
                emit!(
                    EventType::SecurityScanCompleted,
                    payload(vec![
                        ("scanner", json!(scanner.name())),
                        ("finding_count", json!(findings.len())),
                    ])
                );
            }
            Err(_) => {
                // §7 "ScannerMissing -- skipped, recorded; never raises."
                emit!(
                    EventType::SecurityScanCompleted,
                    payload(vec![("scanner", json!(scanner.name())), ("skipped", json!(true))])
                );
            }
        }
    }

    // Step 3: Risk evaluation.
    let graph_input = GraphInput {
        intent_id: intent.id.clone(),
        target: intent.target.clone(),
        files_changed: simulation.files_changed.clone(),
        scope_hints: intent.technical.scope_hint.clone(),
        dependencies: intent.dependencies.clone(),
        co_change_pairs: Vec::new(),
    };
    let dependency_graph = build_graph(&graph_input);
    let metrics = compute_metrics(&dependency_graph);
    let risk = intentgate_risk::evaluate(intent, &simulation, &metrics, &ctx.risk_config);

    emit!(
        EventType::RiskEvaluated,
        payload(vec![
            ("risk_score", json!(risk.risk_score)),
            ("risk_level", json!(risk.risk_level.as_str())),
            ("damage_score", json!(risk.damage_score)),
            ("propagation_score", json!(risk.propagation_score)),
            ("containment_score", json!(risk.containment_score)),
            ("entropy_score", json!(risk.entropy_score)),
            ("bombs", json!(risk.bombs.iter().map(|b| b.kind.as_str()).collect::<Vec<_>>())),
        ])
    );

    if ctx.auto_classify && risk.risk_level != intent.risk_level {
        let old = intent.risk_level;
        intent.risk_level = risk.risk_level;
        emit!(
            EventType::RiskLevelReclassified,
            payload(vec![
                ("old", json!(old.as_str())),
                ("new", json!(risk.risk_level.as_str())),
            ])
        );
    }

    // Step 4: Coherence.
    let gate_profile = ctx
        .policy
        .profiles
        .resolve(intent.risk_level, intent.origin_type);

    let mut baselines = HashMap::new();
    for question in ctx.harness_config.enabled_questions() {
        if let Some(value) = ctx
            .store
            .get_baseline(&question.id)
            .await
            .map_err(|e| PipelineError::Store(e.to_string()))?
        {
            baselines.insert(question.id.clone(), value);
        }
    }

    let mut coherence = intentgate_coherence::run(
        &ctx.harness_config,
        ctx.probes.as_ref(),
        &baselines,
        gate_profile.coherence_pass,
        gate_profile.coherence_warn,
    )
    .await;

    let cross_validation_breach = risk.risk_score >= CROSS_VALIDATION_RISK_SCORE_THRESHOLD
        || !risk.bombs.is_empty();
    let downgraded = cross_validation_breach && coherence.verdict != Verdict::Fail;
    if downgraded {
        coherence.verdict = coherence.verdict.downgrade();
    }

    emit!(
        EventType::CoherenceEvaluated,
        payload(vec![
            ("score", json!(coherence.score)),
            ("verdict", json!(format!("{:?}", coherence.verdict))),
        ])
    );
    if downgraded {
        emit!(
            EventType::CoherenceInconsistency,
            payload(vec![
                ("reason", json!("risk_signals_contradict_coherence_pass")),
                ("risk_score", json!(risk.risk_score)),
            ])
        );
        emit!(
            EventType::ReviewRequested,
            payload(vec![("reason", json!("coherence_inconsistency"))])
        );
    }

    if coherence.verdict == Verdict::Fail {
        emit!(
            EventType::IntentBlocked,
            payload(vec![("reason", json!("coherence_fail"))])
        );
        append_sealed_batch(ctx.store.as_ref(), events)
            .await
            .map_err(|e| PipelineError::Store(e.to_string()))?;
        return Ok(PipelineOutcome::Blocked {
            trace_id,
            reason: BlockReason::CoherenceFail,
        });
    }

    // Step 5: Policy gates.
    let findings = ctx
        .store
        .list_security_findings(&intent.id)
        .await
        .map_err(|e| PipelineError::Store(e.to_string()))?;
    let critical_count = findings.iter().filter(|f| f.severity == Severity::Critical).count() as u32;
    let high_count = findings.iter().filter(|f| f.severity == Severity::High).count() as u32;

    let gate_evidence = GateEvidence {
        checks_passed: &checks_passed,
        containment_score: risk.containment_score,
        entropy_score: risk.entropy_score,
        security_critical_count: critical_count,
        security_high_count: high_count,
        coherence_score: coherence.score,
    };
    let gates = intentgate_policy::evaluate(&gate_profile, &gate_evidence);

    emit!(
        EventType::PolicyEvaluated,
        payload(vec![(
            "verdict",
            json!(matches!(gates.verdict, PolicyVerdict::Allow).then_some("allow").unwrap_or("block"))
        )])
    );

    if let PolicyVerdict::Block = gates.verdict {
        let first_failed = gates
            .failed_gates()
            .next()
            .map(|g| g.gate.as_str().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        emit!(
            EventType::IntentBlocked,
            payload(vec![("reason", json!(first_failed.clone()))])
        );
        append_sealed_batch(ctx.store.as_ref(), events)
            .await
            .map_err(|e| PipelineError::Store(e.to_string()))?;
        return Ok(PipelineOutcome::Blocked {
            trace_id,
            reason: BlockReason::PolicyGate(first_failed),
        });
    }

    // Step 6: Risk gate.
    let risk_gate_evidence = intentgate_policy::risk_gate::evaluate(
        &ctx.policy.risk_gate,
        &intent.id,
        risk.risk_score,
        risk.damage_score,
        risk.propagation_score,
    );

    if risk_gate_evidence.blocked {
        emit!(
            EventType::IntentBlocked,
            payload(vec![("reason", json!("risk_gate"))])
        );
        append_sealed_batch(ctx.store.as_ref(), events)
            .await
            .map_err(|e| PipelineError::Store(e.to_string()))?;
        return Ok(PipelineOutcome::Blocked {
            trace_id,
            reason: BlockReason::RiskGate,
        });
    }

    // Step 7: Finalize.
    intent
        .transition(IntentStatus::Validated)
        .map_err(|e| PipelineError::Store(e.to_string()))?;

    let decision = Decision {
        trace_id: trace_id.clone(),
        risk,
        coherence,
        gates,
        risk_gate: risk_gate_evidence,
    };

    emit!(
        EventType::IntentValidated,
        payload(vec![("decision", serde_json::to_value(&decision).unwrap_or(json!(null)))])
    );

    ctx.store
        .put_intent(intent.clone())
        .await
        .map_err(|e| PipelineError::Store(e.to_string()))?;

    append_sealed_batch(ctx.store.as_ref(), events)
        .await
        .map_err(|e| PipelineError::Store(e.to_string()))?;

    Ok(PipelineOutcome::Validated(decision))
}
