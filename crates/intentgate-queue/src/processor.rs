//! The §4.10 queue processor, implementing the pseudocode verbatim: one
//! advisory lock holder walks `VALIDATED` Intents in priority order,
//! revalidates each (Invariant 2's freshness requirement) before it is
//! allowed to queue or merge.

use std::collections::HashMap;

use intentgate_core::{Event, EventType, IntentStatus};
use intentgate_orchestrator::{validate, append_sealed_batch, OrchestratorContext, PipelineOutcome};
use intentgate_scm::ScmPort;
use intentgate_store::{IntentQuery, StorePort};
use serde_json::{json, Map};
use uuid::Uuid;

use crate::config::QueueConfig;
use crate::error::QueueError;
use crate::summary::QueueRunSummary;

fn payload(pairs: Vec<(&str, serde_json::Value)>) -> Map<String, serde_json::Value> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Run one pass of the queue processor. Returns `Ok(None)` if the advisory
/// lock is already held by someone else (§4.10 "if lock is None: return").
pub async fn process_once(
    ctx: &OrchestratorContext,
    config: &QueueConfig,
) -> Result<Option<QueueRunSummary>, QueueError> {
    let lock = ctx
        .store
        .acquire_queue_lock(&config.lock_name, &config.holder)
        .await
        .map_err(|e| QueueError::Store(e.to_string()))?;
    if lock.is_none() {
        return Ok(None);
    }

    let result = run_locked(ctx, config).await;

    ctx.store
        .release_queue_lock(&config.lock_name, &config.holder)
        .await
        .map_err(|e| QueueError::Store(e.to_string()))?;

    result.map(Some)
}

async fn run_locked(
    ctx: &OrchestratorContext,
    config: &QueueConfig,
) -> Result<QueueRunSummary, QueueError> {
    let mut summary = QueueRunSummary::default();

    let intents = ctx
        .store
        .list_intents(
            IntentQuery::default()
                .with_status(IntentStatus::Validated)
                .with_limit(config.batch_limit),
        )
        .await
        .map_err(|e| QueueError::Store(e.to_string()))?;

    // Resolve every referenced dependency's status once, before this pass
    // mutates anything. A dependency merged earlier in this same pass must
    // still block its dependents here; it only unblocks them next pass.
    let mut dependency_status: HashMap<String, Option<IntentStatus>> = HashMap::new();
    for intent in &intents {
        for dep_id in &intent.dependencies {
            if dependency_status.contains_key(dep_id) {
                continue;
            }
            let status = ctx
                .store
                .get_intent(dep_id)
                .await
                .map_err(|e| QueueError::Store(e.to_string()))?
                .map(|d| d.status);
            dependency_status.insert(dep_id.clone(), status);
        }
    }

    for mut intent in intents {
        summary.considered += 1;
        let trace_id = Uuid::new_v4().to_string();
        let mut events: Vec<Event> = Vec::new();

        // Dependency skip (P9): left at VALIDATED for the next run.
        let mut blocking_dep: Option<String> = None;
        for dep_id in &intent.dependencies {
            let dep_status = dependency_status.get(dep_id).copied().flatten();
            if dep_status != Some(IntentStatus::Merged) {
                blocking_dep = Some(dep_id.clone());
                break;
            }
        }
        if let Some(dep_id) = blocking_dep {
            events.push(
                Event::new(trace_id.clone(), EventType::IntentDependencyBlocked, Some(intent.id.clone()))
                    .with_payload(payload(vec![("dependency", json!(dep_id))])),
            );
            append_sealed_batch(ctx.store.as_ref(), events)
                .await
                .map_err(|e| QueueError::Store(e.to_string()))?;
            summary.dependency_blocked += 1;
            continue;
        }

        if intent.retries >= config.max_retries {
            intent.status = IntentStatus::Rejected;
            events.push(
                Event::new(trace_id.clone(), EventType::IntentRejected, Some(intent.id.clone()))
                    .with_payload(payload(vec![("reason", json!("retry_bound_exceeded"))])),
            );
            ctx.store
                .put_intent(intent)
                .await
                .map_err(|e| QueueError::Store(e.to_string()))?;
            append_sealed_batch(ctx.store.as_ref(), events)
                .await
                .map_err(|e| QueueError::Store(e.to_string()))?;
            summary.rejected += 1;
            continue;
        }

        let reviews = ctx
            .store
            .list_review_tasks(&intent.id)
            .await
            .map_err(|e| QueueError::Store(e.to_string()))?;
        if reviews.iter().any(|r| r.status.is_pending()) {
            summary.skipped_pending_review += 1;
            continue;
        }
        if reviews.iter().any(|r| r.status.is_rejected()) {
            intent.status = IntentStatus::Rejected;
            events.push(
                Event::new(trace_id.clone(), EventType::IntentRejected, Some(intent.id.clone()))
                    .with_payload(payload(vec![("reason", json!("review_rejected"))])),
            );
            ctx.store
                .put_intent(intent)
                .await
                .map_err(|e| QueueError::Store(e.to_string()))?;
            append_sealed_batch(ctx.store.as_ref(), events)
                .await
                .map_err(|e| QueueError::Store(e.to_string()))?;
            summary.rejected += 1;
            continue;
        }

        // Invariant 2: a fresh simulation/validation, not the Intent's last
        // stored decision, governs whether it actually queues.
        let outcome = validate(&mut intent, ctx)
            .await
            .map_err(|e| QueueError::Pipeline(e.to_string()))?;

        match outcome {
            PipelineOutcome::Blocked { .. } => {
                intent.retries += 1;
                if intent.retries >= config.max_retries {
                    intent.status = IntentStatus::Rejected;
                    events.push(
                        Event::new(trace_id.clone(), EventType::IntentRejected, Some(intent.id.clone()))
                            .with_payload(payload(vec![("reason", json!("retry_bound_exceeded"))])),
                    );
                    summary.rejected += 1;
                } else {
                    intent.status = IntentStatus::Ready;
                    events.push(
                        Event::new(trace_id.clone(), EventType::IntentRequeued, Some(intent.id.clone()))
                            .with_payload(payload(vec![("retries", json!(intent.retries))])),
                    );
                    summary.requeued += 1;
                }
                ctx.store
                    .put_intent(intent)
                    .await
                    .map_err(|e| QueueError::Store(e.to_string()))?;
                append_sealed_batch(ctx.store.as_ref(), events)
                    .await
                    .map_err(|e| QueueError::Store(e.to_string()))?;
            }
            PipelineOutcome::Validated(_) => {
                intent
                    .transition(IntentStatus::Queued)
                    .map_err(|e| QueueError::Pipeline(e.to_string()))?;
                summary.queued += 1;

                if config.auto_confirm {
                    let sha = ctx
                        .scm
                        .execute_merge(&intent.source, &intent.target)
                        .await
                        .map_err(|e| QueueError::Scm(e.to_string()))?;
                    intent
                        .transition(IntentStatus::Merged)
                        .map_err(|e| QueueError::Pipeline(e.to_string()))?;
                    events.push(
                        Event::new(trace_id.clone(), EventType::IntentMerged, Some(intent.id.clone()))
                            .with_payload(payload(vec![("sha", json!(sha))])),
                    );
                    summary.merged += 1;
                }

                ctx.store
                    .put_intent(intent)
                    .await
                    .map_err(|e| QueueError::Store(e.to_string()))?;
                if !events.is_empty() {
                    append_sealed_batch(ctx.store.as_ref(), events)
                        .await
                        .map_err(|e| QueueError::Store(e.to_string()))?;
                }
            }
        }
    }

    let processed_trace_id = Uuid::new_v4().to_string();
    let processed_event = Event::new(processed_trace_id, EventType::QueueProcessed, None).with_payload(payload(vec![
        ("considered", json!(summary.considered)),
        ("queued", json!(summary.queued)),
        ("merged", json!(summary.merged)),
        ("requeued", json!(summary.requeued)),
        ("rejected", json!(summary.rejected)),
        ("dependency_blocked", json!(summary.dependency_blocked)),
    ]));
    append_sealed_batch(ctx.store.as_ref(), vec![processed_event])
        .await
        .map_err(|e| QueueError::Store(e.to_string()))?;

    Ok(summary)
}
