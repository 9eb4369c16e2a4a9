//! Glue between one orchestrator run's event batch and the audit chain
//! (§4.11): every `validate()` invocation produces exactly one `trace_id`
//! batch, sealed against the store's current `chain_head` before it is
//! appended.

use intentgate_core::{Event, EventLog};
use intentgate_store::{FullStore, StoreError};

/// Seal `events` (all sharing one `trace_id`) against the store's current
/// chain head, persist the new head, then append every event in order.
/// Returns the appended ids in the same order as `events`.
pub async fn append_sealed_batch(
    store: &dyn FullStore,
    events: Vec<Event>,
) -> Result<Vec<String>, StoreError> {
    if events.is_empty() {
        return Ok(Vec::new());
    }

    let prev_head = store.get_chain_head().await?;
    let (sealed, new_head) = intentgate_audit::seal_batch(prev_head.as_deref(), events);
    store.set_chain_head(new_head).await?;

    let mut ids = Vec::with_capacity(sealed.len());
    for event in sealed {
        ids.push(store.append(event).await?);
    }
    Ok(ids)
}
