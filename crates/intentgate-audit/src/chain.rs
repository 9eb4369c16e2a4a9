//! Rolling SHA-256 audit chain (§4.11): `h' = SHA256(prev_head ||
//! canonical_bytes(batch))` per `trace_id` batch, with `chain_head` updated
//! atomically by the caller (the store owns `chain_head` persistence via
//! `StorePort::get_chain_head`/`set_chain_head`; this crate is pure
//! compute).
//!
//! The chain's own hash has nowhere else to live between append calls, so
//! each batch stamps `chain_prev`/`chain_hash` into the `evidence` map of
//! its last event before the batch is appended — `evidence` is already a
//! free-form per-event map (§3), and this is the only field a
//! post-hoc-computed hash can ride in without mutating an already-appended
//! event.

use intentgate_core::Event;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

const CHAIN_PREV_KEY: &str = "chain_prev";
const CHAIN_HASH_KEY: &str = "chain_hash";

/// Genesis previous-head value, used for the very first batch on a chain.
pub const GENESIS_HEAD: &str = "";

fn canonical_bytes(batch: &[Event]) -> Vec<u8> {
    // serde_json::Map is a BTreeMap without the `preserve_order` feature, so
    // object keys always serialize sorted: this is already canonical.
    serde_json::to_vec(batch).expect("Event serialization is infallible")
}

fn strip_chain_fields(batch: &[Event]) -> Vec<Event> {
    let mut batch = batch.to_vec();
    if let Some(last) = batch.last_mut() {
        last.evidence.remove(CHAIN_PREV_KEY);
        last.evidence.remove(CHAIN_HASH_KEY);
    }
    batch
}

fn rolling_hash(prev_head: &str, batch: &[Event]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prev_head.as_bytes());
    hasher.update(canonical_bytes(batch));
    hex::encode(hasher.finalize())
}

/// Seal one `trace_id` batch: compute its rolling hash over `prev_head` and
/// stamp `chain_prev`/`chain_hash` onto the last event. Returns the sealed
/// batch (ready to append) and the new chain head.
pub fn seal_batch(prev_head: Option<&str>, mut batch: Vec<Event>) -> (Vec<Event>, String) {
    let prev = prev_head.unwrap_or(GENESIS_HEAD).to_string();
    let hash = rolling_hash(&prev, &batch);

    if let Some(last) = batch.last_mut() {
        last.evidence
            .insert(CHAIN_PREV_KEY.to_string(), Value::String(prev));
        last.evidence
            .insert(CHAIN_HASH_KEY.to_string(), Value::String(hash.clone()));
    }

    (batch, hash)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChainVerification {
    Sound,
    /// `batch_index` is the 0-based ordinal of the first `trace_id` batch
    /// whose recomputed hash does not match its stamped `chain_hash`.
    Tampered {
        batch_index: usize,
        trace_id: String,
        expected_hash: String,
        found_hash: Option<String>,
    },
}

/// Group `events` (already in append/chronological order) into contiguous
/// runs sharing one `trace_id` (§5 "Ordering guarantees": same-trace events
/// are always contiguous in retrieval order).
fn batches(events: &[Event]) -> Vec<&[Event]> {
    let mut out = Vec::new();
    let mut start = 0;
    for i in 1..events.len() {
        if events[i].trace_id != events[start].trace_id {
            out.push(&events[start..i]);
            start = i;
        }
    }
    if start < events.len() {
        out.push(&events[start..]);
    }
    out
}

/// §4.11 `verify_chain()`: streams `events` in order, recomputes each
/// batch's rolling hash, and returns the first batch whose stamped
/// `chain_hash` disagrees with the recomputed value. `events` must be
/// supplied oldest-first; the store's own ordering convention is
/// newest-first (§4.1), so callers reverse before verifying.
pub fn verify_chain(events: &[Event]) -> ChainVerification {
    let mut prev_head = GENESIS_HEAD.to_string();

    for (index, batch) in batches(events).into_iter().enumerate() {
        let last = batch.last().expect("batches() never yields an empty slice");
        let found_hash = last
            .evidence
            .get(CHAIN_HASH_KEY)
            .and_then(Value::as_str)
            .map(str::to_string);

        let stripped = strip_chain_fields(batch);
        let expected_hash = rolling_hash(&prev_head, &stripped);

        match &found_hash {
            Some(h) if *h == expected_hash => {
                prev_head = expected_hash;
            }
            _ => {
                return ChainVerification::Tampered {
                    batch_index: index,
                    trace_id: last.trace_id.clone(),
                    expected_hash,
                    found_hash,
                };
            }
        }
    }

    ChainVerification::Sound
}

#[cfg(test)]
mod tests {
    use super::*;
    use intentgate_core::EventType;

    fn batch(trace_id: &str, n: usize) -> Vec<Event> {
        (0..n)
            .map(|_| Event::new(trace_id, EventType::IntentCreated, None))
            .collect()
    }

    #[test]
    fn untampered_chain_verifies_sound() {
        let (sealed_a, head_a) = seal_batch(None, batch("t1", 2));
        let (sealed_b, _head_b) = seal_batch(Some(&head_a), batch("t2", 3));

        let mut all = sealed_a;
        all.extend(sealed_b);

        assert!(matches!(verify_chain(&all), ChainVerification::Sound));
    }

    #[test]
    fn tampering_a_payload_flags_its_batch_index() {
        let (sealed_a, head_a) = seal_batch(None, batch("t1", 2));
        let (sealed_b, _) = seal_batch(Some(&head_a), batch("t2", 3));

        let mut all = sealed_a;
        all.extend(sealed_b);

        // Tamper with an event inside the second batch (index 1).
        all[3]
            .payload
            .insert("tampered".to_string(), Value::Bool(true));

        match verify_chain(&all) {
            ChainVerification::Tampered { batch_index, .. } => assert_eq!(batch_index, 1),
            ChainVerification::Sound => panic!("expected tampering to be detected"),
        }
    }

    #[test]
    fn tampering_first_batch_does_not_false_flag_later_batches() {
        let (mut sealed_a, head_a) = seal_batch(None, batch("t1", 2));
        let (sealed_b, _) = seal_batch(Some(&head_a), batch("t2", 1));

        sealed_a[0]
            .payload
            .insert("tampered".to_string(), Value::Bool(true));

        let mut all = sealed_a;
        all.extend(sealed_b);

        match verify_chain(&all) {
            ChainVerification::Tampered { batch_index, .. } => assert_eq!(batch_index, 0),
            ChainVerification::Sound => panic!("expected tampering to be detected"),
        }
    }

    #[test]
    fn empty_log_is_sound() {
        assert!(matches!(verify_chain(&[]), ChainVerification::Sound));
    }
}
