/// Tally of one queue processor pass, independent of the `QUEUE_PROCESSED`
/// event payload (which carries the same counts for the audit trail).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct QueueRunSummary {
    pub considered: u32,
    pub dependency_blocked: u32,
    pub rejected: u32,
    pub requeued: u32,
    pub queued: u32,
    pub merged: u32,
    pub skipped_pending_review: u32,
}
