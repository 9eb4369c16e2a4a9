/// One queue processor run's configuration (§4.10).
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Advisory lock name; one queue runs per store per lock name.
    pub lock_name: String,
    /// This worker's identity, stamped into the lock and releasable only by
    /// the same holder.
    pub holder: String,
    /// `limit=N` in the pseudocode's `list(...)` call.
    pub batch_limit: usize,
    /// §3 invariant 2's retry bound; defaults to [`intentgate_core::MAX_RETRIES`].
    pub max_retries: u32,
    /// §4.10 "auto_confirm": whether a successfully validated, queued Intent
    /// immediately executes its merge.
    pub auto_confirm: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            lock_name: "queue".to_string(),
            holder: format!("worker-{}", uuid::Uuid::new_v4()),
            batch_limit: 50,
            max_retries: intentgate_core::MAX_RETRIES,
            auto_confirm: false,
        }
    }
}
