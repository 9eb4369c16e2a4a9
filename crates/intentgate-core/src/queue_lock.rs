//! Queue lock token (§6 "Queue lock token", §4.10 "Queue lock").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::QUEUE_LOCK_TTL_SECS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueLock {
    pub name: String,
    pub holder: String,
    pub acquired_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl QueueLock {
    pub fn new(name: impl Into<String>, holder: impl Into<String>) -> Self {
        let acquired_at = Utc::now();
        Self {
            name: name.into(),
            holder: holder.into(),
            acquired_at,
            expires_at: acquired_at + chrono::Duration::seconds(QUEUE_LOCK_TTL_SECS),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_lock_not_expired() {
        let lock = QueueLock::new("queue", "worker-1");
        assert!(!lock.is_expired(Utc::now()));
    }

    #[test]
    fn lock_expires_after_ttl() {
        let lock = QueueLock::new("queue", "worker-1");
        let later = lock.acquired_at + chrono::Duration::seconds(QUEUE_LOCK_TTL_SECS + 1);
        assert!(lock.is_expired(later));
    }
}
