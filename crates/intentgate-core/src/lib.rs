//! Intentgate core: the Intent/Event data model, the lifecycle state machine,
//! and the Event Log contract that every other crate in the workspace builds
//! on top of.
//!
//! This crate has no I/O. `intentgate-store` supplies the persistence-backed
//! implementation of [`EventLog`]; everything here is plain data plus the
//! invariants §3 of the specification places on it.

pub mod check_result;
pub mod error;
pub mod event;
pub mod event_log;
pub mod intent;
pub mod queue_lock;
pub mod review;
pub mod security;
pub mod webhook;

pub use check_result::{CheckResult, CHECK_OUTPUT_CAP_BYTES, CHECK_TIMEOUT_SECS};
pub use error::CoreError;
pub use event::{Event, EventType};
pub use event_log::{EventLog, EventQuery};
pub use intent::{Intent, IntentStatus, OriginType, RiskLevel, Technical};
pub use queue_lock::QueueLock;
pub use review::{ReviewStatus, ReviewTask};
pub use security::{FindingCategory, SecurityFinding, Severity};
pub use webhook::{IntakeMode, WebhookDelivery};

/// Default maximum number of validation retries (§3 invariant 2).
pub const MAX_RETRIES: u32 = 3;

/// Default queue-lock TTL in seconds (§3 "Lifecycles").
pub const QUEUE_LOCK_TTL_SECS: i64 = 300;
