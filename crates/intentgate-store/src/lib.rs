//! Store Port and its reference/production implementations (§4.1, §6).

pub mod error;
pub mod memory;
pub mod port;
pub mod retry;
#[cfg(feature = "sqlx-backend")]
pub mod sqlx_store;

pub use error::StoreError;
pub use intentgate_core::EventLog;
pub use memory::InMemoryStore;
pub use port::{IntentQuery, StorePort};
pub use retry::with_backoff;
#[cfg(feature = "sqlx-backend")]
pub use sqlx_store::SqlxStore;

/// Combined bound callers depend on so `Arc<dyn FullStore>` works across
/// crate boundaries without re-stating both traits everywhere.
pub trait FullStore: EventLog<Error = StoreError> + StorePort<Error = StoreError> {}

impl<T> FullStore for T where T: EventLog<Error = StoreError> + StorePort<Error = StoreError> {}
