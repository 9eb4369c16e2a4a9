//! Queue Processor (§4.10): the advisory-locked worker that walks
//! `VALIDATED` Intents, revalidates each, and queues or merges them.

pub mod config;
pub mod error;
pub mod processor;
pub mod summary;

pub use config::QueueConfig;
pub use error::QueueError;
pub use processor::process_once;
pub use summary::QueueRunSummary;
