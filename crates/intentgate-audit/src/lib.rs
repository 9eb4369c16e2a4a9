//! Audit Chain (§4.11): rolling SHA-256 hash over ordered event batches,
//! grounded on the `sha2` crate already used for secret redaction in
//! `intentgate-core` and for the risk-gate canary bucket in
//! `intentgate-policy`.

pub mod chain;

pub use chain::{seal_batch, verify_chain, ChainVerification, GENESIS_HEAD};
