//! Scanner Port (§4.4): pluggable security scanners returning a normalized
//! finding model (`intentgate_core::SecurityFinding`).

pub mod error;
pub mod mock;
pub mod port;

pub use error::ScannerError;
pub use mock::MockScanner;
pub use port::{ScanOptions, ScannerPort, SAST_TIMEOUT_SECS, SCA_TIMEOUT_SECS};
