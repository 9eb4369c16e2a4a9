//! Coherence Harness (§4.7): a configured list of probe commands with
//! baseline-relative assertions, scored and classified into PASS/WARN/FAIL.
//! The assertion grammar is a small explicit AST (§9 "Replacing runtime
//! subprocess evaluation") — never a general expression evaluator.

pub mod error;
pub mod expr;
pub mod harness;
pub mod mock;
pub mod probe;
pub mod question;

pub use error::CoherenceError;
pub use harness::{run, CoherenceResult, QuestionOutcome, Verdict};
pub use mock::MockProbeRunner;
pub use probe::{ProbePort, ProcessProbeRunner, PROBE_TIMEOUT_SECS};
pub use question::{HarnessConfig, Question, QuestionSeverity};
