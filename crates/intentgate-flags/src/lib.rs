//! Feature Flags (§6): three-tier resolution (defaults -> config ->
//! environment, env wins), typed `{enabled, mode}` states, and the
//! percentage-rollout bucket hash shared with the policy engine's risk
//! gate (§4.8).

pub mod error;
pub mod resolver;
pub mod rollout;
pub mod types;

pub use error::FlagsError;
pub use resolver::FeatureFlags;
pub use rollout::{bucket, in_percentage_rollout};
pub use types::{FlagMode, FlagState};
