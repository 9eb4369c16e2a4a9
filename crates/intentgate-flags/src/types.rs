//! Flag typing (§6 "Flags are typed `{enabled:bool, mode: off|shadow|enforce}`").

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagMode {
    Off,
    Shadow,
    Enforce,
}

/// Resolved state of one flag. `rollout_pct` is optional percentage-based
/// targeting (§ teacher `FlagValue::Percentage`), orthogonal to `mode`:
/// `mode` governs whether an active flag merely observes (`shadow`) or
/// actually acts (`enforce`); `rollout_pct` governs what fraction of
/// subjects the flag is active for at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FlagState {
    pub enabled: bool,
    pub mode: FlagMode,
    #[serde(default)]
    pub rollout_pct: Option<u8>,
}

impl FlagState {
    pub fn off() -> Self {
        Self {
            enabled: false,
            mode: FlagMode::Off,
            rollout_pct: None,
        }
    }

    pub fn enforce() -> Self {
        Self {
            enabled: true,
            mode: FlagMode::Enforce,
            rollout_pct: None,
        }
    }

    pub fn shadow() -> Self {
        Self {
            enabled: true,
            mode: FlagMode::Shadow,
            rollout_pct: None,
        }
    }

    pub fn with_rollout_pct(mut self, pct: u8) -> Self {
        self.rollout_pct = Some(pct);
        self
    }

    /// Whether the flag is active for `subject_id`: `enabled` and (if a
    /// rollout percentage is set) the subject falls inside the bucket.
    pub fn is_active_for(&self, subject_id: &str) -> bool {
        if !self.enabled {
            return false;
        }
        match self.rollout_pct {
            Some(pct) => crate::rollout::in_percentage_rollout(subject_id, pct),
            None => true,
        }
    }
}
