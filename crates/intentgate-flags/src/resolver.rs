//! Three-tier flag resolution: defaults -> config file -> environment
//! variables, env always wins (§6 "Feature flag precedence"). Storage
//! shape follows the teacher's `FeatureFlags` (`RwLock<HashMap<String,
//! Flag>>`, `tracing::info!` on mutation), generalized from a single map to
//! the layered precedence chain the spec requires.

use std::collections::HashMap;
use std::env;

use parking_lot::RwLock;

use crate::error::FlagsError;
use crate::types::{FlagMode, FlagState};

fn env_var_name(flag_name: &str) -> String {
    let mut normalized = String::with_capacity(flag_name.len() + 16);
    normalized.push_str("INTENTGATE_FLAG_");
    for ch in flag_name.chars() {
        if ch.is_ascii_alphanumeric() {
            normalized.push(ch.to_ascii_uppercase());
        } else {
            normalized.push('_');
        }
    }
    normalized
}

fn parse_env_override(raw: &str) -> Option<FlagState> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "off" | "disabled" => Some(FlagState::off()),
        "shadow" => Some(FlagState::shadow()),
        "enforce" | "on" | "enabled" => Some(FlagState::enforce()),
        _ => None,
    }
}

/// Layered flag registry. `defaults` is the code-level fallback; `config`
/// overrides are merged in at load time via [`FeatureFlags::apply_config`];
/// environment variables are consulted fresh on every [`resolve`] call so a
/// changed environment takes effect without a restart.
///
/// [`resolve`]: FeatureFlags::resolve
pub struct FeatureFlags {
    defaults: RwLock<HashMap<String, FlagState>>,
    config: RwLock<HashMap<String, FlagState>>,
}

impl FeatureFlags {
    pub fn new(defaults: HashMap<String, FlagState>) -> Self {
        Self {
            defaults: RwLock::new(defaults),
            config: RwLock::new(HashMap::new()),
        }
    }

    pub fn set_default(&self, name: impl Into<String>, state: FlagState) {
        let name = name.into();
        tracing::info!(flag = %name, tier = "default", "feature flag set");
        self.defaults.write().insert(name, state);
    }

    /// Merge config-file overrides (tier 2) in from a JSON object mapping
    /// flag name to [`FlagState`]. Malformed config is a `ConfigError`
    /// (§7), fatal at load.
    pub fn apply_config(&self, raw_json: &str) -> Result<(), FlagsError> {
        let overrides: HashMap<String, FlagState> =
            serde_json::from_str(raw_json).map_err(FlagsError::Parse)?;
        let mut config = self.config.write();
        for (name, state) in overrides {
            tracing::info!(flag = %name, tier = "config", "feature flag overridden");
            config.insert(name, state);
        }
        Ok(())
    }

    /// Resolve one flag's effective state: defaults -> config -> env, env
    /// wins when the corresponding `INTENTGATE_FLAG_<NAME>` variable is
    /// set to a recognized value (`off`, `shadow`, `enforce`).
    pub fn resolve(&self, name: &str) -> FlagState {
        if let Ok(raw) = env::var(env_var_name(name)) {
            if let Some(state) = parse_env_override(&raw) {
                return state;
            }
        }

        if let Some(state) = self.config.read().get(name).copied() {
            return state;
        }

        self.defaults
            .read()
            .get(name)
            .copied()
            .unwrap_or_else(FlagState::off)
    }

    pub fn is_active_for(&self, name: &str, subject_id: &str) -> bool {
        self.resolve(name).is_active_for(subject_id)
    }

    pub fn mode_of(&self, name: &str) -> FlagMode {
        self.resolve(name).mode
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_else_set() {
        let flags = FeatureFlags::default();
        flags.set_default("x", FlagState::enforce());
        assert_eq!(flags.resolve("x").mode, FlagMode::Enforce);
    }

    #[test]
    fn config_overrides_default() {
        let flags = FeatureFlags::default();
        flags.set_default("x", FlagState::enforce());
        flags
            .apply_config(r#"{"x": {"enabled": true, "mode": "shadow"}}"#)
            .unwrap();
        assert_eq!(flags.resolve("x").mode, FlagMode::Shadow);
    }

    #[test]
    fn unknown_flag_defaults_to_off() {
        let flags = FeatureFlags::default();
        assert_eq!(flags.resolve("nonexistent").mode, FlagMode::Off);
        assert!(!flags.resolve("nonexistent").enabled);
    }

    #[test]
    fn malformed_config_is_a_parse_error() {
        let flags = FeatureFlags::default();
        assert!(flags.apply_config("{not json").is_err());
    }
}
