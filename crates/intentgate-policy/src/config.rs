//! Policy config loading (§6 load-order chain, §7 "ConfigError").
//!
//! Load order: an explicit path, then `.converge/policy.json`, then
//! `policy.json`, then `policy.default.json`, mirroring the teacher's
//! `Policy::from_yaml` single-document load but generalized to a fallback
//! chain instead of one fixed path.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PolicyConfigError;
use crate::profile::RiskProfiles;
use crate::risk_gate::RiskGateConfig;

const LOAD_ORDER: &[&str] = &[".converge/policy.json", "policy.json", "policy.default.json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub profiles: RiskProfiles,
    #[serde(default)]
    pub risk_gate: RiskGateConfig,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            profiles: RiskProfiles::default(),
            risk_gate: RiskGateConfig::default(),
        }
    }
}

impl PolicyConfig {
    /// Parse a config document from its raw JSON text.
    pub fn from_json(raw: &str, path: &str) -> Result<Self, PolicyConfigError> {
        serde_json::from_str(raw).map_err(|source| PolicyConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Load by walking `explicit_path` (if given) then the fixed load-order
    /// chain. A present-but-unparseable file is fatal immediately (§7); a
    /// missing file is skipped in favor of the next candidate. Returns
    /// `NotFound` only if no candidate exists anywhere on the chain.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, PolicyConfigError> {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(p) = explicit_path {
            candidates.push(p.to_path_buf());
        }
        candidates.extend(LOAD_ORDER.iter().map(PathBuf::from));

        for candidate in &candidates {
            match std::fs::read_to_string(candidate) {
                Ok(raw) => {
                    return Self::from_json(&raw, &candidate.to_string_lossy());
                }
                Err(source) if source.kind() == std::io::ErrorKind::NotFound => continue,
                Err(source) => {
                    return Err(PolicyConfigError::Io {
                        path: candidate.to_string_lossy().to_string(),
                        source,
                    })
                }
            }
        }

        Err(PolicyConfigError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = PolicyConfig::from_json("{not json", "policy.json").unwrap_err();
        assert!(matches!(err, PolicyConfigError::Parse { .. }));
    }

    #[test]
    fn empty_object_falls_back_to_defaults() {
        let config = PolicyConfig::from_json("{}", "policy.json").unwrap();
        assert_eq!(config.profiles.low.entropy_budget, 25.0);
    }

    #[test]
    fn load_with_no_candidates_present_is_not_found() {
        // Assumes the test process CWD has none of the load-order files;
        // true for a cargo test sandbox with no fixture policy.json.
        let result = PolicyConfig::load(Some(Path::new("/nonexistent/explicit/policy.json")));
        assert!(matches!(result, Err(PolicyConfigError::NotFound)));
    }
}
