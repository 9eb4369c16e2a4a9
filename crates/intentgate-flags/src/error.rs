use thiserror::Error;

/// §7 "ConfigError": malformed flag config is fatal at load.
#[derive(Debug, Error)]
pub enum FlagsError {
    #[error("malformed feature flag config: {0}")]
    Parse(#[source] serde_json::Error),
}
