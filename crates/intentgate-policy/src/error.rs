use thiserror::Error;

/// §7 "ConfigError": invalid/missing profile config is fatal at load.
#[derive(Debug, Error)]
pub enum PolicyConfigError {
    #[error("failed to read policy config {path:?}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed policy config {path:?}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no policy config found on the load-order chain")]
    NotFound,
}
