//! Server errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring or running the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Socket or file system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be read
    #[error("failed to read {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config value rejected
    #[error("invalid config: {0}")]
    Invalid(String),

    /// Host payload could not be parsed
    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Result type alias
pub type ServerResult<T> = Result<T, ServerError>;
