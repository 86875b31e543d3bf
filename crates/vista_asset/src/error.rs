//! Asset errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while listing, fetching, decoding or storing environments
#[derive(Debug, Error)]
pub enum AssetError {
    /// File system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Asset does not exist at the source
    #[error("not found: {0}")]
    NotFound(String),

    /// HTTP transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Image bytes could not be decoded
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// Image could not be encoded to disk
    #[error("failed to write {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Listing JSON was malformed
    #[error("invalid listing: {0}")]
    Json(#[from] serde_json::Error),

    /// Source string is neither a directory nor an http(s) URL
    #[error("invalid source: {0}")]
    InvalidSource(String),

    /// URL could not be built
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Environment name escapes the environments directory
    #[error("invalid environment name: {0:?}")]
    InvalidName(String),

    /// Depth batch does not line up with the color batch
    #[error("number of environment textures ({colors}) and depth maps ({depths}) must be equivalent")]
    BatchMismatch { colors: usize, depths: usize },

    /// Async runtime could not be created
    #[error("runtime error: {0}")]
    Runtime(String),

    /// Directory watcher failure
    #[error("watch error: {0}")]
    Watch(String),
}

/// Result type alias
pub type AssetResult<T> = Result<T, AssetError>;
