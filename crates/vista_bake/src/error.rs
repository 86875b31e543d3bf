//! Bake errors

use std::path::PathBuf;

use thiserror::Error;

use vista_asset::AssetError;

/// Errors raised by the bake tools
#[derive(Debug, Error)]
pub enum BakeError {
    /// Input image could not be read
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Output image could not be written
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Parameter out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Saving into the environment store failed
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Completion record could not be serialized
    #[error("failed to encode completion record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
pub type BakeResult<T> = Result<T, BakeError>;
