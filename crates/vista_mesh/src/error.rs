//! Mesh generation errors

use thiserror::Error;
use vista_core::ViewerError;

/// Errors raised while preparing mesh inputs
#[derive(Debug, Error)]
pub enum MeshError {
    /// Depth image has no pixels or a buffer that does not match its size
    #[error("depth raster unavailable: {0}")]
    RasterUnavailable(String),

    /// Resolution index outside the ladder
    #[error("resolution index {index} out of range (ladder has {len} entries)")]
    ResolutionIndex { index: usize, len: usize },

    /// Distance setting is NaN, infinite or negative
    #[error("invalid {name}: {value}")]
    InvalidDistance { name: &'static str, value: f32 },
}

impl From<MeshError> for ViewerError {
    fn from(e: MeshError) -> Self {
        match e {
            MeshError::RasterUnavailable(reason) => ViewerError::RasterRead(reason),
            MeshError::ResolutionIndex { index, .. } => ViewerError::InvalidSetting {
                name: "resolution_index",
                value: index.to_string(),
            },
            MeshError::InvalidDistance { name, value } => ViewerError::InvalidSetting {
                name,
                value: value.to_string(),
            },
        }
    }
}

/// Result type alias
pub type MeshResult<T> = Result<T, MeshError>;
