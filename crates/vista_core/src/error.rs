//! Error types for the viewer

use thiserror::Error;

/// How a failure degrades the viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// The environment load is aborted; the previous mesh stays on screen.
    RequiredAsset,
    /// The environment loads without depth displacement.
    OptionalAsset,
    /// Displacement is skipped; the sphere stays plain.
    RasterRead,
    /// A single element or frame is skipped.
    Numeric,
    /// The request itself was malformed.
    Request,
}

/// The viewer error type
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Color image could not be fetched or decoded
    #[error("required asset '{path}' failed: {reason}")]
    RequiredAsset { path: String, reason: String },

    /// Depth image could not be fetched or decoded
    #[error("optional asset '{path}' unavailable: {reason}")]
    OptionalAsset { path: String, reason: String },

    /// Depth raster could not be read back from the decoded image
    #[error("depth raster unavailable: {0}")]
    RasterRead(String),

    /// A value would have put NaN or infinity into geometry or orientation
    #[error("non-finite value for {0}")]
    NonFinite(&'static str),

    /// Setting value rejected
    #[error("invalid value {value} for {name}")]
    InvalidSetting { name: &'static str, value: String },

    /// Environment not present in the listing
    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),
}

impl ViewerError {
    /// Classify this error.
    pub fn class(&self) -> FailureClass {
        match self {
            Self::RequiredAsset { .. } => FailureClass::RequiredAsset,
            Self::OptionalAsset { .. } => FailureClass::OptionalAsset,
            Self::RasterRead(_) => FailureClass::RasterRead,
            Self::NonFinite(_) => FailureClass::Numeric,
            Self::InvalidSetting { .. } | Self::UnknownEnvironment(_) => FailureClass::Request,
        }
    }

    /// Log level this error is reported at.
    pub fn level(&self) -> log::Level {
        match self.class() {
            FailureClass::RequiredAsset => log::Level::Error,
            FailureClass::OptionalAsset | FailureClass::RasterRead | FailureClass::Request => {
                log::Level::Warn
            }
            FailureClass::Numeric => log::Level::Debug,
        }
    }

    /// Emit this error through the `log` facade at its level.
    pub fn report(&self) {
        log::log!(self.level(), "{}", self);
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ViewerError>;
