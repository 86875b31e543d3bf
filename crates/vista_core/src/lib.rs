//! # vista_core - Shared Viewer Foundations
//!
//! Types every Vista crate agrees on:
//! - [`ViewerError`]: the failure taxonomy of the viewer (required asset,
//!   optional asset, raster read, numeric edge case)
//! - [`LoadGeneration`]: monotonically increasing tokens used to discard
//!   stale asset completions
//! - Angle helpers shared by the input and render paths

pub mod error;
pub mod generation;

pub use error::{FailureClass, Result, ViewerError};
pub use generation::{Generation, LoadGeneration};

/// Maximum absolute latitude in degrees.
pub const MAX_LATITUDE: f32 = 85.0;

/// Clamp a latitude in degrees to the viewable band.
#[inline]
pub fn clamp_latitude(latitude: f32) -> f32 {
    if latitude.is_nan() {
        return 0.0;
    }
    latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE)
}

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::error::{FailureClass, Result, ViewerError};
    pub use crate::generation::{Generation, LoadGeneration};
    pub use crate::{clamp_latitude, MAX_LATITUDE};
}
