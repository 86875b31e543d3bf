//! Mesh settings and the resolution ladder

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};

/// Angular resolution presets (segments around the equator).
pub const RESOLUTION_LADDER: [u32; 9] = [512, 768, 1024, 1536, 2048, 3072, 4096, 6144, 8192];

/// Ladder index used when nothing else is configured.
pub const DEFAULT_RESOLUTION_INDEX: usize = 2;

/// User-adjustable mesh parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    /// Radius of the nearest possible surface
    pub min_distance: f32,
    /// Extra radius added for the farthest depth value
    pub depth_range: f32,
    /// Index into [`RESOLUTION_LADDER`]
    pub resolution_index: usize,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            min_distance: 2.0,
            depth_range: 3.0,
            resolution_index: DEFAULT_RESOLUTION_INDEX,
        }
    }
}

impl MeshSettings {
    /// Requested segments around the equator
    pub fn resolution(&self) -> u32 {
        RESOLUTION_LADDER[self.resolution_index.min(RESOLUTION_LADDER.len() - 1)]
    }

    /// Radius for a normalized depth sample (1.0 is nearest).
    pub fn radius_for(&self, sample: f32) -> f32 {
        let mut depth = 1.0 - sample;
        if depth.is_nan() {
            depth = 0.0;
        }
        self.min_distance + depth * self.depth_range
    }

    /// Set the minimum distance
    pub fn set_min_distance(&mut self, value: f32) -> MeshResult<()> {
        self.min_distance = check_distance("min_distance", value)?;
        Ok(())
    }

    /// Set the depth range
    pub fn set_depth_range(&mut self, value: f32) -> MeshResult<()> {
        self.depth_range = check_distance("depth_range", value)?;
        Ok(())
    }

    /// Set the resolution ladder index
    pub fn set_resolution_index(&mut self, index: usize) -> MeshResult<()> {
        if index >= RESOLUTION_LADDER.len() {
            return Err(MeshError::ResolutionIndex {
                index,
                len: RESOLUTION_LADDER.len(),
            });
        }
        self.resolution_index = index;
        Ok(())
    }

    /// Validate every field
    pub fn validate(&self) -> MeshResult<()> {
        check_distance("min_distance", self.min_distance)?;
        check_distance("depth_range", self.depth_range)?;
        if self.resolution_index >= RESOLUTION_LADDER.len() {
            return Err(MeshError::ResolutionIndex {
                index: self.resolution_index,
                len: RESOLUTION_LADDER.len(),
            });
        }
        Ok(())
    }
}

fn check_distance(name: &'static str, value: f32) -> MeshResult<f32> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(MeshError::InvalidDistance { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let settings = MeshSettings::default();
        assert_eq!(settings.min_distance, 2.0);
        assert_eq!(settings.depth_range, 3.0);
        assert_eq!(settings.resolution(), 1024);
    }

    #[test]
    fn test_radius_polarity() {
        let settings = MeshSettings::default();
        assert_relative_eq!(settings.radius_for(1.0), 2.0);
        assert_relative_eq!(settings.radius_for(0.0), 5.0);
        assert_relative_eq!(settings.radius_for(f32::NAN), 2.0);
    }

    #[test]
    fn test_setters_reject_bad_values() {
        let mut settings = MeshSettings::default();
        assert!(settings.set_min_distance(f32::NAN).is_err());
        assert!(settings.set_depth_range(-1.0).is_err());
        assert!(settings.set_resolution_index(RESOLUTION_LADDER.len()).is_err());
        assert_eq!(settings, MeshSettings::default());

        settings.set_resolution_index(8).unwrap();
        assert_eq!(settings.resolution(), 8192);
    }
}
