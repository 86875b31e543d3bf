//! Environment mesh construction
//!
//! Picks the sphere resolution from the settings and the depth raster,
//! displaces every vertex along its direction by the sampled depth and welds
//! the UV seam afterwards.

use image::DynamicImage;

use crate::sampler::DepthRaster;
use crate::settings::{MeshSettings, RESOLUTION_LADDER};
use crate::sphere::SphereGeometry;
use crate::vertex::{Bounds, SkyVertex};

/// Scale applied to the plain sphere used when no depth is available.
pub const FALLBACK_SCALE: f32 = 100.0;

/// Segments around the equator of the plain sphere.
pub const FALLBACK_RESOLUTION: u32 = RESOLUTION_LADDER[0];

/// A built environment sphere, ready for upload.
#[derive(Clone, Debug)]
pub struct EnvironmentMesh {
    geometry: SphereGeometry,
    scale: f32,
    displaced: bool,
}

impl EnvironmentMesh {
    /// Vertex data
    pub fn vertices(&self) -> &[SkyVertex] {
        &self.geometry.vertices
    }

    /// Triangle list
    pub fn indices(&self) -> &[u32] {
        &self.geometry.indices
    }

    /// Segments around the equator
    pub fn width_segments(&self) -> u32 {
        self.geometry.width_segments
    }

    /// Segments from pole to pole
    pub fn height_segments(&self) -> u32 {
        self.geometry.height_segments
    }

    /// Uniform scale applied before displacement
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Whether depth displacement was applied
    pub fn is_displaced(&self) -> bool {
        self.displaced
    }

    /// Vertices of latitude ring `iy`
    pub fn ring(&self, iy: u32) -> &[SkyVertex] {
        let start = self.geometry.ring_start(iy);
        &self.geometry.vertices[start..start + self.geometry.width_segments as usize + 1]
    }

    /// Number of latitude rings
    pub fn ring_count(&self) -> u32 {
        self.geometry.ring_count()
    }

    /// Bounding box
    pub fn bounds(&self) -> Bounds {
        self.geometry.bounds()
    }
}

/// Builds [`EnvironmentMesh`]es for one set of [`MeshSettings`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MeshBuilder {
    settings: MeshSettings,
}

impl MeshBuilder {
    /// Create a builder
    pub fn new(settings: MeshSettings) -> Self {
        Self { settings }
    }

    /// Settings in use
    pub fn settings(&self) -> &MeshSettings {
        &self.settings
    }

    /// Sphere segments for the given raster.
    ///
    /// With depth the requested resolution is capped by the raster size, so
    /// there are never more vertices than depth samples.
    pub fn segments_for(&self, depth: Option<&DepthRaster>) -> (u32, u32) {
        match depth {
            Some(raster) => {
                let requested = self.settings.resolution();
                (
                    requested.min(raster.width()),
                    (requested / 2).min(raster.height()),
                )
            }
            None => (FALLBACK_RESOLUTION, FALLBACK_RESOLUTION / 2),
        }
    }

    /// Build from an already extracted raster.
    pub fn build(&self, depth: Option<&DepthRaster>) -> EnvironmentMesh {
        let (width_segments, height_segments) = self.segments_for(depth);
        let mut geometry = SphereGeometry::new(width_segments, height_segments);

        let Some(raster) = depth else {
            log::info!(
                "Creating environment mesh without depth ({}x{}, scale {})",
                geometry.width_segments,
                geometry.height_segments,
                FALLBACK_SCALE
            );
            geometry.scale_inverted(FALLBACK_SCALE);
            return EnvironmentMesh {
                geometry,
                scale: FALLBACK_SCALE,
                displaced: false,
            };
        };

        geometry.scale_inverted(1.0);
        let skipped = self.displace(&mut geometry, raster);
        geometry.weld_seam();

        if skipped > 0 {
            log::debug!("{} vertices kept their base radius (non-finite factor)", skipped);
        }
        log::info!(
            "Created environment mesh {}x{} (min {}, range {})",
            geometry.width_segments,
            geometry.height_segments,
            self.settings.min_distance,
            self.settings.depth_range
        );

        EnvironmentMesh {
            geometry,
            scale: 1.0,
            displaced: true,
        }
    }

    /// Build from a decoded depth image.
    ///
    /// If the raster cannot be read the mesh falls back to the plain sphere.
    pub fn build_from_image(&self, depth: Option<&DynamicImage>) -> EnvironmentMesh {
        let raster = depth.and_then(|image| match DepthRaster::from_image(image) {
            Ok(raster) => Some(raster),
            Err(e) => {
                log::warn!("Skipping depth displacement: {}", e);
                None
            }
        });
        self.build(raster.as_ref())
    }

    /// Scale each vertex by its depth factor. Returns how many were left alone.
    fn displace(&self, geometry: &mut SphereGeometry, raster: &DepthRaster) -> usize {
        let mut skipped = 0;
        for vertex in &mut geometry.vertices {
            let u = vertex.uv[0];
            let v = 1.0 - vertex.uv[1];

            let factor = self.settings.radius_for(raster.sample_edge(u, v));
            if !factor.is_finite() {
                skipped += 1;
                continue;
            }

            let [x, y, z] = vertex.position;
            vertex.position = [x * factor, y * factor, z * factor];
        }
        skipped
    }
}
