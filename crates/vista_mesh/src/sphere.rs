//! Latitude/longitude sphere generation

use std::f32::consts::PI;

use crate::vertex::{Bounds, SkyVertex};

/// Unit sphere laid out as `height_segments + 1` rings of
/// `width_segments + 1` vertices.
///
/// The first and last vertex of each ring share a direction but carry
/// different texture coordinates (0 and 1), which is where the UV seam lives.
#[derive(Clone, Debug)]
pub struct SphereGeometry {
    /// Segments around the equator
    pub width_segments: u32,
    /// Segments from pole to pole
    pub height_segments: u32,
    /// Vertices, ring by ring from the top pole
    pub vertices: Vec<SkyVertex>,
    /// Triangle list
    pub indices: Vec<u32>,
}

impl SphereGeometry {
    /// Generate a unit sphere.
    pub fn new(width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let stride = width_segments + 1;

        let mut vertices = Vec::with_capacity((stride * (height_segments + 1)) as usize);
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;

            // Pole vertices sit at the center of their segment in texture space.
            let pole_offset = if iy == 0 {
                0.5 / width_segments as f32
            } else if iy == height_segments {
                -0.5 / width_segments as f32
            } else {
                0.0
            };

            let theta = v * PI;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let phi = u * 2.0 * PI;

                vertices.push(SkyVertex::new(
                    [-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin()],
                    [u + pole_offset, 1.0 - v],
                ));
            }
        }

        let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * stride + ix + 1;
                let b = iy * stride + ix;
                let c = (iy + 1) * stride + ix;
                let d = (iy + 1) * stride + ix + 1;

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self {
            width_segments,
            height_segments,
            vertices,
            indices,
        }
    }

    /// Number of rings (`height_segments + 1`)
    pub fn ring_count(&self) -> u32 {
        self.height_segments + 1
    }

    /// Index of the first vertex of ring `iy`
    pub fn ring_start(&self, iy: u32) -> usize {
        (iy * (self.width_segments + 1)) as usize
    }

    /// Mirror across the YZ plane and scale uniformly.
    ///
    /// Mirroring flips the handedness of every triangle, so the faces that
    /// pointed outward now face the center.
    pub fn scale_inverted(&mut self, scale: f32) {
        for vertex in &mut self.vertices {
            let [x, y, z] = vertex.position;
            vertex.position = [-x * scale, y * scale, z * scale];
        }
    }

    /// Copy the first vertex position of each ring onto the last one.
    pub fn weld_seam(&mut self) {
        for iy in 0..self.ring_count() {
            let first = self.ring_start(iy);
            let last = first + self.width_segments as usize;
            self.vertices[last].position = self.vertices[first].position;
        }
    }

    /// Bounding box of the current positions
    pub fn bounds(&self) -> Bounds {
        Bounds::from_vertices(&self.vertices)
    }
}
