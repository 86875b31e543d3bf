//! Vertex format for environment spheres

/// Vertex uploaded for the environment sphere.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkyVertex {
    /// Object-space position
    pub position: [f32; 3],
    /// Texture coordinates into the equirectangular color image
    pub uv: [f32; 2],
}

impl SkyVertex {
    /// Create a vertex
    pub fn new(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }

    /// Distance from the sphere center
    pub fn radius(&self) -> f32 {
        let [x, y, z] = self.position;
        (x * x + y * y + z * z).sqrt()
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds {
    /// Calculate bounds from vertices
    pub fn from_vertices(vertices: &[SkyVertex]) -> Self {
        if vertices.is_empty() {
            return Self::default();
        }

        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];

        for v in vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }

        Self { min, max }
    }

    /// Largest extent from the origin along any axis
    pub fn max_extent(&self) -> f32 {
        self.min
            .iter()
            .chain(self.max.iter())
            .fold(0.0_f32, |acc, v| acc.max(v.abs()))
    }
}
