//! # vista_mesh - Environment Sphere Generation
//!
//! Builds the sphere an environment is projected onto:
//! - [`SphereGeometry`]: latitude/longitude sphere, inverted so it is seen
//!   from inside
//! - [`DepthRaster`]: nearest-pixel depth lookup over a decoded depth image
//! - [`MeshBuilder`]: chooses the resolution, displaces vertices by depth and
//!   welds the UV seam
//!
//! ## Example
//!
//! ```ignore
//! use vista_mesh::prelude::*;
//!
//! let settings = MeshSettings::default();
//! let raster = DepthRaster::from_image(&depth_image)?;
//! let mesh = MeshBuilder::new(settings).build(Some(&raster));
//! assert!(mesh.is_displaced());
//! ```

pub mod builder;
pub mod error;
pub mod sampler;
pub mod settings;
pub mod sphere;
pub mod vertex;

pub use builder::{EnvironmentMesh, MeshBuilder, FALLBACK_SCALE};
pub use error::{MeshError, MeshResult};
pub use sampler::DepthRaster;
pub use settings::{MeshSettings, DEFAULT_RESOLUTION_INDEX, RESOLUTION_LADDER};
pub use sphere::SphereGeometry;
pub use vertex::{Bounds, SkyVertex};

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::builder::{EnvironmentMesh, MeshBuilder};
    pub use crate::error::{MeshError, MeshResult};
    pub use crate::sampler::DepthRaster;
    pub use crate::settings::{MeshSettings, RESOLUTION_LADDER};
    pub use crate::sphere::SphereGeometry;
    pub use crate::vertex::SkyVertex;
}
