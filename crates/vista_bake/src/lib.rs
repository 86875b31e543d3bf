//! # Vista Bake
//!
//! Offline preparation of environments:
//!
//! - [`map_equirectangular`] places a perspective photo on an equirectangular
//!   canvas, with alpha marking the covered area
//! - [`interpolate_edges`] blends the left and right borders so the seam of a
//!   panorama (or its depth map) closes without a visible step
//! - [`save_environments`] writes finished textures into an `environments/`
//!   directory and produces the record a host application listens for

pub mod edges;
pub mod error;
pub mod project;
pub mod save;

pub use edges::interpolate_edges;
pub use error::{BakeError, BakeResult};
pub use project::{map_equirectangular, Projection};
pub use save::{read_image, save_environments, write_image};
