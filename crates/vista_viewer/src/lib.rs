//! # vista_viewer - The Viewer Context
//!
//! [`Viewer`] owns everything the viewer mutates: mesh settings and the
//! dirty flag, control availability, the current environment and mesh, the
//! orientation with its command queue, XR input adapters and the load
//! generation counter. Frontends feed it events and call
//! [`Viewer::frame`] once per display frame with a [`SceneRenderer`].
//!
//! ## Frame order
//!
//! 1. XR session edges (start rebuilds a dirty mesh and levels the view)
//! 2. XR input polling while presenting
//! 3. Orientation command queue drained
//! 4. Draw with the resulting yaw/pitch

pub mod config;
pub mod controls;
pub mod launch;
pub mod renderer;
pub mod viewer;

pub use config::{ConfigError, InputConfig, SourceConfig, ViewerConfig, WindowConfig};
pub use controls::ControlState;
pub use launch::LaunchRequest;
pub use renderer::{FrameView, RenderError, SceneRenderer};
pub use viewer::{LoadOutcome, LoadRequest, Viewer, ViewerStatus};

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::config::ViewerConfig;
    pub use crate::launch::LaunchRequest;
    pub use crate::renderer::{FrameView, RenderError, SceneRenderer};
    pub use crate::viewer::{LoadOutcome, LoadRequest, Viewer};
}
