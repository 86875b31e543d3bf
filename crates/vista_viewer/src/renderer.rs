//! Rendering seam between the viewer and a graphics backend

use glam::{Mat4, Quat};
use thiserror::Error;
use vista_asset::ColorImage;
use vista_input::Orientation;
use vista_mesh::EnvironmentMesh;

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    /// Surface must be reconfigured before the next frame
    #[error("surface lost")]
    SurfaceLost,

    /// Frame could not be acquired in time
    #[error("surface timeout")]
    Timeout,

    /// GPU memory exhausted
    #[error("out of GPU memory")]
    OutOfMemory,

    /// Resource creation or upload failed
    #[error("render backend error: {0}")]
    Backend(String),
}

impl RenderError {
    /// Whether the render loop should stop
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::OutOfMemory)
    }
}

/// Per-frame view data handed to the renderer
#[derive(Clone, Copy, Debug)]
pub struct FrameView {
    /// Viewing angles in degrees
    pub orientation: Orientation,
    /// Rotation of the environment root
    pub rotation: Quat,
    /// Frames drawn so far
    pub frame_index: u64,
    /// Headset presenting
    pub presenting: bool,
}

impl FrameView {
    /// View for `orientation`.
    ///
    /// The root is rotated by pitch about X, then yaw about Y
    /// (`R = Rx(pitch) * Ry(yaw)`).
    pub fn new(orientation: Orientation, frame_index: u64, presenting: bool) -> Self {
        let rotation = Quat::from_rotation_x(orientation.pitch_radians())
            * Quat::from_rotation_y(orientation.yaw_radians());
        Self {
            orientation,
            rotation,
            frame_index,
            presenting,
        }
    }

    /// Model matrix of the environment root
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation)
    }
}

/// Graphics backend driven by the viewer
pub trait SceneRenderer {
    /// Replace the skybox texture
    fn upload_texture(&mut self, image: &ColorImage) -> Result<(), RenderError>;

    /// Replace the environment mesh, releasing the previous one's buffers
    fn replace_mesh(&mut self, mesh: &EnvironmentMesh) -> Result<(), RenderError>;

    /// Draw one frame
    fn draw(&mut self, view: &FrameView) -> Result<(), RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec3;

    #[test]
    fn test_identity_view() {
        let view = FrameView::new(Orientation::default(), 0, false);
        assert_relative_eq!(view.rotation.angle_between(Quat::IDENTITY), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_yaw_rotates_about_y() {
        let view = FrameView::new(
            Orientation {
                longitude: 90.0,
                latitude: 0.0,
            },
            1,
            false,
        );
        let forward = view.model_matrix().transform_vector3(Vec3::NEG_Z);
        assert_relative_eq!(forward.x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(forward.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_pitch_applied_after_yaw() {
        let orientation = Orientation {
            longitude: 90.0,
            latitude: 30.0,
        };
        let view = FrameView::new(orientation, 1, false);
        let expected = Mat4::from_rotation_x(30f32.to_radians()) * Mat4::from_rotation_y(90f32.to_radians());
        let v = Vec3::new(0.3, 0.2, -1.0);
        let a = view.model_matrix().transform_vector3(v);
        let b = expected.transform_vector3(v);
        assert_relative_eq!(a.distance(b), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_fatal_errors() {
        assert!(RenderError::OutOfMemory.is_fatal());
        assert!(!RenderError::SurfaceLost.is_fatal());
    }
}
