//! Thumbstick snap rotation

use crate::command::OrientationQueue;
use crate::keyboard::ROTATION_STEP_DEGREES;

/// Axis magnitude below which the thumbstick counts as centered.
pub const SNAP_DEADZONE: f32 = 0.2;

/// Snap rotation for one controller.
///
/// Each direction fires once and stays latched until the stick returns
/// inside the deadzone.
#[derive(Clone, Copy, Debug)]
pub struct SnapTurn {
    /// Centering threshold
    pub deadzone: f32,
    /// Degrees per snap
    pub step: f32,
    rotated_left: bool,
    rotated_right: bool,
}

impl Default for SnapTurn {
    fn default() -> Self {
        Self::new(SNAP_DEADZONE, ROTATION_STEP_DEGREES)
    }
}

impl SnapTurn {
    /// Create with a deadzone and step
    pub fn new(deadzone: f32, step: f32) -> Self {
        Self {
            deadzone,
            step,
            rotated_left: false,
            rotated_right: false,
        }
    }

    /// Feed the horizontal thumbstick axis. Returns the step queued, if any.
    pub fn update(&mut self, axis_x: f32, queue: &mut OrientationQueue) -> Option<f32> {
        if axis_x < -self.deadzone {
            if !self.rotated_left {
                self.rotated_left = true;
                queue.rotate_longitude(-self.step);
                return Some(-self.step);
            }
        } else if axis_x > self.deadzone {
            if !self.rotated_right {
                self.rotated_right = true;
                queue.rotate_longitude(self.step);
                return Some(self.step);
            }
        } else {
            self.rotated_left = false;
            self.rotated_right = false;
        }
        None
    }

    /// Whether either direction is latched
    pub fn is_latched(&self) -> bool {
        self.rotated_left || self.rotated_right
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::OrientationState;

    #[test]
    fn test_single_step_per_push() {
        let mut state = OrientationState::new();
        let mut queue = OrientationQueue::new();
        let mut snap = SnapTurn::default();

        assert_eq!(snap.update(0.0, &mut queue), None);
        assert_eq!(snap.update(-0.5, &mut queue), Some(-30.0));
        for _ in 0..30 {
            assert_eq!(snap.update(-0.9, &mut queue), None);
        }
        queue.apply_pending(&mut state);
        assert_eq!(state.longitude(), -30.0);
    }

    #[test]
    fn test_center_releases_latch() {
        let mut queue = OrientationQueue::new();
        let mut snap = SnapTurn::default();

        snap.update(0.8, &mut queue);
        assert!(snap.is_latched());
        snap.update(0.1, &mut queue);
        assert!(!snap.is_latched());
        assert_eq!(snap.update(0.8, &mut queue), Some(30.0));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_deadzone_edge_is_center() {
        let mut queue = OrientationQueue::new();
        let mut snap = SnapTurn::default();
        assert_eq!(snap.update(-0.2, &mut queue), None);
        assert_eq!(snap.update(0.2, &mut queue), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_direct_swing_fires_other_direction() {
        let mut queue = OrientationQueue::new();
        let mut snap = SnapTurn::default();
        assert_eq!(snap.update(-0.6, &mut queue), Some(-30.0));
        assert_eq!(snap.update(0.6, &mut queue), Some(30.0));
        assert_eq!(snap.update(-0.6, &mut queue), None);
    }
}
