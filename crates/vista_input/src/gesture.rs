//! Controller and hand drag rotation
//!
//! While selecting, the horizontal direction from the head to the
//! controller (or wrist) is compared against the direction recorded on the
//! first tracked frame of the gesture. The signed angle between the two turns
//! the scene so it follows the hand.

use glam::{Vec2, Vec3};

use crate::command::{InputSource, OrientationCommand, OrientationQueue};

/// Normalized XZ direction from `head` to `target`.
///
/// `None` when the horizontal projection has zero length (the target is
/// straight above or below the head) or is not finite.
pub fn horizontal_direction(head: Vec3, target: Vec3) -> Option<Vec2> {
    let delta = target - head;
    let flat = Vec2::new(delta.x, delta.z);
    let length_sq = flat.length_squared();
    if length_sq == 0.0 || !length_sq.is_finite() {
        return None;
    }
    Some(flat / length_sq.sqrt())
}

/// Signed angle in degrees from `from` to `to`, both XZ unit vectors.
pub fn signed_angle_degrees(from: Vec2, to: Vec2) -> f32 {
    // (x, z) components: cross is the Y component of the 3D cross product.
    let cross_y = from.x * to.y - from.y * to.x;
    let dot = from.dot(to);
    cross_y.atan2(dot).to_degrees()
}

/// Drag gesture state for one controller or hand
#[derive(Clone, Debug)]
pub struct GestureTracker {
    source: InputSource,
    selecting: bool,
    reference: Option<Vec2>,
}

impl GestureTracker {
    /// Create an idle tracker
    pub fn new(source: InputSource) -> Self {
        Self {
            source,
            selecting: false,
            reference: None,
        }
    }

    /// Source this tracker produces commands for
    pub fn source(&self) -> InputSource {
        self.source
    }

    /// Whether select is held
    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    /// Whether the reference direction has been recorded
    pub fn has_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// Select pressed. The reference is taken on the next tracked update.
    pub fn select_start(&mut self) {
        self.selecting = true;
        self.reference = None;
    }

    /// Select released
    pub fn select_end(&mut self, queue: &mut OrientationQueue) {
        if self.reference.take().is_some() {
            queue.queue(OrientationCommand::EndDrag {
                source: self.source,
            });
        }
        self.selecting = false;
    }

    /// Per-frame update with current head and controller/wrist positions.
    pub fn update(&mut self, head: Vec3, target: Vec3, queue: &mut OrientationQueue) {
        if !self.selecting {
            return;
        }
        let Some(current) = horizontal_direction(head, target) else {
            log::trace!("{:?}: zero-length horizontal projection, skipping", self.source);
            return;
        };

        match self.reference {
            None => {
                self.reference = Some(current);
                queue.queue(OrientationCommand::BeginDrag {
                    source: self.source,
                });
            }
            Some(reference) => {
                let angle = signed_angle_degrees(reference, current);
                queue.queue(OrientationCommand::DragTo {
                    source: self.source,
                    longitude_offset: -angle,
                    latitude_offset: None,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::HandSide;
    use crate::orientation::OrientationState;
    use approx::assert_relative_eq;

    #[test]
    fn test_horizontal_direction() {
        let dir = horizontal_direction(Vec3::new(0.0, 1.6, 0.0), Vec3::new(0.0, 1.0, -0.5)).unwrap();
        assert_relative_eq!(dir.x, 0.0);
        assert_relative_eq!(dir.y, -1.0);

        assert!(horizontal_direction(Vec3::new(0.0, 1.6, 0.0), Vec3::new(0.0, 0.5, 0.0)).is_none());
    }

    #[test]
    fn test_signed_angle() {
        let forward = Vec2::new(0.0, -1.0);
        let right = Vec2::new(1.0, 0.0);
        // x*z' - z*x' = 0*0 - (-1)*1 = 1
        assert_relative_eq!(signed_angle_degrees(forward, right), 90.0);
        assert_relative_eq!(signed_angle_degrees(right, forward), -90.0);
        assert_relative_eq!(signed_angle_degrees(forward, forward), 0.0);
    }

    #[test]
    fn test_gesture_sets_longitude_from_start() {
        let mut state = OrientationState::new();
        let mut queue = OrientationQueue::new();
        let mut tracker = GestureTracker::new(InputSource::Controller(HandSide::Right));
        let head = Vec3::new(0.0, 1.6, 0.0);

        queue.rotate_longitude(20.0);
        tracker.select_start();
        tracker.update(head, Vec3::new(0.0, 1.2, -0.5), &mut queue);
        tracker.update(head, Vec3::new(0.5, 1.2, 0.0), &mut queue);
        queue.apply_pending(&mut state);

        assert_relative_eq!(state.longitude(), 20.0 - 90.0, epsilon = 1e-4);

        tracker.select_end(&mut queue);
        queue.apply_pending(&mut state);
        assert!(!state.is_dragging());
    }

    #[test]
    fn test_zero_projection_defers_reference() {
        let mut queue = OrientationQueue::new();
        let mut tracker = GestureTracker::new(InputSource::Hand(HandSide::Left));
        let head = Vec3::new(0.0, 1.6, 0.0);

        tracker.select_start();
        tracker.update(head, Vec3::new(0.0, 0.4, 0.0), &mut queue);
        assert!(!tracker.has_reference());
        assert!(queue.is_empty());

        tracker.update(head, Vec3::new(0.3, 1.0, -0.3), &mut queue);
        assert!(tracker.has_reference());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_idle_tracker_ignores_updates() {
        let mut queue = OrientationQueue::new();
        let mut tracker = GestureTracker::new(InputSource::Hand(HandSide::Left));
        tracker.update(Vec3::ZERO, Vec3::X, &mut queue);
        tracker.select_end(&mut queue);
        assert!(queue.is_empty());
    }
}
