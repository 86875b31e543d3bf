//! Mouse and touch dragging

use crate::command::{InputSource, OrientationCommand, OrientationQueue};

/// Degrees of rotation per pixel of pointer travel.
pub const POINTER_SENSITIVITY: f32 = 0.1;

/// Turns pointer down/move/up into drag commands.
#[derive(Clone, Debug)]
pub struct PointerDrag {
    /// Horizontal and vertical degrees per pixel
    pub sensitivity: [f32; 2],
    /// Screen position where the drag started
    origin: Option<[f32; 2]>,
}

impl Default for PointerDrag {
    fn default() -> Self {
        Self::new([POINTER_SENSITIVITY, POINTER_SENSITIVITY])
    }
}

impl PointerDrag {
    /// Create with the given sensitivity
    pub fn new(sensitivity: [f32; 2]) -> Self {
        Self {
            sensitivity,
            origin: None,
        }
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.origin.is_some()
    }

    /// Pointer or touch pressed at `(x, y)`
    pub fn on_down(&mut self, x: f32, y: f32, queue: &mut OrientationQueue) {
        self.origin = Some([x, y]);
        queue.queue(OrientationCommand::BeginDrag {
            source: InputSource::Pointer,
        });
    }

    /// Pointer or touch moved to `(x, y)`.
    ///
    /// While presenting in VR the headset owns pitch, so only the longitude
    /// follows the pointer.
    pub fn on_move(&mut self, x: f32, y: f32, presenting: bool, queue: &mut OrientationQueue) {
        let Some([ox, oy]) = self.origin else {
            return;
        };
        queue.queue(OrientationCommand::DragTo {
            source: InputSource::Pointer,
            longitude_offset: (ox - x) * self.sensitivity[0],
            latitude_offset: (!presenting).then(|| (oy - y) * self.sensitivity[1]),
        });
    }

    /// Pointer released or left the surface
    pub fn on_up(&mut self, queue: &mut OrientationQueue) {
        if self.origin.take().is_some() {
            queue.queue(OrientationCommand::EndDrag {
                source: InputSource::Pointer,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::OrientationState;
    use approx::assert_relative_eq;

    #[test]
    fn test_drag_moves_opposite_to_pointer() {
        let mut state = OrientationState::new();
        let mut queue = OrientationQueue::new();
        let mut pointer = PointerDrag::default();

        pointer.on_down(100.0, 100.0, &mut queue);
        pointer.on_move(50.0, 80.0, false, &mut queue);
        queue.apply_pending(&mut state);

        assert_relative_eq!(state.longitude(), 5.0);
        assert_relative_eq!(state.latitude(), 2.0);
    }

    #[test]
    fn test_latitude_frozen_while_presenting() {
        let mut state = OrientationState::new();
        let mut queue = OrientationQueue::new();
        let mut pointer = PointerDrag::default();

        pointer.on_down(0.0, 0.0, &mut queue);
        pointer.on_move(-100.0, -300.0, true, &mut queue);
        queue.apply_pending(&mut state);

        assert_relative_eq!(state.longitude(), 10.0);
        assert_eq!(state.latitude(), 0.0);
    }

    #[test]
    fn test_move_without_press_does_nothing() {
        let mut queue = OrientationQueue::new();
        let mut pointer = PointerDrag::default();
        pointer.on_move(10.0, 10.0, false, &mut queue);
        pointer.on_up(&mut queue);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_huge_drag_clamps_latitude() {
        let mut state = OrientationState::new();
        let mut queue = OrientationQueue::new();
        let mut pointer = PointerDrag::default();

        pointer.on_down(0.0, 0.0, &mut queue);
        pointer.on_move(0.0, 1.0e7, false, &mut queue);
        pointer.on_up(&mut queue);
        queue.apply_pending(&mut state);

        assert_eq!(state.latitude(), -85.0);
        assert!(!state.is_dragging());
    }
}
