//! Orientation commands and the per-frame queue

use serde::{Deserialize, Serialize};

use crate::orientation::OrientationState;

/// Which hand a controller or tracked hand belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandSide {
    Left,
    Right,
}

/// Producer of a drag
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InputSource {
    /// Mouse or touch
    Pointer,
    /// Tracked controller with a select trigger
    Controller(HandSide),
    /// Tracked hand using pinch as select
    Hand(HandSide),
}

/// Change to the orientation, applied at the frame boundary
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum OrientationCommand {
    /// Add degrees to the longitude
    RotateLongitude(f32),
    /// Add degrees to the latitude (clamped)
    RotateLatitude(f32),
    /// Snapshot the current angles as the drag origin for `source`
    BeginDrag { source: InputSource },
    /// Set the angles relative to the origin of `source`
    DragTo {
        source: InputSource,
        longitude_offset: f32,
        /// `None` leaves the latitude alone
        latitude_offset: Option<f32>,
    },
    /// Forget the drag origin of `source`
    EndDrag { source: InputSource },
    /// Level the view
    ResetLatitude,
}

/// Queue of orientation commands drained once per frame
#[derive(Debug, Default)]
pub struct OrientationQueue {
    commands: Vec<OrientationCommand>,
}

impl OrientationQueue {
    /// Create a new queue
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Queue a command for the next frame boundary
    pub fn queue(&mut self, command: OrientationCommand) {
        self.commands.push(command);
    }

    /// Queue a longitude step
    pub fn rotate_longitude(&mut self, degrees: f32) {
        self.queue(OrientationCommand::RotateLongitude(degrees));
    }

    /// Queue a latitude step
    pub fn rotate_latitude(&mut self, degrees: f32) {
        self.queue(OrientationCommand::RotateLatitude(degrees));
    }

    /// Queue a latitude reset
    pub fn reset_latitude(&mut self) {
        self.queue(OrientationCommand::ResetLatitude);
    }

    /// Apply all pending commands in order. Returns how many were applied.
    pub fn apply_pending(&mut self, state: &mut OrientationState) -> usize {
        let count = self.commands.len();
        for command in self.commands.drain(..) {
            state.apply(command);
        }
        count
    }

    /// Pending commands, oldest first
    pub fn pending(&self) -> &[OrientationCommand] {
        &self.commands
    }

    /// Drop everything pending
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Get number of pending commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_in_order() {
        let mut state = OrientationState::new();
        let mut queue = OrientationQueue::new();

        queue.rotate_longitude(30.0);
        queue.queue(OrientationCommand::BeginDrag {
            source: InputSource::Pointer,
        });
        queue.queue(OrientationCommand::DragTo {
            source: InputSource::Pointer,
            longitude_offset: 5.0,
            latitude_offset: None,
        });
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.apply_pending(&mut state), 3);
        assert!(queue.is_empty());
        // The drag origin includes the step queued before it.
        assert_eq!(state.longitude(), 35.0);
    }
}
