//! Discrete keyboard rotation

use serde::{Deserialize, Serialize};

use crate::command::OrientationQueue;

/// Degrees per keyboard or snap step.
pub const ROTATION_STEP_DEGREES: f32 = 30.0;

/// Rotation bound to a key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAction {
    /// ArrowLeft / A
    RotateLeft,
    /// ArrowRight / D
    RotateRight,
    /// ArrowUp / W
    RotateSceneDown,
    /// ArrowDown / S
    RotateSceneUp,
}

impl KeyAction {
    /// Map a physical key code name (`"ArrowLeft"`, `"KeyA"`, ...) to an action.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Self::RotateLeft),
            "ArrowRight" | "KeyD" => Some(Self::RotateRight),
            "ArrowUp" | "KeyW" => Some(Self::RotateSceneDown),
            "ArrowDown" | "KeyS" => Some(Self::RotateSceneUp),
            _ => None,
        }
    }
}

/// Step rotation from the keyboard
#[derive(Clone, Copy, Debug)]
pub struct KeyboardRotation {
    /// Degrees per key press
    pub step: f32,
}

impl Default for KeyboardRotation {
    fn default() -> Self {
        Self {
            step: ROTATION_STEP_DEGREES,
        }
    }
}

impl KeyboardRotation {
    /// Queue the step for `action`. Returns whether the key was consumed.
    ///
    /// Pitch steps are ignored while presenting in VR.
    pub fn on_key(&self, action: KeyAction, presenting: bool, queue: &mut OrientationQueue) -> bool {
        match action {
            KeyAction::RotateLeft => queue.rotate_longitude(-self.step),
            KeyAction::RotateRight => queue.rotate_longitude(self.step),
            KeyAction::RotateSceneDown if !presenting => queue.rotate_latitude(-self.step),
            KeyAction::RotateSceneUp if !presenting => queue.rotate_latitude(self.step),
            KeyAction::RotateSceneDown | KeyAction::RotateSceneUp => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::OrientationState;

    #[test]
    fn test_key_codes() {
        assert_eq!(KeyAction::from_code("ArrowLeft"), Some(KeyAction::RotateLeft));
        assert_eq!(KeyAction::from_code("KeyD"), Some(KeyAction::RotateRight));
        assert_eq!(KeyAction::from_code("KeyW"), Some(KeyAction::RotateSceneDown));
        assert_eq!(KeyAction::from_code("ArrowDown"), Some(KeyAction::RotateSceneUp));
        assert_eq!(KeyAction::from_code("Space"), None);
    }

    #[test]
    fn test_steps() {
        let mut state = OrientationState::new();
        let mut queue = OrientationQueue::new();
        let keys = KeyboardRotation::default();

        keys.on_key(KeyAction::RotateLeft, false, &mut queue);
        keys.on_key(KeyAction::RotateSceneUp, false, &mut queue);
        queue.apply_pending(&mut state);
        assert_eq!(state.longitude(), -30.0);
        assert_eq!(state.latitude(), 30.0);
    }

    #[test]
    fn test_latitude_suppressed_while_presenting() {
        let mut queue = OrientationQueue::new();
        let keys = KeyboardRotation::default();

        assert!(!keys.on_key(KeyAction::RotateSceneDown, true, &mut queue));
        assert!(!keys.on_key(KeyAction::RotateSceneUp, true, &mut queue));
        assert!(queue.is_empty());
        assert!(keys.on_key(KeyAction::RotateRight, true, &mut queue));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_repeated_steps_stay_clamped() {
        let mut state = OrientationState::new();
        let mut queue = OrientationQueue::new();
        let keys = KeyboardRotation::default();
        for _ in 0..10 {
            keys.on_key(KeyAction::RotateSceneDown, false, &mut queue);
        }
        queue.apply_pending(&mut state);
        assert_eq!(state.latitude(), -85.0);
    }
}
