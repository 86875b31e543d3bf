//! Scriptable in-process backend
//!
//! Drives the viewer's immersive paths without a headset: tests and the
//! runtime's `--simulate-xr` mode push poses and button values through a
//! [`SimulatedHandle`] while the [`XrSystem`](crate::XrSystem) owns the
//! backend.

use std::sync::Arc;

use glam::Vec3;
use parking_lot::Mutex;

use crate::{
    ControllerState, FrameTiming, Hand, HandJoint, HandState, Pose, SessionState, XrBackend,
    XrError, XrMode,
};

#[derive(Debug, Default)]
struct SimulatedState {
    initialized: bool,
    session: SessionState,
    head: Pose,
    controllers: [ControllerState; 2],
    hands: [Option<HandState>; 2],
    frame_index: u64,
}

fn slot(hand: Hand) -> usize {
    match hand {
        Hand::Left => 0,
        Hand::Right => 1,
    }
}

/// Backend whose tracking data is set from outside
pub struct SimulatedBackend {
    state: Arc<Mutex<SimulatedState>>,
}

/// Shared control surface for a [`SimulatedBackend`]
#[derive(Clone)]
pub struct SimulatedHandle {
    state: Arc<Mutex<SimulatedState>>,
}

impl SimulatedBackend {
    /// Create a backend and the handle that drives it
    pub fn new() -> (Self, SimulatedHandle) {
        let state = Arc::new(Mutex::new(SimulatedState {
            head: Pose::at(Vec3::new(0.0, 1.6, 0.0)),
            ..Default::default()
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            SimulatedHandle { state },
        )
    }
}

impl SimulatedHandle {
    /// Begin presenting, as if the user pressed "Enter VR"
    pub fn start_session(&self) {
        self.state.lock().session = SessionState::Focused;
    }

    /// Stop presenting
    pub fn end_session(&self) {
        self.state.lock().session = SessionState::Idle;
    }

    /// Move the head
    pub fn set_head(&self, position: Vec3) {
        self.state.lock().head = Pose::at(position);
    }

    /// Replace a controller's state
    pub fn set_controller(&self, hand: Hand, controller: ControllerState) {
        self.state.lock().controllers[slot(hand)] = controller;
    }

    /// Move a controller, keeping its buttons
    pub fn move_controller(&self, hand: Hand, position: Vec3) {
        let mut state = self.state.lock();
        let controller = &mut state.controllers[slot(hand)];
        controller.is_tracked = true;
        controller.pose = Pose::at(position);
    }

    /// Set a controller's trigger value
    pub fn set_trigger(&self, hand: Hand, value: f32) {
        let mut state = self.state.lock();
        let controller = &mut state.controllers[slot(hand)];
        controller.is_tracked = true;
        controller.trigger = value;
    }

    /// Set a controller's horizontal thumbstick axis
    pub fn set_thumbstick_x(&self, hand: Hand, x: f32) {
        let mut state = self.state.lock();
        let controller = &mut state.controllers[slot(hand)];
        controller.is_tracked = true;
        controller.thumbstick[0] = x;
    }

    /// Track a hand with the given wrist, thumb tip and index tip positions
    pub fn set_hand(&self, hand: Hand, wrist: Vec3, thumb_tip: Vec3, index_tip: Vec3) {
        let mut joints = std::collections::BTreeMap::new();
        joints.insert(HandJoint::Wrist, Pose::at(wrist));
        joints.insert(HandJoint::ThumbTip, Pose::at(thumb_tip));
        joints.insert(HandJoint::IndexTip, Pose::at(index_tip));
        self.state.lock().hands[slot(hand)] = Some(HandState {
            is_tracked: true,
            joints,
        });
    }

    /// Stop tracking a hand
    pub fn clear_hand(&self, hand: Hand) {
        self.state.lock().hands[slot(hand)] = None;
    }
}

impl XrBackend for SimulatedBackend {
    fn name(&self) -> &str {
        "simulated"
    }

    fn initialize(&mut self) -> Result<(), XrError> {
        self.state.lock().initialized = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        let mut state = self.state.lock();
        state.initialized = false;
        state.session = SessionState::Idle;
    }

    fn request_session(&mut self, mode: XrMode) -> Result<(), XrError> {
        let mut state = self.state.lock();
        if !state.initialized {
            return Err(XrError::NotInitialized);
        }
        if mode != XrMode::Vr {
            return Err(XrError::NotSupported(format!("{:?}", mode)));
        }
        state.session = SessionState::Focused;
        Ok(())
    }

    fn end_session(&mut self) {
        self.state.lock().session = SessionState::Idle;
    }

    fn session_state(&self) -> SessionState {
        self.state.lock().session
    }

    fn begin_frame(&mut self) -> Result<FrameTiming, XrError> {
        let mut state = self.state.lock();
        state.frame_index += 1;
        Ok(FrameTiming {
            frame_index: state.frame_index,
        })
    }

    fn head_pose(&self) -> Pose {
        self.state.lock().head
    }

    fn controller_state(&self, hand: Hand) -> ControllerState {
        self.state.lock().controllers[slot(hand)].clone()
    }

    fn hand_state(&self, hand: Hand) -> Option<HandState> {
        self.state.lock().hands[slot(hand)].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_drives_backend() {
        let (mut backend, handle) = SimulatedBackend::new();
        backend.initialize().unwrap();

        handle.set_trigger(Hand::Right, 1.0);
        handle.move_controller(Hand::Right, Vec3::new(0.2, 1.2, -0.4));
        let controller = backend.controller_state(Hand::Right);
        assert!(controller.is_selecting());
        assert_eq!(controller.pose.position, Vec3::new(0.2, 1.2, -0.4));

        handle.set_hand(Hand::Left, Vec3::ZERO, Vec3::X, Vec3::Y);
        let hand = backend.hand_state(Hand::Left).unwrap();
        assert_eq!(hand.joint_position(HandJoint::IndexTip), Some(Vec3::Y));
        assert_eq!(hand.joint_position(HandJoint::MiddleTip), None);
    }

    #[test]
    fn test_session_requires_initialize() {
        let (mut backend, _handle) = SimulatedBackend::new();
        assert!(backend.request_session(XrMode::Vr).is_err());
        backend.initialize().unwrap();
        backend.request_session(XrMode::Vr).unwrap();
        assert!(backend.session_state().is_presenting());
    }
}
