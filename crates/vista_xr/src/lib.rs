//! # vista_xr - XR Session and Tracking Abstraction
//!
//! What the viewer needs from an immersive runtime:
//! - Session lifecycle (start/end edges reported as [`SessionEvent`]s)
//! - Head pose
//! - Controller poses, select trigger and thumbstick
//! - Hand joints for pinch detection
//!
//! Backends implement [`XrBackend`]. Without a backend the [`XrSystem`]
//! stays in desktop mode and never presents.
//!
//! ## Example
//!
//! ```ignore
//! use vista_xr::prelude::*;
//!
//! let mut xr = XrSystem::new();
//! xr.initialize()?;
//!
//! loop {
//!     for event in xr.poll_events() {
//!         // SessionEvent::Started / SessionEvent::Ended
//!     }
//!     if xr.is_presenting() {
//!         let head = xr.head_pose();
//!         let right = xr.controller_state(Hand::Right);
//!     }
//! }
//! ```

pub mod simulated;

pub use simulated::{SimulatedBackend, SimulatedHandle};

use std::collections::BTreeMap;

use glam::{Quat, Vec3};
use thiserror::Error;

/// XR operation mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum XrMode {
    /// Desktop mode (no XR)
    #[default]
    Desktop,
    /// Virtual Reality (fully immersive)
    Vr,
}

/// XR session state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No session
    #[default]
    Idle,
    /// Session is visible
    Visible,
    /// Session is focused and interactive
    Focused,
}

impl SessionState {
    /// Whether frames are being shown in the headset
    pub fn is_presenting(self) -> bool {
        matches!(self, Self::Visible | Self::Focused)
    }
}

/// Session lifecycle edge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Headset started presenting
    Started,
    /// Headset stopped presenting
    Ended,
}

/// Pose (position + orientation)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    /// Create a new pose
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self { position, orientation }
    }

    /// Pose at a position with identity orientation
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }
}

/// Controller hand
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// Both hands, left first
    pub const BOTH: [Hand; 2] = [Hand::Left, Hand::Right];
}

/// Trigger value at which select is considered pressed.
pub const SELECT_THRESHOLD: f32 = 0.5;

/// Controller input state
#[derive(Clone, Debug, Default)]
pub struct ControllerState {
    /// Controller pose
    pub pose: Pose,
    /// Is tracked
    pub is_tracked: bool,
    /// Trigger value (0.0 - 1.0)
    pub trigger: f32,
    /// Thumbstick position, x right and y up
    pub thumbstick: [f32; 2],
}

impl ControllerState {
    /// Whether the primary select action is held
    pub fn is_selecting(&self) -> bool {
        self.is_tracked && self.trigger >= SELECT_THRESHOLD
    }
}

/// Tracked hand joints. Only the wrist and fingertips are exposed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandJoint {
    Wrist,
    ThumbTip,
    IndexTip,
    MiddleTip,
    RingTip,
    LittleTip,
}

/// Hand tracking state
#[derive(Clone, Debug, Default)]
pub struct HandState {
    /// Is hand tracked
    pub is_tracked: bool,
    /// Joint poses
    pub joints: BTreeMap<HandJoint, Pose>,
}

impl HandState {
    /// Position of a joint, if tracked
    pub fn joint_position(&self, joint: HandJoint) -> Option<Vec3> {
        self.joints.get(&joint).map(|pose| pose.position)
    }
}

/// Per-frame data from the runtime
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameTiming {
    pub frame_index: u64,
}

/// XR backend trait
pub trait XrBackend: Send {
    /// Get backend name
    fn name(&self) -> &str;

    /// Initialize the backend
    fn initialize(&mut self) -> Result<(), XrError>;

    /// Shutdown the backend
    fn shutdown(&mut self);

    /// Ask the runtime to start an immersive session
    fn request_session(&mut self, mode: XrMode) -> Result<(), XrError>;

    /// End the immersive session
    fn end_session(&mut self);

    /// Get session state
    fn session_state(&self) -> SessionState;

    /// Begin frame
    fn begin_frame(&mut self) -> Result<FrameTiming, XrError>;

    /// Get head pose
    fn head_pose(&self) -> Pose;

    /// Get controller state
    fn controller_state(&self, hand: Hand) -> ControllerState;

    /// Get hand tracking state
    fn hand_state(&self, hand: Hand) -> Option<HandState>;
}

/// XR error types
#[derive(Clone, Debug, Error)]
pub enum XrError {
    /// Backend not initialized
    #[error("XR not initialized")]
    NotInitialized,
    /// Feature not supported
    #[error("Not supported: {0}")]
    NotSupported(String),
    /// Session error
    #[error("Session error: {0}")]
    SessionError(String),
    /// Runtime error
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

/// The main XR system
pub struct XrSystem {
    /// Registered backends
    backends: BTreeMap<String, Box<dyn XrBackend>>,
    /// Active backend
    active_backend: Option<String>,
    /// Current mode
    current_mode: XrMode,
    /// Is initialized
    initialized: bool,
    /// Presenting state seen by the last `poll_events`
    was_presenting: bool,
    /// Frame index
    frame_index: u64,
}

impl XrSystem {
    /// Create a new XR system
    pub fn new() -> Self {
        Self {
            backends: BTreeMap::new(),
            active_backend: None,
            current_mode: XrMode::Desktop,
            initialized: false,
            was_presenting: false,
            frame_index: 0,
        }
    }

    /// Register a backend
    pub fn register_backend(&mut self, backend: Box<dyn XrBackend>) {
        let name = backend.name().to_string();
        log::info!("Registered XR backend '{}'", name);
        if self.active_backend.is_none() {
            self.active_backend = Some(name.clone());
        }
        self.backends.insert(name, backend);
    }

    /// Get active backend
    fn active(&self) -> Option<&dyn XrBackend> {
        self.active_backend
            .as_ref()
            .and_then(|name| self.backends.get(name))
            .map(|b| b.as_ref())
    }

    /// Get active backend mutably
    fn active_mut(&mut self) -> Option<&mut (dyn XrBackend + '_)> {
        let name = self.active_backend.clone()?;
        match self.backends.get_mut(&name) {
            Some(b) => Some(b.as_mut()),
            None => None,
        }
    }

    /// Initialize the XR system
    pub fn initialize(&mut self) -> Result<(), XrError> {
        if let Some(backend) = self.active_mut() {
            backend.initialize()?;
        }
        // No backend - just desktop mode
        self.initialized = true;
        Ok(())
    }

    /// Shutdown the XR system
    pub fn shutdown(&mut self) {
        if let Some(backend) = self.active_mut() {
            backend.shutdown();
        }
        self.initialized = false;
    }

    /// Check if initialized
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Enter VR
    pub fn enter_vr(&mut self) -> Result<(), XrError> {
        if !self.initialized {
            return Err(XrError::NotInitialized);
        }
        match self.active_mut() {
            Some(backend) => {
                backend.request_session(XrMode::Vr)?;
                self.current_mode = XrMode::Vr;
                Ok(())
            }
            None => Err(XrError::NotSupported("No XR backend available".into())),
        }
    }

    /// Leave VR and return to desktop
    pub fn exit_vr(&mut self) {
        if let Some(backend) = self.active_mut() {
            backend.end_session();
        }
        self.current_mode = XrMode::Desktop;
    }

    /// Get current mode
    pub fn current_mode(&self) -> XrMode {
        self.current_mode
    }

    /// Get session state
    pub fn session_state(&self) -> SessionState {
        self.active()
            .map(|b| b.session_state())
            .unwrap_or(SessionState::Idle)
    }

    /// Whether the headset is presenting
    pub fn is_presenting(&self) -> bool {
        self.session_state().is_presenting()
    }

    /// Report session start/end edges since the last call.
    pub fn poll_events(&mut self) -> Vec<SessionEvent> {
        let presenting = self.is_presenting();
        let mut events = Vec::new();
        if presenting != self.was_presenting {
            let event = if presenting {
                SessionEvent::Started
            } else {
                self.current_mode = XrMode::Desktop;
                SessionEvent::Ended
            };
            log::info!("XR session {:?}", event);
            events.push(event);
            self.was_presenting = presenting;
        }
        events
    }

    /// Begin frame
    pub fn begin_frame(&mut self) -> Result<FrameTiming, XrError> {
        self.frame_index += 1;

        if let Some(backend) = self.active_mut() {
            backend.begin_frame()
        } else {
            Ok(FrameTiming {
                frame_index: self.frame_index,
            })
        }
    }

    /// Get head pose
    pub fn head_pose(&self) -> Pose {
        self.active().map(|b| b.head_pose()).unwrap_or_default()
    }

    /// Get controller state
    pub fn controller_state(&self, hand: Hand) -> ControllerState {
        self.active()
            .map(|b| b.controller_state(hand))
            .unwrap_or_default()
    }

    /// Get hand tracking state
    pub fn hand_state(&self, hand: Hand) -> Option<HandState> {
        self.active().and_then(|b| b.hand_state(hand))
    }
}

impl Default for XrSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::{
        ControllerState, FrameTiming, Hand, HandJoint, HandState, Pose, SessionEvent,
        SessionState, XrBackend, XrError, XrMode, XrSystem,
    };
    pub use crate::simulated::{SimulatedBackend, SimulatedHandle};
}
