//! # vista_input - Orientation and Input Adapters
//!
//! A single longitude/latitude [`OrientationState`] is driven by independent
//! producers that publish [`OrientationCommand`]s into an
//! [`OrientationQueue`]. The queue is drained once per frame, in publication
//! order, by whoever owns the state.
//!
//! Producers:
//! - [`PointerDrag`]: mouse and touch dragging
//! - [`KeyboardRotation`]: arrow keys and WASD steps
//! - [`SnapTurn`]: thumbstick snap rotation with a latch
//! - [`GestureTracker`]: controller or hand drag around the head
//! - [`PinchDetector`]: turns thumb/index distance into select start/end
//!
//! ## Example
//!
//! ```ignore
//! use vista_input::prelude::*;
//!
//! let mut state = OrientationState::new();
//! let mut queue = OrientationQueue::new();
//! let keyboard = KeyboardRotation::default();
//!
//! keyboard.on_key(KeyAction::RotateRight, false, &mut queue);
//! queue.apply_pending(&mut state);
//! assert_eq!(state.longitude(), 30.0);
//! ```

pub mod command;
pub mod gesture;
pub mod keyboard;
pub mod orientation;
pub mod pinch;
pub mod pointer;
pub mod snap;

pub use command::{HandSide, InputSource, OrientationCommand, OrientationQueue};
pub use gesture::{horizontal_direction, signed_angle_degrees, GestureTracker};
pub use keyboard::{KeyAction, KeyboardRotation, ROTATION_STEP_DEGREES};
pub use orientation::{Orientation, OrientationState};
pub use pinch::{PinchDetector, PinchTransition, PINCH_THRESHOLD};
pub use pointer::{PointerDrag, POINTER_SENSITIVITY};
pub use snap::{SnapTurn, SNAP_DEADZONE};

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::command::{HandSide, InputSource, OrientationCommand, OrientationQueue};
    pub use crate::gesture::GestureTracker;
    pub use crate::keyboard::{KeyAction, KeyboardRotation};
    pub use crate::orientation::{Orientation, OrientationState};
    pub use crate::pinch::{PinchDetector, PinchTransition};
    pub use crate::pointer::PointerDrag;
    pub use crate::snap::SnapTurn;
}
