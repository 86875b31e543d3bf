//! Keyboard bindings for the native window

use winit::keyboard::KeyCode;

use vista_input::KeyAction;

/// Minimum distance and depth range change per key press
pub const DISTANCE_STEP: f32 = 0.25;

/// Something a key press asks the runtime to do
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RuntimeAction {
    /// Step rotation
    Rotate(KeyAction),
    /// Nudge the minimum distance
    MinDistance(f32),
    /// Nudge the depth range
    DepthRange(f32),
    /// Move along the resolution ladder
    Resolution(isize),
    /// Rebuild the mesh with the edited settings
    Refresh,
    /// Open the neighboring environment
    Environment(isize),
    /// Enter or leave the immersive session
    ToggleVr,
    /// Push the simulated right thumbstick
    SimulatedThumbstick(f32),
    /// Close the window
    Exit,
}

/// Map a physical key to its action.
pub fn action_for(code: KeyCode) -> Option<RuntimeAction> {
    // Rotation keys are named the same way the input crate expects.
    if let Some(action) = KeyAction::from_code(&format!("{:?}", code)) {
        return Some(RuntimeAction::Rotate(action));
    }
    let action = match code {
        KeyCode::BracketLeft => RuntimeAction::MinDistance(-DISTANCE_STEP),
        KeyCode::BracketRight => RuntimeAction::MinDistance(DISTANCE_STEP),
        KeyCode::Minus => RuntimeAction::DepthRange(-DISTANCE_STEP),
        KeyCode::Equal => RuntimeAction::DepthRange(DISTANCE_STEP),
        KeyCode::Comma => RuntimeAction::Resolution(-1),
        KeyCode::Period => RuntimeAction::Resolution(1),
        KeyCode::KeyR => RuntimeAction::Refresh,
        KeyCode::PageDown | KeyCode::KeyN => RuntimeAction::Environment(1),
        KeyCode::PageUp | KeyCode::KeyP => RuntimeAction::Environment(-1),
        KeyCode::KeyV => RuntimeAction::ToggleVr,
        KeyCode::KeyJ => RuntimeAction::SimulatedThumbstick(-1.0),
        KeyCode::KeyL => RuntimeAction::SimulatedThumbstick(1.0),
        KeyCode::Escape => RuntimeAction::Exit,
        _ => return None,
    };
    Some(action)
}

/// One-line key help, logged at startup
pub const HELP: &str = "Drag or arrows/WASD: look | [ ]: min distance | - =: depth range | , .: resolution | R: refresh | N/P: environment | V: VR | Esc: quit";
