//! Longitude/latitude orientation state

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vista_core::clamp_latitude;

use crate::command::{InputSource, OrientationCommand};

/// Viewing angles in degrees.
///
/// Longitude is unbounded; latitude stays within ±85°.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub longitude: f32,
    pub latitude: f32,
}

impl Orientation {
    /// Yaw of the rotation root in radians
    pub fn yaw_radians(&self) -> f32 {
        self.longitude.to_radians()
    }

    /// Pitch of the rotation root in radians
    pub fn pitch_radians(&self) -> f32 {
        self.latitude.to_radians()
    }
}

/// Orientation plus the drag origins of every active drag.
#[derive(Clone, Debug, Default)]
pub struct OrientationState {
    current: Orientation,
    anchors: BTreeMap<InputSource, Orientation>,
}

impl OrientationState {
    /// Start level, facing longitude 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Current angles
    pub fn orientation(&self) -> Orientation {
        self.current
    }

    /// Current longitude in degrees
    pub fn longitude(&self) -> f32 {
        self.current.longitude
    }

    /// Current latitude in degrees
    pub fn latitude(&self) -> f32 {
        self.current.latitude
    }

    /// Whether any source is dragging
    pub fn is_dragging(&self) -> bool {
        !self.anchors.is_empty()
    }

    /// Whether `source` has an active drag
    pub fn is_dragging_with(&self, source: InputSource) -> bool {
        self.anchors.contains_key(&source)
    }

    /// Apply one command.
    ///
    /// Commands carrying non-finite values are ignored.
    pub fn apply(&mut self, command: OrientationCommand) {
        match command {
            OrientationCommand::RotateLongitude(degrees) => {
                if finite("longitude step", degrees) {
                    self.current.longitude += degrees;
                }
            }
            OrientationCommand::RotateLatitude(degrees) => {
                if finite("latitude step", degrees) {
                    self.current.latitude = clamp_latitude(self.current.latitude + degrees);
                }
            }
            OrientationCommand::BeginDrag { source } => {
                self.anchors.insert(source, self.current);
            }
            OrientationCommand::DragTo {
                source,
                longitude_offset,
                latitude_offset,
            } => {
                let Some(origin) = self.anchors.get(&source) else {
                    log::trace!("Drag update from {:?} without a drag origin", source);
                    return;
                };
                if finite("longitude offset", longitude_offset) {
                    self.current.longitude = origin.longitude + longitude_offset;
                }
                if let Some(offset) = latitude_offset {
                    if finite("latitude offset", offset) {
                        self.current.latitude = clamp_latitude(origin.latitude + offset);
                    }
                }
            }
            OrientationCommand::EndDrag { source } => {
                self.anchors.remove(&source);
            }
            OrientationCommand::ResetLatitude => {
                self.current.latitude = 0.0;
            }
        }
    }
}

fn finite(what: &str, value: f32) -> bool {
    if value.is_finite() {
        true
    } else {
        log::debug!("Ignoring non-finite {}: {}", what, value);
        false
    }
}
