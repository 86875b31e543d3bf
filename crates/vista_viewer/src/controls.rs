//! Availability of the depth settings controls

/// Which controls the frontend should offer.
///
/// Depth settings only make sense when the current environment has a depth
/// map. Refresh additionally needs a pending settings change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlState {
    /// Min distance, depth range and resolution can be edited
    pub depth_controls_enabled: bool,
    /// Settings changed since the mesh was last built
    pub dirty: bool,
}

impl ControlState {
    /// Whether the refresh action is available
    pub fn refresh_enabled(&self) -> bool {
        self.depth_controls_enabled && self.dirty
    }

    /// A new environment arrived and its mesh was built.
    pub fn on_environment(&mut self, has_depth: bool) {
        self.depth_controls_enabled = has_depth;
        self.dirty = false;
    }

    /// A setting changed
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// The mesh was rebuilt
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_needs_depth_and_change() {
        let mut controls = ControlState::default();
        controls.mark_dirty();
        assert!(!controls.refresh_enabled());

        controls.on_environment(true);
        assert!(!controls.refresh_enabled());
        controls.mark_dirty();
        assert!(controls.refresh_enabled());

        controls.mark_clean();
        assert!(!controls.refresh_enabled());
    }

    #[test]
    fn test_environment_without_depth_disables() {
        let mut controls = ControlState {
            depth_controls_enabled: true,
            dirty: true,
        };
        controls.on_environment(false);
        assert!(!controls.depth_controls_enabled);
        assert!(!controls.dirty);
    }
}
