//! The viewer context

use std::fmt;
use std::time::Instant;

use glam::Vec3;
use vista_asset::{Environment, EnvironmentListing, LoadCompletion};
use vista_core::{Generation, LoadGeneration, ViewerError};
use vista_input::{
    GestureTracker, HandSide, InputSource, KeyAction, KeyboardRotation, Orientation,
    OrientationQueue, OrientationState, PinchDetector, PinchTransition, PointerDrag, SnapTurn,
};
use vista_mesh::{MeshBuilder, MeshSettings, RESOLUTION_LADDER};
use vista_xr::{Hand, HandJoint, SessionEvent, XrSystem};

use crate::config::{InputConfig, ViewerConfig};
use crate::controls::ControlState;
use crate::renderer::{FrameView, RenderError, SceneRenderer};

/// Frames between periodic status logs
const STATUS_LOG_INTERVAL: u64 = 300;

/// A load the frontend should hand to its loader
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    pub generation: Generation,
    pub name: String,
}

/// What happened to a delivered load
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Environment is now on screen
    Applied { name: String, has_depth: bool },
    /// A newer selection superseded this load
    Stale,
    /// The color image failed; the previous environment stays
    Failed,
}

/// Shape of the mesh currently on screen
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshSummary {
    pub width_segments: u32,
    pub height_segments: u32,
    pub scale: f32,
    pub displaced: bool,
}

/// Snapshot for status displays
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerStatus {
    pub environment: Option<String>,
    pub loading: Option<String>,
    pub settings: MeshSettings,
    pub controls: ControlState,
    pub orientation: Orientation,
    pub mesh: Option<MeshSummary>,
    pub presenting: bool,
}

impl fmt::Display for ViewerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.environment, &self.loading) {
            (_, Some(loading)) => write!(f, "loading {}", loading)?,
            (Some(name), None) => write!(f, "{}", name)?,
            (None, None) => write!(f, "no environment")?,
        }
        if self.controls.depth_controls_enabled {
            write!(
                f,
                " | min {:.1} range {:.1} res {}",
                self.settings.min_distance,
                self.settings.depth_range,
                self.settings.resolution()
            )?;
            if self.controls.refresh_enabled() {
                write!(f, " (R to refresh)")?;
            }
        } else if self.environment.is_some() {
            write!(f, " | no depth")?;
        }
        write!(
            f,
            " | lon {:.0} lat {:.0}",
            self.orientation.longitude, self.orientation.latitude
        )?;
        if self.presenting {
            write!(f, " | VR")?;
        }
        Ok(())
    }
}

fn side(hand: Hand) -> HandSide {
    match hand {
        Hand::Left => HandSide::Left,
        Hand::Right => HandSide::Right,
    }
}

/// Everything the viewer mutates, owned by the render thread.
pub struct Viewer {
    settings: MeshSettings,
    controls: ControlState,
    input: InputConfig,

    listing: EnvironmentListing,
    requested: Option<String>,
    environment: Option<Environment>,
    mesh: Option<MeshSummary>,

    generations: LoadGeneration,
    pending: Option<LoadRequest>,

    orientation: OrientationState,
    queue: OrientationQueue,
    pointer: PointerDrag,
    keyboard: KeyboardRotation,
    snaps: [SnapTurn; 2],
    controllers: [GestureTracker; 2],
    hands: [GestureTracker; 2],
    pinches: [PinchDetector; 2],

    presenting: bool,
    frame_index: u64,
}

impl Viewer {
    /// Create a viewer with no environment loaded
    pub fn new(config: &ViewerConfig) -> Self {
        let input = config.input.clone();
        let snap = SnapTurn::new(input.snap_deadzone, input.rotation_step);
        let pinch = PinchDetector::new(input.pinch_threshold);
        Self {
            settings: config.mesh,
            controls: ControlState::default(),
            listing: EnvironmentListing::default(),
            requested: config.source.environment.clone(),
            environment: None,
            mesh: None,
            generations: LoadGeneration::new(),
            pending: None,
            orientation: OrientationState::new(),
            queue: OrientationQueue::new(),
            pointer: PointerDrag::new(input.pointer_sensitivity),
            keyboard: KeyboardRotation {
                step: input.rotation_step,
            },
            snaps: [snap; 2],
            controllers: [
                GestureTracker::new(InputSource::Controller(HandSide::Left)),
                GestureTracker::new(InputSource::Controller(HandSide::Right)),
            ],
            hands: [
                GestureTracker::new(InputSource::Hand(HandSide::Left)),
                GestureTracker::new(InputSource::Hand(HandSide::Right)),
            ],
            pinches: [pinch; 2],
            input,
            presenting: false,
            frame_index: 0,
        }
    }

    // ---- Environments ----

    /// Replace the environment listing
    pub fn set_listing(&mut self, listing: EnvironmentListing) {
        log::info!("{} environment(s) available", listing.len());
        self.listing = listing;
    }

    /// Current listing
    pub fn listing(&self) -> &EnvironmentListing {
        &self.listing
    }

    /// Load for the launch environment, or the first listed one.
    pub fn initial_selection(&mut self) -> Option<LoadRequest> {
        let name = self
            .listing
            .select(self.requested.as_deref())
            .map(str::to_string);
        match name {
            Some(name) => Some(self.select_environment(&name)),
            None => {
                log::warn!("No environments to show");
                None
            }
        }
    }

    /// Select `name`, superseding any load still in flight.
    pub fn select_environment(&mut self, name: &str) -> LoadRequest {
        let generation = self.generations.advance();
        if let Some(previous) = &self.pending {
            log::debug!("Superseding load of '{}' ({})", previous.name, previous.generation);
        }
        let request = LoadRequest {
            generation,
            name: name.to_string(),
        };
        self.pending = Some(request.clone());
        request
    }

    /// Select the neighbor of the current environment in the listing.
    pub fn select_relative(&mut self, offset: isize) -> Option<LoadRequest> {
        let current = self
            .pending
            .as_ref()
            .map(|p| p.name.as_str())
            .or_else(|| self.environment.as_ref().map(|e| e.name.as_str()));
        let name = self.listing.step(current, offset)?.to_string();
        Some(self.select_environment(&name))
    }

    /// Apply a finished load.
    ///
    /// Loads from an older selection are dropped. A failed load leaves the
    /// previous environment on screen. Once the texture is uploaded the
    /// controls follow the new environment even if its mesh cannot be built;
    /// the mesh is then left dirty so a refresh can retry it.
    pub fn on_load_completed(
        &mut self,
        completion: LoadCompletion,
        renderer: &mut dyn SceneRenderer,
    ) -> Result<LoadOutcome, RenderError> {
        if !self.generations.is_current(completion.generation) {
            log::debug!(
                "Dropping stale load of '{}' ({}, latest {})",
                completion.name,
                completion.generation,
                self.generations.current()
            );
            return Ok(LoadOutcome::Stale);
        }
        self.pending = None;

        let environment = match completion.result {
            Ok(environment) => environment,
            Err(e) => {
                e.report();
                return Ok(LoadOutcome::Failed);
            }
        };

        renderer.upload_texture(&environment.color)?;
        let name = environment.name.clone();
        let has_depth = environment.has_depth();
        self.environment = Some(environment);
        self.controls.on_environment(has_depth);
        if let Err(e) = self.rebuild(renderer) {
            log::error!("Mesh for '{}' failed: {}", name, e);
            self.controls.mark_dirty();
            return Err(e);
        }

        log::info!(
            "Environment '{}' ready ({})",
            name,
            if has_depth { "with depth" } else { "no depth" }
        );
        Ok(LoadOutcome::Applied { name, has_depth })
    }

    /// Name of the environment on screen
    pub fn environment_name(&self) -> Option<&str> {
        self.environment.as_ref().map(|e| e.name.as_str())
    }

    /// Load still in flight
    pub fn pending(&self) -> Option<&LoadRequest> {
        self.pending.as_ref()
    }

    // ---- Settings ----

    /// Mesh settings, including edits not yet applied
    pub fn settings(&self) -> &MeshSettings {
        &self.settings
    }

    /// Control availability
    pub fn controls(&self) -> ControlState {
        self.controls
    }

    /// Set the minimum distance. Returns whether the setting changed.
    pub fn set_min_distance(&mut self, value: f32) -> Result<bool, ViewerError> {
        if !self.depth_controls("min_distance") || value == self.settings.min_distance {
            return Ok(false);
        }
        self.settings.set_min_distance(value)?;
        self.controls.mark_dirty();
        Ok(true)
    }

    /// Set the depth range. Returns whether the setting changed.
    pub fn set_depth_range(&mut self, value: f32) -> Result<bool, ViewerError> {
        if !self.depth_controls("depth_range") || value == self.settings.depth_range {
            return Ok(false);
        }
        self.settings.set_depth_range(value)?;
        self.controls.mark_dirty();
        Ok(true)
    }

    /// Set the resolution ladder index. Returns whether the setting changed.
    pub fn set_resolution_index(&mut self, index: usize) -> Result<bool, ViewerError> {
        if !self.depth_controls("resolution") || index == self.settings.resolution_index {
            return Ok(false);
        }
        self.settings.set_resolution_index(index)?;
        self.controls.mark_dirty();
        Ok(true)
    }

    /// Nudge the minimum distance, never below zero.
    pub fn adjust_min_distance(&mut self, delta: f32) -> Result<bool, ViewerError> {
        self.set_min_distance((self.settings.min_distance + delta).max(0.0))
    }

    /// Nudge the depth range, never below zero.
    pub fn adjust_depth_range(&mut self, delta: f32) -> Result<bool, ViewerError> {
        self.set_depth_range((self.settings.depth_range + delta).max(0.0))
    }

    /// Move along the resolution ladder, stopping at either end.
    pub fn step_resolution(&mut self, offset: isize) -> Result<bool, ViewerError> {
        let last = RESOLUTION_LADDER.len() as isize - 1;
        let index = (self.settings.resolution_index as isize + offset).clamp(0, last);
        self.set_resolution_index(index as usize)
    }

    fn depth_controls(&self, name: &str) -> bool {
        if !self.controls.depth_controls_enabled {
            log::debug!("Ignoring {} change: environment has no depth", name);
        }
        self.controls.depth_controls_enabled
    }

    /// Rebuild the mesh if settings changed. Returns whether it rebuilt.
    pub fn refresh(&mut self, renderer: &mut dyn SceneRenderer) -> Result<bool, RenderError> {
        if !self.controls.refresh_enabled() {
            log::debug!("Refresh unavailable");
            return Ok(false);
        }
        self.rebuild(renderer)?;
        Ok(true)
    }

    fn rebuild(&mut self, renderer: &mut dyn SceneRenderer) -> Result<(), RenderError> {
        let Some(environment) = &self.environment else {
            return Ok(());
        };
        let start = Instant::now();
        let mesh = MeshBuilder::new(self.settings).build_from_image(environment.depth.as_ref());
        renderer.replace_mesh(&mesh)?;

        self.mesh = Some(MeshSummary {
            width_segments: mesh.width_segments(),
            height_segments: mesh.height_segments(),
            scale: mesh.scale(),
            displaced: mesh.is_displaced(),
        });
        self.controls.mark_clean();
        log::info!(
            "Mesh for '{}' rebuilt in {:.1}ms ({} vertices)",
            environment.name,
            start.elapsed().as_secs_f64() * 1000.0,
            mesh.vertices().len()
        );
        Ok(())
    }

    /// Shape of the mesh on screen
    pub fn mesh(&self) -> Option<MeshSummary> {
        self.mesh
    }

    // ---- Orientation ----

    /// Current angles
    pub fn orientation(&self) -> Orientation {
        self.orientation.orientation()
    }

    /// Commands waiting for the next frame
    pub fn queued_commands(&self) -> usize {
        self.queue.len()
    }

    /// Mouse button or touch pressed
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.pointer.on_down(x, y, &mut self.queue);
    }

    /// Pointer moved
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer.on_move(x, y, self.presenting, &mut self.queue);
    }

    /// Button released, touch ended or pointer left the surface
    pub fn pointer_up(&mut self) {
        self.pointer.on_up(&mut self.queue);
    }

    /// Rotation key pressed. Returns whether it was used.
    pub fn key(&mut self, action: KeyAction) -> bool {
        self.keyboard.on_key(action, self.presenting, &mut self.queue)
    }

    /// Whether the headset is presenting
    pub fn is_presenting(&self) -> bool {
        self.presenting
    }

    /// React to the headset starting or stopping.
    pub fn handle_session_event(
        &mut self,
        event: SessionEvent,
        renderer: &mut dyn SceneRenderer,
    ) -> Result<(), RenderError> {
        match event {
            SessionEvent::Started => {
                self.presenting = true;
                if self.controls.refresh_enabled() {
                    log::info!("Applying pending mesh settings for VR");
                    self.rebuild(renderer)?;
                }
                self.queue.reset_latitude();
            }
            SessionEvent::Ended => {
                self.presenting = false;
                self.end_xr_gestures();
            }
        }
        Ok(())
    }

    fn end_xr_gestures(&mut self) {
        for tracker in self.controllers.iter_mut().chain(self.hands.iter_mut()) {
            tracker.select_end(&mut self.queue);
        }
        self.pinches = [PinchDetector::new(self.input.pinch_threshold); 2];
        self.snaps = [SnapTurn::new(self.input.snap_deadzone, self.input.rotation_step); 2];
    }

    /// Turn controller and hand state into orientation commands.
    fn poll_xr_input(&mut self, xr: &XrSystem) {
        let head = xr.head_pose().position;

        for (slot, hand) in Hand::BOTH.into_iter().enumerate() {
            let controller = xr.controller_state(hand);
            let tracker = &mut self.controllers[slot];
            if controller.is_tracked {
                self.snaps[slot].update(controller.thumbstick[0], &mut self.queue);

                let selecting = controller.is_selecting();
                if selecting && !tracker.is_selecting() {
                    log::debug!("{:?} controller select start", side(hand));
                    tracker.select_start();
                } else if !selecting && tracker.is_selecting() {
                    tracker.select_end(&mut self.queue);
                }
                tracker.update(head, controller.pose.position, &mut self.queue);
            } else if tracker.is_selecting() {
                tracker.select_end(&mut self.queue);
            }

            self.poll_hand(xr, hand, slot, head);
        }
    }

    fn poll_hand(&mut self, xr: &XrSystem, hand: Hand, slot: usize, head: Vec3) {
        let joints = xr.hand_state(hand).filter(|h| h.is_tracked).and_then(|h| {
            Some((
                h.joint_position(HandJoint::Wrist)?,
                h.joint_position(HandJoint::ThumbTip)?,
                h.joint_position(HandJoint::IndexTip)?,
            ))
        });

        let tracker = &mut self.hands[slot];
        let Some((wrist, thumb_tip, index_tip)) = joints else {
            if tracker.is_selecting() {
                tracker.select_end(&mut self.queue);
            }
            self.pinches[slot] = PinchDetector::new(self.input.pinch_threshold);
            return;
        };

        match self.pinches[slot].update(index_tip, thumb_tip) {
            Some(PinchTransition::Started) => {
                log::debug!("{:?} hand pinch start", side(hand));
                tracker.select_start();
            }
            Some(PinchTransition::Ended) => tracker.select_end(&mut self.queue),
            None => {}
        }
        tracker.update(head, wrist, &mut self.queue);
    }

    // ---- Frame ----

    /// Run one frame: session edges, XR input, queued commands, draw.
    pub fn frame(
        &mut self,
        xr: &mut XrSystem,
        renderer: &mut dyn SceneRenderer,
    ) -> Result<(), RenderError> {
        for event in xr.poll_events() {
            self.handle_session_event(event, renderer)?;
        }

        if self.presenting {
            if let Err(e) = xr.begin_frame() {
                log::debug!("XR frame skipped: {}", e);
            } else {
                self.poll_xr_input(xr);
            }
        }

        let applied = self.queue.apply_pending(&mut self.orientation);
        if applied > 0 {
            log::trace!("Applied {} orientation command(s)", applied);
        }

        self.frame_index += 1;
        let view = FrameView::new(self.orientation.orientation(), self.frame_index, self.presenting);
        renderer.draw(&view)?;

        if self.frame_index % STATUS_LOG_INTERVAL == 1 {
            log::debug!("Frame {}: {}", self.frame_index, self.status());
        }
        Ok(())
    }

    /// Frames drawn so far
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Snapshot for status displays
    pub fn status(&self) -> ViewerStatus {
        ViewerStatus {
            environment: self.environment_name().map(str::to_string),
            loading: self.pending.as_ref().map(|p| p.name.clone()),
            settings: self.settings,
            controls: self.controls,
            orientation: self.orientation.orientation(),
            mesh: self.mesh,
            presenting: self.presenting,
        }
    }
}
