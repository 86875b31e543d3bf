//! Windowed viewer application

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowAttributes, WindowId},
};

use vista_asset::EnvironmentLoader;
#[cfg(feature = "file-watcher")]
use vista_asset::{EnvironmentWatcher, ENVIRONMENTS_DIR};
use vista_viewer::{LoadRequest, RenderError, Viewer, ViewerConfig};
use vista_xr::{Hand, SimulatedHandle, XrSystem};

use crate::bindings::{self, RuntimeAction};
use crate::sphere_renderer::SphereRenderer;

/// Frames between periodic info logs
const FRAME_LOG_INTERVAL: u64 = 300;

/// Everything the window needs, created before the event loop starts
pub struct ViewerApp {
    config: ViewerConfig,
    viewer: Viewer,
    loader: EnvironmentLoader,
    #[cfg(feature = "file-watcher")]
    watcher: Option<EnvironmentWatcher>,
    xr: XrSystem,
    simulated: Option<SimulatedHandle>,
    window: Option<Arc<Window>>,
    renderer: Option<SphereRenderer>,
    cursor: (f32, f32),
    title: String,
    started: Instant,
}

impl ViewerApp {
    /// Set up loading and the viewer, and request the first environment.
    pub fn new(
        config: ViewerConfig,
        loader: EnvironmentLoader,
        xr: XrSystem,
        simulated: Option<SimulatedHandle>,
    ) -> Self {
        let mut viewer = Viewer::new(&config);
        match loader.list_environments() {
            Ok(listing) => viewer.set_listing(listing),
            Err(e) => log::error!("Failed to list environments: {}", e),
        }

        #[cfg(feature = "file-watcher")]
        let watcher = match loader.source().root() {
            Some(root) if config.source.watch => {
                match EnvironmentWatcher::new(root.join(ENVIRONMENTS_DIR)) {
                    Ok(watcher) => Some(watcher),
                    Err(e) => {
                        log::warn!("Environment list will not refresh: {}", e);
                        None
                    }
                }
            }
            _ => None,
        };

        let mut app = Self {
            config,
            viewer,
            loader,
            #[cfg(feature = "file-watcher")]
            watcher,
            xr,
            simulated,
            window: None,
            renderer: None,
            cursor: (0.0, 0.0),
            title: String::new(),
            started: Instant::now(),
        };
        if let Some(request) = app.viewer.initial_selection() {
            app.start_load(request);
        }
        app
    }

    /// Run until the window closes
    pub fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn start_load(&self, request: LoadRequest) {
        self.loader.request(&request.name, request.generation);
    }

    fn apply_action(&mut self, action: RuntimeAction, event_loop: &ActiveEventLoop) {
        let result = match action {
            RuntimeAction::Rotate(key) => {
                self.viewer.key(key);
                Ok(false)
            }
            RuntimeAction::MinDistance(delta) => self.viewer.adjust_min_distance(delta),
            RuntimeAction::DepthRange(delta) => self.viewer.adjust_depth_range(delta),
            RuntimeAction::Resolution(offset) => self.viewer.step_resolution(offset),
            RuntimeAction::Refresh => {
                if let Some(renderer) = &mut self.renderer {
                    if let Err(e) = self.viewer.refresh(renderer) {
                        log::error!("Mesh refresh failed: {}", e);
                    }
                }
                Ok(false)
            }
            RuntimeAction::Environment(offset) => {
                if let Some(request) = self.viewer.select_relative(offset) {
                    self.start_load(request);
                }
                Ok(false)
            }
            RuntimeAction::ToggleVr => {
                self.toggle_vr();
                Ok(false)
            }
            RuntimeAction::SimulatedThumbstick(x) => {
                if let Some(handle) = &self.simulated {
                    handle.set_thumbstick_x(Hand::Right, x);
                }
                Ok(false)
            }
            RuntimeAction::Exit => {
                log::info!("Escape pressed, shutting down...");
                self.xr.shutdown();
                event_loop.exit();
                Ok(false)
            }
        };

        match result {
            Ok(true) => log::debug!("Settings edited: {:?}", self.viewer.settings()),
            Ok(false) => {}
            Err(e) => e.report(),
        }
    }

    fn toggle_vr(&mut self) {
        if self.xr.is_presenting() {
            self.xr.exit_vr();
        } else if let Err(e) = self.xr.enter_vr() {
            log::warn!("Cannot enter VR: {}", e);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = &mut self.renderer else { return };

        for completion in self.loader.poll() {
            if let Err(e) = self.viewer.on_load_completed(completion, renderer) {
                log::error!("Failed to show environment: {}", e);
            }
        }

        #[cfg(feature = "file-watcher")]
        if self.watcher.as_mut().map_or(false, |w| w.poll()) {
            match self.loader.list_environments() {
                Ok(listing) => self.viewer.set_listing(listing),
                Err(e) => log::warn!("Failed to re-list environments: {}", e),
            }
        }

        match self.viewer.frame(&mut self.xr, renderer) {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => renderer.reconfigure(),
            Err(e) if e.is_fatal() => {
                log::error!("{}, shutting down", e);
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("Frame skipped: {}", e),
        }

        let frame = self.viewer.frame_index();
        if frame % FRAME_LOG_INTERVAL == 1 {
            let seconds = self.started.elapsed().as_secs_f64();
            log::info!(
                "Frame {} ({:.1} fps avg): {}",
                frame,
                frame as f64 / seconds.max(f64::EPSILON),
                self.viewer.status()
            );
        }

        let title = format!("{} - {}", self.config.window.title, self.viewer.status());
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(SphereRenderer::new(window.clone(), &self.config.window)) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(e) => {
                log::error!("Failed to initialize renderer: {}", e);
                event_loop.exit();
                return;
            }
        }
        self.window = Some(window);

        log::info!("Viewer ready. {}", bindings::HELP);
        if self.simulated.is_some() {
            log::info!("Simulated XR: V toggles the session, J/L push the right thumbstick");
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Shutdown requested...");
                self.xr.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize((size.width, size.height));
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                self.viewer.pointer_move(self.cursor.0, self.cursor.1);
            }

            WindowEvent::CursorLeft { .. } => self.viewer.pointer_up(),

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.viewer.pointer_down(self.cursor.0, self.cursor.1),
                ElementState::Released => self.viewer.pointer_up(),
            },

            WindowEvent::Touch(touch) => {
                let (x, y) = (touch.location.x as f32, touch.location.y as f32);
                match touch.phase {
                    TouchPhase::Started => self.viewer.pointer_down(x, y),
                    TouchPhase::Moved => self.viewer.pointer_move(x, y),
                    TouchPhase::Ended | TouchPhase::Cancelled => self.viewer.pointer_up(),
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else { return };
                let Some(action) = bindings::action_for(code) else { return };

                match (event.state, action) {
                    (ElementState::Released, RuntimeAction::SimulatedThumbstick(_)) => {
                        self.apply_action(RuntimeAction::SimulatedThumbstick(0.0), event_loop);
                    }
                    (ElementState::Pressed, _) if !event.repeat => self.apply_action(action, event_loop),
                    _ => {}
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
