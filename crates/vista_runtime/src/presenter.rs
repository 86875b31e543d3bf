//! Window surface and GPU device for the viewer

use std::sync::Arc;

use wgpu::*;
use winit::window::Window;

use vista_viewer::RenderError;

/// Owns the wgpu device and the surface frames are presented to
pub struct DesktopPresenter {
    surface: Surface<'static>,
    device: Device,
    queue: Queue,
    config: SurfaceConfiguration,
    format: TextureFormat,
    size: (u32, u32),
}

impl DesktopPresenter {
    /// Pick an adapter for `window` and configure its surface.
    pub async fn new(window: Arc<Window>) -> Result<Self, RenderError> {
        let instance = Instance::new(InstanceDescriptor {
            backends: Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| RenderError::Backend(format!("surface creation failed: {}", e)))?;

        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| RenderError::Backend("no compatible GPU adapter".into()))?;

        let info = adapter.get_info();
        log::info!("GPU adapter: {} ({:?})", info.name, info.backend);

        // 8192-segment meshes and 8K skyboxes go past the default limits.
        let adapter_limits = adapter.limits();
        let required_limits = Limits {
            max_buffer_size: adapter_limits.max_buffer_size,
            max_texture_dimension_2d: adapter_limits.max_texture_dimension_2d,
            ..Limits::downlevel_defaults()
        };

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some("vista_device"),
                    required_features: Features::empty(),
                    required_limits: required_limits.clone(),
                    memory_hints: MemoryHints::default(),
                },
                None,
            )
            .await
            .map_err(|e| RenderError::Backend(format!("device request failed: {}", e)))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::Backend("surface reports no formats".into()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(CompositeAlphaMode::Auto);

        let size = window.inner_size();
        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        log::info!(
            "Surface {}x{} {:?}, buffers up to {} MiB, textures up to {}px",
            config.width,
            config.height,
            format,
            required_limits.max_buffer_size / (1024 * 1024),
            required_limits.max_texture_dimension_2d
        );

        let size = (config.width, config.height);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            format,
            size,
        })
    }

    /// GPU device
    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Color format of the surface
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Surface size in pixels
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Resize the surface. Zero-sized (minimized) windows are ignored.
    pub fn resize(&mut self, new_size: (u32, u32)) {
        if new_size.0 > 0 && new_size.1 > 0 {
            self.size = new_size;
            self.config.width = new_size.0;
            self.config.height = new_size.1;
            self.surface.configure(&self.device, &self.config);
            log::debug!("Surface resized to {}x{}", new_size.0, new_size.1);
        }
    }

    /// Reconfigure after the surface was lost or outdated
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Next surface texture to draw into
    pub fn acquire_frame(&mut self) -> Result<SurfaceTexture, RenderError> {
        self.surface.get_current_texture().map_err(|e| match e {
            SurfaceError::Lost | SurfaceError::Outdated => RenderError::SurfaceLost,
            SurfaceError::Timeout => RenderError::Timeout,
            SurfaceError::OutOfMemory => RenderError::OutOfMemory,
        })
    }
}
