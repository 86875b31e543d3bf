//! wgpu renderer for the environment sphere

use std::sync::Arc;

use glam::Mat4;
use wgpu::util::DeviceExt;
use wgpu::*;
use winit::window::Window;

use vista_asset::ColorImage;
use vista_mesh::{EnvironmentMesh, SkyVertex};
use vista_viewer::{FrameView, RenderError, SceneRenderer, WindowConfig};

use crate::presenter::DesktopPresenter;

const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Textured environment sphere seen from its center
const SPHERE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;
@group(1) @binding(0) var sky_texture: texture_2d<f32>;
@group(1) @binding(1) var sky_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(in.position, 1.0);
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    // v = 1 is the top image row
    return textureSample(sky_texture, sky_sampler, vec2<f32>(in.uv.x, 1.0 - in.uv.y));
}
"#;

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

struct GpuMesh {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn destroy(self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}

struct GpuTexture {
    texture: Texture,
    bind_group: BindGroup,
}

/// Draws one textured sphere mesh into the window surface
pub struct SphereRenderer {
    presenter: DesktopPresenter,
    pipeline: RenderPipeline,
    uniform_buffer: Buffer,
    uniform_bind_group: BindGroup,
    texture_layout: BindGroupLayout,
    sampler: Sampler,
    texture: Option<GpuTexture>,
    mesh: Option<GpuMesh>,
    depth_view: TextureView,
    fov_degrees: f32,
    near: f32,
    far: f32,
}

impl SphereRenderer {
    /// Create the renderer for `window`
    pub async fn new(window: Arc<Window>, camera: &WindowConfig) -> Result<Self, RenderError> {
        let presenter = DesktopPresenter::new(window).await?;
        let device = presenter.device();

        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("sphere_shader"),
            source: ShaderSource::Wgsl(SPHERE_SHADER.into()),
        });

        let uniform_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("sphere_uniform_layout"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("sphere_texture_layout"),
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Float { filterable: true },
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let uniform_buffer = device.create_buffer_init(&util::BufferInitDescriptor {
            label: Some("sphere_uniforms"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("sphere_uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // U wraps across the seam; V stops at the poles.
        let sampler = device.create_sampler(&SamplerDescriptor {
            label: Some("sky_sampler"),
            address_mode_u: AddressMode::Repeat,
            address_mode_v: AddressMode::ClampToEdge,
            address_mode_w: AddressMode::ClampToEdge,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            mipmap_filter: FilterMode::Nearest,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("sphere_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let vertex_layout = VertexBufferLayout {
            array_stride: std::mem::size_of::<SkyVertex>() as BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: &[
                VertexAttribute {
                    format: VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0, // position
                },
                VertexAttribute {
                    format: VertexFormat::Float32x2,
                    offset: 12,
                    shader_location: 1, // uv
                },
            ],
        };

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("sphere_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[vertex_layout],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(ColorTargetState {
                    format: presenter.format(),
                    blend: None,
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                // Inverted sphere: front faces point at the center
                cull_mode: Some(Face::Back),
                unclipped_depth: false,
                polygon_mode: PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: CompareFunction::Less,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let depth_view = create_depth_view(device, presenter.size());

        let mut renderer = Self {
            presenter,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_layout,
            sampler,
            texture: None,
            mesh: None,
            depth_view,
            fov_degrees: camera.fov_degrees,
            near: camera.near,
            far: camera.far,
        };
        renderer.upload_texture(&ColorImage::solid([0, 0, 0, 255]))?;
        Ok(renderer)
    }

    /// Resize surface and depth buffer
    pub fn resize(&mut self, size: (u32, u32)) {
        if size.0 == 0 || size.1 == 0 {
            return;
        }
        self.presenter.resize(size);
        self.depth_view = create_depth_view(self.presenter.device(), size);
    }

    /// Reconfigure a lost surface
    pub fn reconfigure(&mut self) {
        self.presenter.reconfigure();
    }

    fn projection(&self) -> Mat4 {
        let (width, height) = self.presenter.size();
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }

    /// Bring oversized images down to the device's texture limit.
    fn fit_to_device(&self, image: &ColorImage) -> Result<Option<ColorImage>, RenderError> {
        let max = self.presenter.device().limits().max_texture_dimension_2d;
        if image.width <= max && image.height <= max {
            return Ok(None);
        }
        let scale = max as f32 / image.width.max(image.height) as f32;
        let width = ((image.width as f32 * scale) as u32).max(1);
        let height = ((image.height as f32 * scale) as u32).max(1);
        log::warn!(
            "Skybox {}x{} exceeds texture limit {}, downscaling to {}x{}",
            image.width,
            image.height,
            max,
            width,
            height
        );

        let rgba = image::RgbaImage::from_raw(image.width, image.height, image.data.clone())
            .ok_or_else(|| RenderError::Backend("skybox buffer does not match its size".into()))?;
        let resized = image::imageops::resize(&rgba, width, height, image::imageops::FilterType::Triangle);
        Ok(Some(ColorImage::from_image(&image::DynamicImage::ImageRgba8(resized))))
    }
}

impl SceneRenderer for SphereRenderer {
    fn upload_texture(&mut self, image: &ColorImage) -> Result<(), RenderError> {
        let resized = self.fit_to_device(image)?;
        let image = resized.as_ref().unwrap_or(image);

        let device = self.presenter.device();
        let size = Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let format = if image.srgb {
            TextureFormat::Rgba8UnormSrgb
        } else {
            TextureFormat::Rgba8Unorm
        };

        let texture = device.create_texture(&TextureDescriptor {
            label: Some("skybox_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.presenter.queue().write_texture(
            ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: Origin3d::ZERO,
                aspect: TextureAspect::All,
            },
            &image.data,
            ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(image.bytes_per_row),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("skybox_bind_group"),
            layout: &self.texture_layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::TextureView(&view),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        if let Some(old) = self.texture.replace(GpuTexture { texture, bind_group }) {
            old.texture.destroy();
        }
        log::debug!("Uploaded skybox texture {}x{}", image.width, image.height);
        Ok(())
    }

    fn replace_mesh(&mut self, mesh: &EnvironmentMesh) -> Result<(), RenderError> {
        let device = self.presenter.device();
        let vertex_bytes: &[u8] = bytemuck::cast_slice(mesh.vertices());
        let limit = device.limits().max_buffer_size;
        if vertex_bytes.len() as u64 > limit {
            return Err(RenderError::Backend(format!(
                "mesh needs {} bytes of vertices, device allows {}",
                vertex_bytes.len(),
                limit
            )));
        }

        let vertex_buffer = device.create_buffer_init(&util::BufferInitDescriptor {
            label: Some("sphere_vertices"),
            contents: vertex_bytes,
            usage: BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&util::BufferInitDescriptor {
            label: Some("sphere_indices"),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: BufferUsages::INDEX,
        });

        let next = GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices().len() as u32,
        };
        if let Some(old) = self.mesh.replace(next) {
            old.destroy();
        }
        Ok(())
    }

    fn draw(&mut self, view: &FrameView) -> Result<(), RenderError> {
        let view_proj = self.projection() * view.model_matrix();
        self.presenter.queue().write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: view_proj.to_cols_array_2d(),
            }),
        );

        let frame = self.presenter.acquire_frame()?;
        let target = frame.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = self
            .presenter
            .device()
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("sphere_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("sphere_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(Color::BLACK),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let (Some(mesh), Some(texture)) = (&self.mesh, &self.texture) {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.set_bind_group(1, &texture.bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.presenter.queue().submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn create_depth_view(device: &Device, size: (u32, u32)) -> TextureView {
    let texture = device.create_texture(&TextureDescriptor {
        label: Some("depth_texture"),
        size: Extent3d {
            width: size.0.max(1),
            height: size.1.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&TextureViewDescriptor::default())
}
