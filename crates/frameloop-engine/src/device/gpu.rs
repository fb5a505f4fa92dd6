use std::sync::Arc;

use anyhow::{Context, Result};
use winit::window::Window;

use crate::coords::Viewport;
use crate::render::{chunks, FrameUniforms, RenderSurface, SurfaceSize};
use crate::scene::{Camera, Scene};

use super::frame::GpuFrame;
use super::{surface, GpuInit, SurfaceErrorAction};

/// Vertex stage shared by every backdrop shader.
const BACKDROP_VERTEX: &str = include_str!("shaders/backdrop.wgsl");

/// Render surface bound to a winit window.
///
/// Owns the wgpu device and swapchain. Each render clears to
/// `Scene::background` and, when a backdrop is installed, draws it as a
/// full-screen pass reading the frame uniforms (group 0, binding 0).
pub struct GpuSurface {
    window: Arc<Window>,

    // Kept alive for the lifetime of the surface.
    _instance: wgpu::Instance,
    _adapter: wgpu::Adapter,

    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    /// Logical size and density as last applied by the application.
    viewport: Viewport,
    /// False while the window reports a zero dimension.
    presentable: bool,

    uniform_buffer: wgpu::Buffer,
    uniform_layout: wgpu::BindGroupLayout,
    uniform_bind_group: wgpu::BindGroup,
    backdrop: Option<wgpu::RenderPipeline>,
}

impl GpuSurface {
    /// Blocking variant of [`new`](Self::new) for use on the event-loop thread.
    pub fn new_blocking(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::new(window, init))
    }

    /// Creates the wgpu context for `window`.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("frameloop device"),
                required_features: wgpu::Features::empty(),
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps, prefer_srgb)
            .context("no supported surface formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode: surface::choose_alpha_mode(&caps, alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frameloop uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frameloop uniforms bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frameloop uniforms bind group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let scale = window.scale_factor();
        let logical = size.to_logical::<f64>(scale);

        log::info!(
            "gpu surface ready: {:?} {}x{} ({:?})",
            adapter.get_info().backend,
            size.width,
            size.height,
            format
        );

        Ok(Self {
            window,
            _instance: instance,
            _adapter: adapter,
            surface,
            device,
            queue,
            config,
            viewport: Viewport::new(
                logical.width.round() as u32,
                logical.height.round() as u32,
                scale,
            ),
            presentable: true,
            uniform_buffer,
            uniform_layout,
            uniform_bind_group,
            backdrop: None,
        })
    }

    /// Installs a full-screen backdrop.
    ///
    /// `fragment` must define `fs_main(in: VsOut) -> @location(0) vec4<f32>`;
    /// `VsOut` and the `frame` uniform are provided. Requires the
    /// `frameloop_uniforms` chunk to be registered (the application does this
    /// unless `add_shader_chunk` is off).
    pub fn set_backdrop(&mut self, fragment: &str) -> Result<()> {
        let source = chunks::resolve_includes(&format!("{BACKDROP_VERTEX}\n{fragment}"))
            .context("failed to assemble backdrop shader")?;

        let shader = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("frameloop backdrop shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("frameloop backdrop pipeline layout"),
            bind_group_layouts: &[&self.uniform_layout],
            immediate_size: 0,
        });

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("frameloop backdrop pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.backdrop = Some(pipeline);
        Ok(())
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    fn begin_frame(&self) -> std::result::Result<GpuFrame, wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frameloop frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    fn submit(&self, frame: GpuFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        self.window.pre_present_notify();
        frame.surface_texture.present();
    }
}

impl RenderSurface for GpuSurface {
    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.viewport.width, self.viewport.height)
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.viewport.pixel_density = ratio;
    }

    fn set_size(&mut self, width: u32, height: u32, _update_style: bool) {
        // The window itself is the presenting element and already has this
        // size; only the swapchain follows.
        self.viewport.width = width;
        self.viewport.height = height;
        self.presentable = match surface::backing_size(self.window.inner_size()) {
            Some(physical) => surface::configure_for_size(
                &self.surface,
                &self.device,
                &mut self.config,
                physical,
            ),
            None => false,
        };
    }

    fn sync_uniforms(&mut self, uniforms: &FrameUniforms) {
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    fn render(&mut self, scene: &Scene, _camera: &dyn Camera) {
        if !self.presentable {
            return;
        }

        let mut frame = match self.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                let action =
                    surface::recover_from_error(&self.surface, &self.device, &self.config, err);
                if action == SurfaceErrorAction::Fatal {
                    log::error!("surface out of memory; frame dropped");
                }
                return;
            }
        };

        let bg = scene.background;

        // Pass is dropped before the encoder is moved into submit().
        {
            let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frameloop main pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.r as f64,
                            g: bg.g as f64,
                            b: bg.b as f64,
                            a: bg.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(pipeline) = self.backdrop.as_ref() {
                pass.set_pipeline(pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.draw(0..3, 0..1);
            }
        }

        self.submit(frame);
    }
}
