//! wgpu renderer for the tree scene.
//!
//! Frame layout: ornaments (opaque, depth write) then foliage (additive, depth
//! test only) into an HDR target, then the finishing pass to the surface and
//! the optional egui overlay on top.

mod camera;
mod foliage_pass;
mod mesh;
mod ornament_pass;
#[cfg(feature = "egui")]
mod overlay;
mod post_process;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::GpuError;
use crate::foliage::FoliageUniforms;
use crate::scene::TreeScene;
use crate::shaders::{GlobalsUniform, LightingUniform};
use crate::state::TreeState;
use crate::visuals::VisualConfig;

pub use camera::OrbitCamera;
use foliage_pass::FoliagePass;
use ornament_pass::OrnamentPass;
use post_process::PostProcessState;

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
pub(crate) const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Per-frame input from the application.
pub struct FrameInput<'a> {
    pub foliage: FoliageUniforms,
    pub state: TreeState,
    pub greeting: &'a str,
}

pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    visuals: VisualConfig,
    pub camera: OrbitCamera,
    globals_buffer: wgpu::Buffer,
    _lighting_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    post: PostProcessState,
    foliage: FoliagePass,
    ornaments: OrnamentPass,
    #[cfg(feature = "egui")]
    overlay: overlay::Overlay,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        scene: &TreeScene,
        visuals: VisualConfig,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Arix Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let camera = OrbitCamera::new();
        let globals = GlobalsUniform::new(
            camera.view_matrix(),
            camera.projection_matrix(config.width as f32 / config.height as f32),
            camera.position(),
            scene.offset(),
            (config.width, config.height),
            0.0,
        );
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globals Buffer"),
            contents: bytemuck::bytes_of(&globals),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lighting = LightingUniform::from(&visuals.lighting);
        let lighting_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lighting Buffer"),
            contents: bytemuck::bytes_of(&lighting),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lighting_buffer.as_entire_binding(),
                },
            ],
        });

        let post = PostProcessState::new(&device, config.width, config.height, config.format);
        let foliage = FoliagePass::new(&device, &globals_layout, &scene.foliage().vertices(), &visuals);
        let ornaments = OrnamentPass::new(&device, &globals_layout, scene.ornaments());

        #[cfg(feature = "egui")]
        let overlay = overlay::Overlay::new(&device, config.format, &window);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            visuals,
            camera,
            globals_buffer,
            _lighting_buffer: lighting_buffer,
            globals_bind_group,
            post,
            foliage,
            ornaments,
            #[cfg(feature = "egui")]
            overlay,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.post.resize(&self.device, new_size.width, new_size.height);
        }
    }

    /// Reconfigure the surface at its current size.
    pub fn reconfigure(&mut self) {
        self.resize(winit::dpi::PhysicalSize::new(self.config.width, self.config.height));
    }

    /// Returns true if the overlay consumed the event.
    #[allow(unused_variables)]
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        #[cfg(feature = "egui")]
        {
            self.overlay.on_window_event(window, event)
        }
        #[cfg(not(feature = "egui"))]
        {
            false
        }
    }

    /// Draw one frame. Returns a state chosen in the overlay, if any.
    #[allow(unused_variables)]
    pub fn render(
        &mut self,
        scene: &mut TreeScene,
        frame: &FrameInput<'_>,
        window: &Window,
    ) -> Result<Option<TreeState>, wgpu::SurfaceError> {
        let (width, height) = (self.config.width, self.config.height);
        let time = frame.foliage.time;

        let globals = GlobalsUniform::new(
            self.camera.view_matrix(),
            self.camera.projection_matrix(width as f32 / height as f32),
            self.camera.position(),
            scene.offset(),
            (width, height),
            time,
        );
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        self.foliage
            .update(&self.queue, &self.visuals, frame.foliage.progress);
        self.post
            .update(&self.queue, &self.visuals.post, width, height, time);
        self.ornaments.upload(&self.queue, scene.buffers_mut());

        let output = self.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let bg = self.visuals.background;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.post.target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.x as f64,
                            g: bg.y as f64,
                            b: bg.z as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.post.target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            self.ornaments.draw(&mut pass);
            self.foliage.draw(&mut pass);
        }

        self.post.draw(&mut encoder, &surface_view);

        #[cfg(feature = "egui")]
        let (requested, overlay_commands) = {
            let (ui, requested) = self.overlay.run(window, frame.state, frame.greeting);
            let commands = self.overlay.render(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_view,
                ui,
                [width, height],
            );
            (requested, commands)
        };
        #[cfg(not(feature = "egui"))]
        let (requested, overlay_commands): (Option<TreeState>, Vec<wgpu::CommandBuffer>) =
            (None, Vec::new());

        self.queue.submit(
            overlay_commands
                .into_iter()
                .chain(std::iter::once(encoder.finish())),
        );
        output.present();

        Ok(requested)
    }
}
