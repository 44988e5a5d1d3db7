//! Egui overlay: brand title, greeting and the CHAOS / FORM selector.

use crate::state::TreeState;
use winit::window::Window;

const GOLD: egui::Color32 = egui::Color32::from_rgb(255, 215, 0);
const PALE_GOLD: egui::Color32 = egui::Color32::from_rgb(255, 242, 176);
const MUTED: egui::Color32 = egui::Color32::from_rgb(120, 140, 125);

/// Egui context, winit state and wgpu renderer.
pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

/// Tessellated output of one overlay frame.
pub struct OverlayFrame {
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
}

impl Overlay {
    pub fn new(device: &wgpu::Device, output_format: wgpu::TextureFormat, window: &Window) -> Self {
        let ctx = egui::Context::default();

        let mut style = egui::Style::default();
        style.visuals = egui::Visuals::dark();
        style.visuals.window_shadow = egui::Shadow::NONE;
        style.visuals.popup_shadow = egui::Shadow::NONE;
        ctx.set_style(style);

        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let renderer = egui_wgpu::Renderer::new(device, output_format, None, 1, false);

        Self { ctx, state, renderer }
    }

    /// Returns true if egui consumed the event.
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Lay out the overlay. Also returns the state picked with the buttons,
    /// if any.
    pub fn run(
        &mut self,
        window: &Window,
        current: TreeState,
        greeting: &str,
    ) -> (OverlayFrame, Option<TreeState>) {
        let raw_input = self.state.take_egui_input(window);
        self.ctx.begin_pass(raw_input);
        let requested = draw_ui(&self.ctx, current, greeting);
        let full_output = self.ctx.end_pass();

        self.state
            .handle_platform_output(window, full_output.platform_output);
        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let frame = OverlayFrame {
            paint_jobs,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        };
        (frame, requested)
    }

    /// Record the overlay on top of `target`. The returned command buffers
    /// must be submitted before `encoder`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        frame: OverlayFrame,
        size_in_pixels: [u32; 2],
    ) -> Vec<wgpu::CommandBuffer> {
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: frame.pixels_per_point,
        };

        for (id, delta) in &frame.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        let commands = self
            .renderer
            .update_buffers(device, queue, encoder, &frame.paint_jobs, &screen);

        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Overlay Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();
            self.renderer.render(&mut pass, &frame.paint_jobs, &screen);
        }

        for id in &frame.textures_delta.free {
            self.renderer.free_texture(id);
        }
        commands
    }
}

fn draw_ui(ctx: &egui::Context, current: TreeState, greeting: &str) -> Option<TreeState> {
    egui::Area::new(egui::Id::new("arix_brand"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(40.0, 36.0))
        .show(ctx, |ui| {
            ui.label(egui::RichText::new("ARIX").size(56.0).strong().color(GOLD));
            ui.label(
                egui::RichText::new("Signature Collection")
                    .size(15.0)
                    .italics()
                    .color(PALE_GOLD),
            );
            ui.add_space(12.0);
            ui.label(egui::RichText::new(greeting).size(17.0).italics().color(PALE_GOLD));
        });

    let mut requested = None;
    egui::Area::new(egui::Id::new("arix_selector"))
        .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -56.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for state in [TreeState::Scattered, TreeState::TreeShape] {
                    let text = egui::RichText::new(state.label()).size(18.0).color(GOLD);
                    if ui.selectable_label(current == state, text).clicked() && current != state {
                        requested = Some(state);
                    }
                }
            });
        });

    egui::Area::new(egui::Id::new("arix_footer"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-32.0, -24.0))
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new("INTERACTIVE 3D EXPERIENCE")
                    .size(11.0)
                    .color(MUTED),
            );
        });

    requested
}
