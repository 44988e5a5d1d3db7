//! Window, event loop and per-frame driving.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::SceneConfig;
use crate::error::AppError;
use crate::gpu::{FrameInput, Renderer};
use crate::greeting::greeting_from_env;
use crate::scene::TreeScene;
use crate::state::TreeState;
use crate::time::FrameClock;
use crate::visuals::VisualConfig;

const TITLE: &str = "Arix Signature Collection";
const TITLE_REFRESH_FRAMES: u64 = 30;

/// Open the window and run until it is closed.
///
/// Blocks the calling thread. Window or GPU setup failures end the loop and
/// are returned here.
pub fn run(config: SceneConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(&config, VisualConfig::default());
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    scene: TreeScene,
    visuals: VisualConfig,
    state: TreeState,
    clock: FrameClock,
    greeting: String,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    error: Option<AppError>,
}

impl App {
    /// The binary bundles no `GreetingSource`, so the overlay always shows
    /// [`FALLBACK_GREETING`](crate::greeting::FALLBACK_GREETING) even when `API_KEY` is set.
    fn new(config: &SceneConfig, visuals: VisualConfig) -> Self {
        Self {
            scene: TreeScene::new(config),
            visuals,
            state: TreeState::default(),
            clock: FrameClock::new(),
            greeting: greeting_from_env(None),
            window: None,
            renderer: None,
            mouse_pressed: false,
            last_mouse_pos: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn set_state(&mut self, state: TreeState) {
        if state != self.state {
            log::info!("Tree state: {} -> {}", self.state, state);
            self.state = state;
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        match key {
            KeyCode::Space => self.set_state(self.state.toggled()),
            KeyCode::KeyC => self.set_state(TreeState::Scattered),
            KeyCode::KeyF => self.set_state(TreeState::TreeShape),
            KeyCode::KeyP => {
                self.clock.toggle_pause();
                log::info!("Animation {}", if self.clock.is_paused() { "paused" } else { "resumed" });
            }
            KeyCode::Escape => event_loop.exit(),
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(renderer)) = (self.window.clone(), self.renderer.as_mut()) else {
            return;
        };

        let frame = self.clock.tick();
        let foliage = self.scene.tick(self.state, frame);
        renderer
            .camera
            .update(frame.delta, self.state == TreeState::TreeShape);

        let input = FrameInput {
            foliage,
            state: self.state,
            greeting: &self.greeting,
        };

        let mut requested = None;
        match renderer.render(&mut self.scene, &input, &window) {
            Ok(state) => requested = state,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        if let Some(state) = requested {
            self.set_state(state);
        }

        if self.clock.frame() % TITLE_REFRESH_FRAMES == 0 {
            window.set_title(&format!("{} | {} | {:.0} fps", TITLE, self.state, self.clock.fps()));
        }
        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        match pollster::block_on(Renderer::new(window.clone(), &self.scene, self.visuals)) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(e) => return self.fail(event_loop, e.into()),
        }

        log::info!(
            "Controls: Space toggles, C = {}, F = {}, P pauses, drag to orbit, wheel to zoom",
            TreeState::Scattered,
            TreeState::TreeShape
        );

        // Start timing from the first frame, not from scene generation.
        self.clock = FrameClock::new();
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let consumed = match (&self.window, &mut self.renderer) {
            (Some(window), Some(renderer)) => renderer.on_window_event(window, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } if !consumed => {
                self.handle_key(event_loop, key);
            }
            WindowEvent::MouseInput { state, button, .. } if !consumed => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = (position.x - last_x) as f32;
                        let dy = (position.y - last_y) as f32;
                        if let Some(renderer) = &mut self.renderer {
                            renderer.camera.rotate(dx, dy);
                        }
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } if !consumed => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                if let Some(renderer) = &mut self.renderer {
                    renderer.camera.zoom(scroll);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }
}
