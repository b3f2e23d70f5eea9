//! Quantum Verses
//!
//! Quantum-mechanics visualizations paired with Madhyamaka verses.
//!
//! Controls:
//! - Left drag: Orbit camera
//! - Scroll: Zoom
//! - Right / N: Next verse
//! - Left / P: Previous verse
//! - Space: Pause / resume
//! - C: Reset camera
//! - Escape: Quit

use anyhow::Context as _;
use clap::Parser;
use common::GraphicsContext;
use quantum_verses::panel_ui::{self, NavAction, PanelOutput};
use quantum_verses::renderer::SceneRenderer;
use quantum_verses::{AppConfig, Cli, SceneHost, CATALOGUE};
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

struct App {
    ctx: GraphicsContext,
    renderer: SceneRenderer,
    host: SceneHost,
    egui: EguiState,
    dragging: bool,
    last_cursor: Option<PhysicalPosition<f64>>,
}

impl App {
    fn new(ctx: GraphicsContext, config: &AppConfig) -> anyhow::Result<Self> {
        let mut host = match config.seed {
            Some(seed) => SceneHost::seeded(CATALOGUE, seed),
            None => SceneHost::new(CATALOGUE),
        };
        host.set_aspect_ratio(ctx.aspect_ratio());
        host.activate(config.start_index)?;
        host.set_paused(config.paused);

        let renderer = SceneRenderer::new(&ctx, host.camera(), config.max_points, config.max_lines);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        Ok(Self {
            ctx,
            renderer,
            host,
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
            dragging: false,
            last_cursor: None,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.host.set_aspect_ratio(self.ctx.aspect_ratio());
    }

    fn navigate(&mut self, action: NavAction) {
        match action {
            NavAction::Next => {
                self.host.next();
            }
            NavAction::Previous => {
                self.host.previous();
            }
            NavAction::TogglePause => self.host.toggle_paused(),
            NavAction::ResetCamera => self.host.reset_camera(),
        }
    }

    fn apply(&mut self, output: PanelOutput) {
        for event in output.events {
            self.host.dispatch(event);
        }
        if let Some(action) = output.nav {
            self.navigate(action);
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Build egui UI first so its events land in this frame's scene
        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        let mut panel_output = PanelOutput::default();
        let full_output = self.egui.ctx.run(raw_input, |ctx| {
            panel_output = panel_ui::draw(ctx, &self.host);
        });
        self.apply(panel_output);

        self.renderer.update_camera(&self.ctx.queue, self.host.camera());
        self.renderer.prepare(&self.ctx.queue, self.host.scene());

        self.egui.state.handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self.egui.ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui.renderer.update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view);

        self.egui.renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui.renderer.render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Returns `true` when the app should quit
    fn handle_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        if state != ElementState::Pressed {
            return false;
        }

        match key {
            KeyCode::Escape => return true,
            KeyCode::ArrowRight | KeyCode::KeyN => self.navigate(NavAction::Next),
            KeyCode::ArrowLeft | KeyCode::KeyP => self.navigate(NavAction::Previous),
            KeyCode::Space => self.navigate(NavAction::TogglePause),
            KeyCode::KeyC => self.navigate(NavAction::ResetCamera),
            _ => {}
        }
        false
    }

    fn handle_cursor(&mut self, position: PhysicalPosition<f64>) {
        if let (true, Some(last)) = (self.dragging, self.last_cursor) {
            let dx = (position.x - last.x) as f32;
            let dy = (position.y - last.y) as f32;
            self.host.camera_mut().drag(dx, dy);
        }
        self.last_cursor = Some(position);
    }

    fn handle_scroll(&mut self, delta: f32) {
        self.host.camera_mut().zoom(delta);
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui.state.on_window_event(&self.ctx.window, event).consumed
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli, CATALOGUE)?;

    let (ctx, event_loop) = pollster::block_on(GraphicsContext::new(
        "Quantum Verses - Madhyamaka Visualizations",
        config.width,
        config.height,
    ))
    .context("failed to initialize graphics")?;

    log::info!(
        "{} verses loaded, starting at #{}",
        quantum_verses::content::flatten(CATALOGUE).len(),
        config.start_index + 1
    );

    let mut app = App::new(ctx, &config)?;
    let mut last_time = std::time::Instant::now();

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                let consumed = app.handle_window_event(event);

                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(size) => app.resize(*size),
                    WindowEvent::MouseInput {
                        state,
                        button: MouseButton::Left,
                        ..
                    } => {
                        app.dragging = *state == ElementState::Pressed && !consumed;
                    }
                    WindowEvent::CursorMoved { position, .. } => app.handle_cursor(*position),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(key),
                                state,
                                ..
                            },
                        ..
                    } if !consumed => {
                        if app.handle_key(*key, *state) {
                            elwt.exit();
                        }
                    }
                    WindowEvent::MouseWheel { delta, .. } if !consumed => {
                        let scroll = match delta {
                            MouseScrollDelta::LineDelta(_, y) => *y,
                            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                        };
                        app.handle_scroll(scroll);
                    }
                    WindowEvent::RedrawRequested => {
                        let now = std::time::Instant::now();
                        let dt = (now - last_time).as_secs_f32().min(0.1);
                        last_time = now;

                        app.host.tick(dt);
                        match app.render() {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("GPU out of memory");
                                elwt.exit();
                            }
                            Err(e) => log::warn!("render error: {:?}", e),
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                app.ctx.window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
