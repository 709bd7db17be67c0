#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

mod app;
mod gallery;
mod layout;
mod render;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{CursorIcon, Window, WindowAttributes, WindowId};

use app::App;
use render::RenderState;
use ui::input::{self, InputAction};

/// Main application handler for winit's event loop.
struct FolioApp {
    app: App,
    render_state: Option<RenderState>,
    window: Option<Arc<Window>>,
}

impl FolioApp {
    fn new(manifest_path: Option<PathBuf>) -> Self {
        let cards = App::load_cards(manifest_path.as_deref());
        Self {
            app: App::new(cards, manifest_path),
            render_state: None,
            window: None,
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn update_window_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        let expanded = self
            .app
            .gallery
            .expanded()
            .and_then(|id| self.app.gallery.card(id));
        match expanded {
            Some(card) => window.set_title(&format!("folio-rs - {}", card.title)),
            None => window.set_title("folio-rs - Portfolio"),
        }
    }

    fn handle_action(&mut self, action: InputAction) {
        if self.app.handle_action(action, Instant::now()) {
            self.update_window_title();
            self.request_redraw();
        }
    }

    fn open_settings(&mut self) {
        let settings = ui::config_dialog::run_config_dialog(
            "folio-rs - Settings",
            ui::config_dialog::DialogResult {
                manifest_path: self.app.manifest_path.clone(),
                layout: self.app.gallery.config().clone(),
            },
        );
        if let Some(settings) = settings {
            if let Err(e) = self.app.apply_settings(settings) {
                tracing::warn!("Failed to apply settings: {:#}", e);
            }
            self.update_window_title();
            self.request_redraw();
        }
    }
}

impl ApplicationHandler for FolioApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("folio-rs - Portfolio")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        match pollster::block_on(RenderState::new(window.clone())) {
            Ok(state) => {
                let size = window.inner_size();
                tracing::info!(
                    "Window initialized: scale_factor={:.3}, physical_size={}x{}",
                    window.scale_factor(),
                    size.width,
                    size.height
                );
                self.app.viewport_width = size.width as f32;
                self.app.viewport_height = size.height as f32;
                self.app.needs_relayout = true;
                self.app.refresh_chrome();
                self.render_state = Some(state);
                window.request_redraw();
            }
            Err(e) => {
                tracing::error!("Failed to initialize GPU: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(render) = &mut self.render_state {
                    render.resize(size.width, size.height);
                }
                self.handle_action(InputAction::Resize {
                    width: size.width,
                    height: size.height,
                });
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                tracing::info!("Scale factor changed: {:.3}", scale_factor);
                if let Some(window) = self.window.clone() {
                    let size = window.inner_size();
                    if let Some(render) = &mut self.render_state {
                        render.resize(size.width, size.height);
                    }
                    self.handle_action(InputAction::Resize {
                        width: size.width,
                        height: size.height,
                    });
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.handle_action(InputAction::Hover {
                    x: position.x as f32,
                    y: position.y as f32,
                });
                if let Some(window) = &self.window {
                    let pointer = self.app.hover_card.is_some() || self.app.hover_chrome.is_some();
                    window.set_cursor(if pointer {
                        CursorIcon::Pointer
                    } else {
                        CursorIcon::Default
                    });
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if button == winit::event::MouseButton::Left {
                    self.app.mouse.left_pressed = state == ElementState::Pressed;
                }
                let gallery = self
                    .app
                    .gallery
                    .layout()
                    .zip(self.app.frame());
                let action = input::process_mouse_button(
                    button,
                    state,
                    &self.app.mouse,
                    &self.app.chrome_regions,
                    gallery,
                );
                self.handle_action(action);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let action = input::process_wheel(delta);
                self.handle_action(action);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && matches!(event.logical_key.as_ref(), Key::Named(NamedKey::F2))
                {
                    self.open_settings();
                    return;
                }
                let action = input::process_key(event.logical_key.clone(), event.state);
                self.handle_action(action);
            }

            WindowEvent::RedrawRequested => {
                self.app.tick(Instant::now());
                if self.app.needs_relayout {
                    self.app.relayout();
                    self.app.update_hover();
                }

                self.app.rebuild_scene();

                if let Some(render) = &mut self.render_state {
                    if let Err(e) = render.render(&self.app.scene) {
                        tracing::error!("Render error: {:#}", e);
                    }
                }

                if self.app.scheduler.wants_frame() {
                    self.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.tick(Instant::now()) {
            self.app.update_hover();
            self.request_redraw();
        }
        match self.app.scheduler.next_deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("folio_rs=info".parse()?),
        )
        .init();

    // Optional manifest path argument; the demo gallery is used without one
    let manifest_path = std::env::args().nth(1).map(PathBuf::from);

    tracing::info!("folio-rs starting, manifest: {:?}", manifest_path);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = FolioApp::new(manifest_path);
    event_loop.run_app(&mut app)?;

    Ok(())
}
