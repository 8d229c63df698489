use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use viewscape_common::{SurfaceSize, ViewportConfig};
use viewscape_input::{Key, Modifiers};
use viewscape_render_wgpu::WgpuBackend;
use viewscape_viewport::{SurfaceEvents, Viewport, ViewportState};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "viewscape-desktop", about = "Viewscape desktop viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Viewport configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial window width
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Initial window height
    #[arg(long, default_value_t = 600)]
    height: u32,
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::Space => Key::Space,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::Escape => Key::Escape,
        _ => Key::Other,
    }
}

fn map_modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
    }
}

/// Host window owning the viewport. The viewport only exists while a
/// window does.
struct HostContainer {
    config: ViewportConfig,
    initial_size: PhysicalSize<u32>,
    window: Option<Arc<Window>>,
    viewport: Option<Viewport<WgpuBackend>>,
    modifiers: Modifiers,
    error: Option<anyhow::Error>,
}

impl HostContainer {
    fn new(config: ViewportConfig, initial_size: PhysicalSize<u32>) -> Self {
        Self {
            config,
            initial_size,
            window: None,
            viewport: None,
            modifiers: Modifiers::NONE,
            error: None,
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(viewport) = &mut self.viewport {
            viewport.dispose();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for HostContainer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Viewscape")
            .with_inner_size(self.initial_size);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(anyhow::anyhow!("failed to create window: {e}"));
                event_loop.exit();
                return;
            }
        };

        let backend = WgpuBackend::new(window.clone(), &self.config);
        let mut viewport = Viewport::new(backend, self.config.clone());
        let size = window.inner_size();
        viewport.on_ready(SurfaceSize::clamped(size.width, size.height), Instant::now());

        if viewport.state() == ViewportState::Failed {
            let reason = viewport
                .failure()
                .map(ToString::to_string)
                .unwrap_or_default();
            self.error = Some(anyhow::anyhow!("viewport setup failed: {reason}"));
            event_loop.exit();
            return;
        }

        window.request_redraw();
        self.window = Some(window);
        self.viewport = Some(viewport);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(viewport) = &mut self.viewport else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(new_size) => {
                viewport.on_resize(new_size.width, new_size.height);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => viewport.on_redraw_requested(Instant::now()),
            WindowEvent::ModifiersChanged(mods) => {
                self.modifiers = map_modifiers(mods.state());
                viewport.on_modifiers_changed(self.modifiers);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                let key = map_key(code);
                match state {
                    ElementState::Pressed if key == Key::Escape => self.shutdown(event_loop),
                    ElementState::Pressed if !repeat => viewport.on_key(key, self.modifiers),
                    ElementState::Pressed => {}
                    ElementState::Released => viewport.on_key_released(key, self.modifiers),
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                viewport.on_pointer_move(position.x as f32, position.y as f32);
            }
            WindowEvent::CursorEntered { .. } | WindowEvent::Focused(true) => {
                viewport.on_activated();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(viewport)) = (&self.window, &mut self.viewport) else {
            return;
        };
        if viewport.poll_tick(Instant::now()) {
            window.request_redraw();
        }
        match viewport.next_tick() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(viewport) = &mut self.viewport {
            viewport.dispose();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config = ViewportConfig::load_or_default(cli.config.as_deref())?;
    config.validate()?;
    tracing::info!(
        "viewscape-desktop starting ({} api, tick {:?})",
        config.surface.api,
        config.tick_interval()
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut host = HostContainer::new(config, PhysicalSize::new(cli.width, cli.height));
    event_loop.run_app(&mut host)?;

    match host.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
