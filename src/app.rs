use std::sync::Arc;

use glam::Vec2;
use instant::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId, WindowLevel};

use crate::config::PetConfig;
use crate::host::WinitHost;
use crate::pet::{PetEngine, PetEvent};
#[cfg(windows)]
use crate::platform;
use crate::tray::{TrayCommand, TrayIcon};

// ---------------------------------------------------------------------------
// Hover tracking
// ---------------------------------------------------------------------------

/// Turns "is the cursor over the sprite" samples into enter/leave edges.
#[derive(Debug, Default)]
struct HoverTracker {
    inside: bool,
}

impl HoverTracker {
    fn update(&mut self, inside: bool) -> Option<PetEvent> {
        if inside == self.inside {
            return None;
        }
        self.inside = inside;
        Some(if inside {
            PetEvent::PointerEntered
        } else {
            PetEvent::PointerLeft
        })
    }
}

/// Is a window-local logical point over the opaque sprite region?
fn over_sprite(local: Vec2, config: &PetConfig) -> bool {
    let (min, max) = config.hit_area();
    local.x >= min && local.x <= max && local.y >= min && local.y <= max
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Top-level application state.
struct App {
    config: PetConfig,
    window: Option<Arc<Window>>,
    engine: Option<PetEngine<WinitHost>>,
    tray: Option<TrayIcon>,
    hover: HoverTracker,
}

impl App {
    fn new(config: PetConfig) -> Self {
        Self {
            config,
            window: None,
            engine: None,
            tray: None,
            hover: HoverTracker::default(),
        }
    }

    fn send(&mut self, event: PetEvent) {
        if let Some(engine) = &mut self.engine {
            engine.handle(event, Instant::now());
        }
    }

    /// Feed a window-local logical cursor sample into hover tracking.
    fn cursor_at(&mut self, local: Option<Vec2>) {
        let inside = local.is_some_and(|p| over_sprite(p, &self.config));
        if let Some(edge) = self.hover.update(inside) {
            log::trace!("Pointer {edge:?}");
            self.send(edge);
        }
    }

    /// The click-through window gets no cursor events, so poll the global cursor.
    #[cfg(windows)]
    fn poll_cursor(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let Ok(origin) = window.outer_position() else {
            return;
        };
        let scale = window.scale_factor() as f32;
        let (mx, my) = platform::win32::get_mouse_pos();
        let local = (Vec2::new(mx, my) - Vec2::new(origin.x as f32, origin.y as f32)) / scale;
        self.cursor_at(Some(local));
    }

    fn poll_tray(&mut self, event_loop: &ActiveEventLoop) {
        let Some(tray) = &mut self.tray else {
            return;
        };
        let command = tray.poll();
        if command != TrayCommand::None {
            log::info!("Tray command: {command:?}");
        }
        match command {
            TrayCommand::None => {}
            TrayCommand::ToggleVisible => {
                if let Some(window) = &self.window {
                    let visible = window.is_visible().unwrap_or(true);
                    window.set_visible(!visible);
                }
            }
            TrayCommand::ToggleSleep => self.send(PetEvent::ToggleSleep),
            TrayCommand::About => self.send(PetEvent::AboutAcknowledged),
            TrayCommand::Quit => event_loop.exit(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let size = self.config.window_size as f64;
        let attrs = WindowAttributes::default()
            .with_title("Chill")
            .with_decorations(false)
            .with_transparent(true)
            .with_resizable(false)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_inner_size(LogicalSize::new(size, size));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create pet window: {e}");
                event_loop.exit();
                return;
            }
        };

        #[cfg(windows)]
        platform::win32::setup_pet_window(&window);

        let mut engine = PetEngine::new(
            self.config.clone(),
            WinitHost::new(window.clone()),
            Instant::now(),
        );
        engine.start();
        log::info!("Pet window created ({size}x{size})");

        self.tray = TrayIcon::new();
        self.engine = Some(engine);
        self.window = Some(window);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.poll_tray(event_loop);

        #[cfg(windows)]
        self.poll_cursor();

        let Some(engine) = &mut self.engine else {
            return;
        };
        engine.advance_to(Instant::now());
        let control = match engine.next_deadline() {
            Some(at) => ControlFlow::WaitUntil(at),
            None => ControlFlow::Wait,
        };
        event_loop.set_control_flow(control);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let Some(window) = &self.window else {
                    return;
                };
                let logical = position.to_logical::<f32>(window.scale_factor());
                self.cursor_at(Some(Vec2::new(logical.x, logical.y)));
            }
            WindowEvent::CursorLeft { .. } => self.cursor_at(None),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if self.hover.inside {
                    self.send(PetEvent::PointerPressed);
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::info!("Chill shutting down");
        self.tray = None;
    }
}

/// Entry point: create event loop and run.
pub fn run(config: PetConfig) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}
