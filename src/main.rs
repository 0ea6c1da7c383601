use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use glam::Vec2;
use log::{info, warn};
use pollster::block_on;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode as WinitKey, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowAttributes, WindowId};

use tabletop_scene::{
    FileImageDecoder, InputState, KeyCode, NamedKey, RecordingBackend, Renderer, SceneConfig,
    SceneContext, StaticViewport, WindowViewport,
};

/// Scroll distance of one wheel notch on touchpads reporting pixels.
const PIXELS_PER_LINE: f64 = 20.0;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    let config = match &options.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    if options.summary_only {
        return run_headless(&config);
    }

    match run_interactive(&config) {
        Ok(()) => Ok(()),
        Err(err) if err.downcast_ref::<WindowInitError>().is_some() => {
            eprintln!(
                "{err}. Falling back to --summary-only mode (set DISPLAY or install X11 libs to enable rendering)."
            );
            run_headless(&config)
        }
        Err(err) => Err(err),
    }
}

/// Runs one frame against the recording backend and prints what it did.
fn run_headless(config: &SceneConfig) -> Result<()> {
    let mut context = SceneContext::from_config(config)?;
    let mut backend = RecordingBackend::new();
    let summary = context.prepare(&FileImageDecoder::default(), &mut backend);

    println!("Loaded {} texture(s)", summary.textures);
    for entry in context.composer.textures().entries() {
        println!(" - {} -> unit {}", entry.tag, entry.slot);
    }
    println!("Defined {} material(s)", summary.materials);
    for material in context.composer.materials().materials() {
        println!(
            " - {} diffuse=({:.2}, {:.2}, {:.2}) shininess={:.1}",
            material.tag,
            material.diffuse.x,
            material.diffuse.y,
            material.diffuse.z,
            material.shininess
        );
    }

    println!("Set up {} light(s)", context.composer.lights().lights().len());

    let viewport = StaticViewport::new(config.window.width, config.window.height);
    let frame = context.frame(0.0, &InputState::new(), &viewport, &mut backend);
    let camera = frame.camera_position;
    println!(
        "Camera at ({:.2}, {:.2}, {:.2}), {:?} projection",
        camera.x, camera.y, camera.z, frame.mode
    );

    let objects = &context.composer.scene().objects;
    println!("Drew {} object(s)", backend.draws().len());
    for (object, draw) in objects.iter().zip(backend.draws()) {
        let texture = match (&object.texture, draw.texture) {
            (Some(tag), Some(_)) => tag.clone(),
            (Some(tag), None) => format!("{tag} (missing)"),
            (None, _) => "none".to_string(),
        };
        println!(
            " - {} [{}] material={} texture={}",
            object.name,
            object.mesh.name(),
            object.material.as_deref().unwrap_or("inherited"),
            texture
        );
    }

    context.shutdown(&mut backend);
    Ok(())
}

fn run_interactive(config: &SceneConfig) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| WindowInitError::from_error("event loop", err))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config.clone(), SceneContext::from_config(config)?);
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    config: SceneConfig,
    context: SceneContext,
    input: InputState,
    viewport: WindowViewport,
    renderer: Option<Renderer>,
    started: Instant,
    /// Sum of raw mouse deltas; the view controller expects absolute
    /// cursor positions.
    mouse: Vec2,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: SceneConfig, context: SceneContext) -> Self {
        let viewport = WindowViewport::new(config.window.width, config.window.height);
        Self {
            config,
            context,
            input: InputState::new(),
            viewport,
            renderer: None,
            started: Instant::now(),
            mouse: Vec2::ZERO,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.error = Some(err);
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.as_mut() {
            self.context.shutdown(renderer);
        }
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        renderer.begin_frame();
        let now = self.started.elapsed().as_secs_f64();
        let frame = self
            .context
            .frame(now, &self.input, &self.viewport, renderer);

        match renderer.end_frame() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = renderer.window().inner_size();
                renderer.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(event_loop, anyhow!("GPU is out of memory"));
                return;
            }
            Err(err) => warn!("surface error: {err}; retrying next frame"),
        }

        if frame.close_requested {
            self.shutdown(event_loop);
        }
    }

    fn handle_key(&self, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let Some(key) = map_keycode(code) else {
            return;
        };
        match event.state {
            ElementState::Pressed => self.input.set_key_down(key),
            ElementState::Released => self.input.set_key_up(key),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.fail(event_loop, WindowInitError::from_error("window", err).into());
                return;
            }
        };
        capture_cursor(&window);

        let mut renderer = match block_on(Renderer::new(Arc::clone(&window))) {
            Ok(renderer) => renderer,
            Err(err) => {
                self.fail(event_loop, err);
                return;
            }
        };
        let size = renderer.size();
        self.viewport.update(size.width, size.height);
        self.context
            .prepare(&FileImageDecoder::default(), &mut renderer);
        info!("window ready ({}x{})", size.width, size.height);
        self.renderer = Some(renderer);
        // Window, GPU and texture setup must not count as the first frame.
        self.context
            .restart_clock(self.started.elapsed().as_secs_f64());
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        match self.renderer.as_ref() {
            Some(renderer) if renderer.window_id() == window_id => {}
            _ => return,
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size);
                }
                self.viewport.update(size.width, size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event),
            WindowEvent::MouseWheel { delta, .. } => {
                let y_offset = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => (position.y / PIXELS_PER_LINE) as f32,
                };
                self.context.on_scroll(y_offset);
            }
            WindowEvent::Focused(false) => self.input.clear(),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.mouse += Vec2::new(dx as f32, dy as f32);
            self.context.on_mouse_move(self.mouse.x, self.mouse.y);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.as_ref() {
            renderer.window().request_redraw();
        }
    }
}

/// Hides and locks the cursor so mouse motion only steers the camera.
fn capture_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    if let Err(err) = grabbed {
        warn!("could not capture cursor: {err}");
    }
    window.set_cursor_visible(false);
}

#[derive(Debug)]
struct WindowInitError {
    message: String,
}

impl WindowInitError {
    fn from_error(stage: &str, err: impl fmt::Display) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {err}"),
        }
    }
}

impl fmt::Display for WindowInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for WindowInitError {}

struct CliOptions {
    config: Option<PathBuf>,
    summary_only: bool,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut config = None;
        let mut summary_only = false;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args
                        .next()
                        .ok_or_else(|| anyhow!("--config expects a path"))?;
                    config = Some(PathBuf::from(path));
                }
                "--summary-only" => summary_only = true,
                other => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Usage: tabletop-scene [--config <file.toml>] [--summary-only]"
                    ));
                }
            }
        }
        Ok(Self {
            config,
            summary_only,
        })
    }
}

fn map_keycode(code: WinitKey) -> Option<KeyCode> {
    use WinitKey as Key;
    Some(match code {
        Key::Space => KeyCode::Named(NamedKey::Space),
        Key::Enter => KeyCode::Named(NamedKey::Enter),
        Key::Tab => KeyCode::Named(NamedKey::Tab),
        Key::ArrowLeft => KeyCode::Named(NamedKey::Left),
        Key::ArrowRight => KeyCode::Named(NamedKey::Right),
        Key::ArrowUp => KeyCode::Named(NamedKey::Up),
        Key::ArrowDown => KeyCode::Named(NamedKey::Down),
        Key::Escape => KeyCode::Named(NamedKey::Escape),
        Key::Backspace => KeyCode::Named(NamedKey::Backspace),
        Key::PageUp => KeyCode::Named(NamedKey::PageUp),
        Key::PageDown => KeyCode::Named(NamedKey::PageDown),
        Key::ShiftLeft => KeyCode::Named(NamedKey::LeftShift),
        Key::ShiftRight => KeyCode::Named(NamedKey::RightShift),
        Key::ControlLeft => KeyCode::Named(NamedKey::LeftCtrl),
        Key::ControlRight => KeyCode::Named(NamedKey::RightCtrl),
        Key::Digit0 => KeyCode::Digit(0),
        Key::Digit1 => KeyCode::Digit(1),
        Key::Digit2 => KeyCode::Digit(2),
        Key::Digit3 => KeyCode::Digit(3),
        Key::Digit4 => KeyCode::Digit(4),
        Key::Digit5 => KeyCode::Digit(5),
        Key::Digit6 => KeyCode::Digit(6),
        Key::Digit7 => KeyCode::Digit(7),
        Key::Digit8 => KeyCode::Digit(8),
        Key::Digit9 => KeyCode::Digit(9),
        Key::KeyA => KeyCode::Character('A'),
        Key::KeyB => KeyCode::Character('B'),
        Key::KeyC => KeyCode::Character('C'),
        Key::KeyD => KeyCode::Character('D'),
        Key::KeyE => KeyCode::Character('E'),
        Key::KeyF => KeyCode::Character('F'),
        Key::KeyG => KeyCode::Character('G'),
        Key::KeyH => KeyCode::Character('H'),
        Key::KeyI => KeyCode::Character('I'),
        Key::KeyJ => KeyCode::Character('J'),
        Key::KeyK => KeyCode::Character('K'),
        Key::KeyL => KeyCode::Character('L'),
        Key::KeyM => KeyCode::Character('M'),
        Key::KeyN => KeyCode::Character('N'),
        Key::KeyO => KeyCode::Character('O'),
        Key::KeyP => KeyCode::Character('P'),
        Key::KeyQ => KeyCode::Character('Q'),
        Key::KeyR => KeyCode::Character('R'),
        Key::KeyS => KeyCode::Character('S'),
        Key::KeyT => KeyCode::Character('T'),
        Key::KeyU => KeyCode::Character('U'),
        Key::KeyV => KeyCode::Character('V'),
        Key::KeyW => KeyCode::Character('W'),
        Key::KeyX => KeyCode::Character('X'),
        Key::KeyY => KeyCode::Character('Y'),
        Key::KeyZ => KeyCode::Character('Z'),
        Key::F1 => KeyCode::Function(1),
        Key::F2 => KeyCode::Function(2),
        Key::F3 => KeyCode::Function(3),
        Key::F4 => KeyCode::Function(4),
        Key::F5 => KeyCode::Function(5),
        Key::F6 => KeyCode::Function(6),
        Key::F7 => KeyCode::Function(7),
        Key::F8 => KeyCode::Function(8),
        Key::F9 => KeyCode::Function(9),
        Key::F10 => KeyCode::Function(10),
        Key::F11 => KeyCode::Function(11),
        Key::F12 => KeyCode::Function(12),
        _ => return None,
    })
}
