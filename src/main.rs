//! Epicycle synth - hear and watch a stack of rotating circles.
//!
//! The same circles drive an additive-synthesis audio stream and a chained
//! epicycle drawing whose endpoint leaves a scrolling trail.

use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, ModifiersState, PhysicalKey},
    window::{Window, WindowId},
};

use epicycle_synth::audio::{record, AudioSystem};
use epicycle_synth::circles::CircleSet;
use epicycle_synth::cli::Args;
use epicycle_synth::editor::{CircleField, Editor, EditorAction};
use epicycle_synth::params::{DrawStyle, RenderConfig, SharedParams};
use epicycle_synth::rendering::{Mesh, RenderSystem};
use epicycle_synth::scene::{DrawCommand, RenderLoop, Viewport};

/// Where the display gets its time from
enum TimeSource {
    /// Audio-clock time of the running output stream
    Audio(AudioSystem),

    /// Wall-clock fallback when no audio device could be opened
    Monotonic(Instant),
}

impl TimeSource {
    fn current_time(&self) -> Option<f64> {
        match self {
            TimeSource::Audio(audio) => audio.current_time(),
            TimeSource::Monotonic(start) => Some(start.elapsed().as_secs_f64()),
        }
    }
}

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    render_loop: RenderLoop,
    commands: Vec<DrawCommand>,
    mesh: Mesh,

    // Keyboard editing
    editor: Editor,
    modifiers: ModifiersState,

    time_source: TimeSource,
    render_config: RenderConfig,
}

impl App {
    fn new(circles: CircleSet, params: Arc<SharedParams>, render_config: RenderConfig) -> Self {
        let time_source = match AudioSystem::new(circles.clone(), Arc::clone(&params)) {
            Ok(audio) => TimeSource::Audio(audio),
            Err(e) => {
                warn!("Audio unavailable ({}), animating on the wall clock", e);
                TimeSource::Monotonic(Instant::now())
            }
        };

        let viewport = Viewport::new(render_config.window_width, render_config.window_height);
        let render_loop = RenderLoop::new(
            circles.clone(),
            Arc::clone(&params),
            DrawStyle::default(),
            viewport,
        );
        let editor = Editor::new(circles, params);

        Self {
            window: None,
            render_system: None,
            render_loop,
            commands: Vec::new(),
            mesh: Mesh::new(),
            editor,
            modifiers: ModifiersState::empty(),
            time_source,
            render_config,
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title("Epicycle Synth")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        // Initialize rendering system
        match pollster::block_on(RenderSystem::new(Arc::clone(&window))) {
            Ok(render_system) => self.render_system = Some(render_system),
            Err(e) => {
                error!("Failed to initialize rendering: {}", e);
                event_loop.exit();
                return;
            }
        }

        info!("Epicycle synth is running");
        info!("Keys: A add circle, H add harmonic pair, Backspace remove last, L lock view");
        info!("      Up/Down fundamental, =/- zoom, ]/[ volume, Esc quit");
        info!("      Tab/Shift-Tab select circle, Delete remove selected");
        info!("      PageUp/PageDown radius, Right/Left speed, R/S type radius/speed");

        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                self.handle_key(event_loop, &event);
            }
            WindowEvent::Resized(size) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                if !self.render_frame() {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

impl App {
    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };

        let actions = if self.editor.entry().is_some() {
            entry_actions(code, event.text.as_deref())
        } else if code == KeyCode::Escape {
            event_loop.exit();
            return;
        } else {
            key_action(code, self.modifiers.shift_key())
                .into_iter()
                .collect()
        };

        for action in actions {
            if let Err(e) = self.editor.apply(action) {
                warn!("Edit rejected: {}", e);
            }
        }
    }

    /// Render a single frame. Returns `false` if rendering cannot continue.
    fn render_frame(&mut self) -> bool {
        let Some(render_system) = self.render_system.as_mut() else {
            return true;
        };

        let (width, height) = render_system.size();
        let viewport = Viewport::new(width, height);
        let time_s = self.time_source.current_time();

        self.render_loop.frame(time_s, viewport, &mut self.commands);
        self.mesh.build(&self.commands);

        match render_system.render(&self.mesh) {
            Ok(()) => true,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.resize(width, height);
                true
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("Render error: out of GPU memory");
                false
            }
            Err(e) => {
                warn!("Render error: {:?}", e);
                true
            }
        }
    }
}

/// Keyboard bindings for the circle and parameter editors
fn key_action(code: KeyCode, shift: bool) -> Option<EditorAction> {
    let action = match code {
        KeyCode::KeyA => EditorAction::AddCircle,
        KeyCode::KeyH => EditorAction::AddHarmonicPair,
        KeyCode::Backspace => EditorAction::RemoveLast,
        KeyCode::Delete => EditorAction::RemoveSelected,
        KeyCode::Tab if shift => EditorAction::SelectPrevious,
        KeyCode::Tab => EditorAction::SelectNext,
        KeyCode::PageUp => EditorAction::NudgeRadius(0.05),
        KeyCode::PageDown => EditorAction::NudgeRadius(-0.05),
        KeyCode::ArrowRight => EditorAction::NudgeSpeed(1.0),
        KeyCode::ArrowLeft => EditorAction::NudgeSpeed(-1.0),
        KeyCode::KeyR => EditorAction::BeginEntry(CircleField::Radius),
        KeyCode::KeyS => EditorAction::BeginEntry(CircleField::RelativeSpeed),
        KeyCode::KeyL => EditorAction::ToggleLockView,
        KeyCode::ArrowUp => EditorAction::NudgeFundamental(10.0),
        KeyCode::ArrowDown => EditorAction::NudgeFundamental(-10.0),
        KeyCode::Equal => EditorAction::ScaleZoom(1.25),
        KeyCode::Minus => EditorAction::ScaleZoom(1.0 / 1.25),
        KeyCode::BracketRight => EditorAction::NudgeVolume(0.05),
        KeyCode::BracketLeft => EditorAction::NudgeVolume(-0.05),
        _ => return None,
    };
    Some(action)
}

/// Keys while a field value is being typed
fn entry_actions(code: KeyCode, text: Option<&str>) -> Vec<EditorAction> {
    match code {
        KeyCode::Enter | KeyCode::NumpadEnter => vec![EditorAction::CommitEntry],
        KeyCode::Escape => vec![EditorAction::CancelEntry],
        KeyCode::Backspace => vec![EditorAction::EraseChar],
        _ => text
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_control())
            .map(EditorAction::TypeChar)
            .collect(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;

    let circles = CircleSet::new();
    args.populate(&circles);
    let params = Arc::new(SharedParams::new(args.synth_params()));

    if let Some(config) = args.recording_config() {
        record::render_to_wav(&config, &circles, params)?;
        return Ok(());
    }

    let mut app = App::new(circles, params, args.render_config());
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_direction_follows_shift() {
        assert_eq!(key_action(KeyCode::Tab, false), Some(EditorAction::SelectNext));
        assert_eq!(key_action(KeyCode::Tab, true), Some(EditorAction::SelectPrevious));
        assert_eq!(key_action(KeyCode::Delete, false), Some(EditorAction::RemoveSelected));
        assert_eq!(key_action(KeyCode::Backspace, false), Some(EditorAction::RemoveLast));
        assert_eq!(key_action(KeyCode::F1, false), None);
    }

    #[test]
    fn test_entry_keys() {
        assert_eq!(
            entry_actions(KeyCode::Digit1, Some("1")),
            vec![EditorAction::TypeChar('1')]
        );
        assert_eq!(
            entry_actions(KeyCode::Minus, Some("-")),
            vec![EditorAction::TypeChar('-')]
        );
        assert_eq!(entry_actions(KeyCode::Enter, Some("\r")), vec![EditorAction::CommitEntry]);
        assert_eq!(entry_actions(KeyCode::Escape, None), vec![EditorAction::CancelEntry]);
        assert!(entry_actions(KeyCode::ShiftLeft, None).is_empty());
    }
}
