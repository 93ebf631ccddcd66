//! Terminal rendering surface.
//!
//! Owns the terminal (raw mode, alternate screen, hidden cursor), the frame
//! clock and the frame loop. The particle layer is ticked once per frame
//! from here and never sees the terminal itself.

use crate::driver::{Clock, FixedClock, FrameHandler, ParticleLayer, SurfaceClock};
use crate::error::FieldError;
use crate::graphics::Canvas;
use crate::state::AppState;
use crate::widget::ParticleWidget;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, tty::IsTty};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What a key press asks the loop to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Quit,
    TogglePause,
    ToggleDebug,
    None,
}

fn action_for(key: &KeyEvent) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('p') | KeyCode::Char('P') => Action::TogglePause,
        KeyCode::Char('d') | KeyCode::Char('D') => Action::ToggleDebug,
        _ => Action::None,
    }
}

/// Decides whether a terminal can host the field, returning its size as
/// `(cols, rows)`.
fn check_surface(is_tty: bool, size: Option<termsize::Size>) -> Result<(u16, u16), FieldError> {
    if !is_tty {
        return Err(FieldError::SurfaceUnavailable(
            "stdout is not a terminal".into(),
        ));
    }
    match size {
        Some(size) if size.cols > 0 && size.rows > 0 => Ok((size.cols, size.rows)),
        Some(size) => Err(FieldError::SurfaceUnavailable(format!(
            "terminal has no drawable area ({}x{})",
            size.cols, size.rows
        ))),
        None => Err(FieldError::SurfaceUnavailable(
            "could not determine terminal size".into(),
        )),
    }
}

/// A terminal taken over for full-screen drawing. Restored on drop.
pub struct TerminalSurface {
    stdout: Stdout,
    canvas: Canvas,
}

impl TerminalSurface {
    /// Takes over the terminal.
    ///
    /// Fails with [`FieldError::SurfaceUnavailable`] when stdout is not a
    /// terminal or its size cannot be determined.
    pub fn open() -> Result<Self, FieldError> {
        let stdout = io::stdout();
        let (cols, rows) = check_surface(stdout.is_tty(), termsize::get())?;

        enable_raw_mode()?;
        let mut surface = TerminalSurface {
            stdout,
            canvas: Canvas::new(cols, rows),
        };
        execute!(surface.stdout, EnterAlternateScreen, Hide)?;

        // stderr shares the screen from here on
        debug!("opened terminal surface {cols}x{rows}");
        Ok(surface)
    }

    /// Runs the frame loop until the user quits.
    pub fn run(
        &mut self,
        layer: &mut ParticleLayer,
        widget: &mut ParticleWidget,
        fps: u32,
        debug_overlay: bool,
    ) -> Result<(), FieldError> {
        let frame_budget = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
        let mut clock = SurfaceClock::start();
        let mut state = AppState {
            debug: debug_overlay,
            ..AppState::default()
        };

        loop {
            let frame_start = Instant::now();

            let elapsed = clock.elapsed();
            layer.on_tick(elapsed);
            let visible = widget.paint_layer(&mut self.canvas, layer);
            widget.paint_overlay(&mut self.canvas, layer, &state, elapsed, visible);
            self.canvas.flush(&mut self.stdout)?;
            widget.count_frame(&mut state);

            // Handle input for the rest of the frame budget
            loop {
                let remaining = frame_budget.saturating_sub(frame_start.elapsed());
                if !event::poll(remaining)? {
                    break;
                }
                match event::read()? {
                    Event::Key(key) => match action_for(&key) {
                        Action::Quit => {
                            debug!("quit requested at {elapsed:.2}s");
                            return Ok(());
                        }
                        Action::TogglePause => {
                            state.paused = clock.toggle_pause();
                            debug!(paused = clock.is_paused(), "pause toggled");
                        }
                        Action::ToggleDebug => state.debug = !state.debug,
                        Action::None => {}
                    },
                    Event::Resize(cols, rows) => {
                        debug!("terminal resized to {cols}x{rows}");
                        self.canvas.resize(cols, rows);
                    }
                    _ => {}
                }
            }
        }
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if let Err(e) = execute!(self.stdout, Show, LeaveAlternateScreen) {
            warn!("failed to leave alternate screen: {e}");
        }
        if let Err(e) = disable_raw_mode() {
            warn!("failed to disable raw mode: {e}");
        }
        info!("closed terminal surface");
    }
}

/// Renders a single frame at a fixed elapsed time, as plain text
pub fn render_snapshot(
    layer: &mut ParticleLayer,
    widget: &ParticleWidget,
    clock: FixedClock,
    cols: u16,
    rows: u16,
) -> String {
    let mut canvas = Canvas::new(cols, rows);
    layer.on_tick(clock.elapsed());
    let visible = widget.paint_layer(&mut canvas, layer);
    debug!(visible, elapsed = clock.elapsed(), "rendered snapshot");
    canvas.to_plain_string()
}
