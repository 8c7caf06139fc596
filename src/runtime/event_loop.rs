use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::debug;

use crate::artwork::ArtworkSource;
use crate::audio::DecoderFactory;
use crate::config;
use crate::controller::{PlaybackController, ProgressChange};
use crate::library::{MediaIndex, PermissionGate};
use crate::ui::{self, Screen};

/// Longest time the loop waits for input when no tick is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Library directory shown in the track list title.
    pub dir: String,
    /// Cursor position in the track list.
    pub selected: usize,
    /// Inner area of the progress bar from the last frame.
    pub progress_area: Rect,
    last_playing_index: Option<usize>,
}

impl EventLoopState {
    pub fn new<F: DecoderFactory, A: ArtworkSource>(
        dir: String,
        controller: &PlaybackController<F, A>,
    ) -> Self {
        let current = controller.state().map(|s| s.current_index);
        Self {
            dir,
            selected: current.unwrap_or(0),
            progress_area: Rect::default(),
            last_playing_index: current,
        }
    }

    /// Move the cursor onto the current track whenever the track changes.
    fn follow_playback<F: DecoderFactory, A: ArtworkSource>(
        &mut self,
        controller: &PlaybackController<F, A>,
    ) {
        let current = controller.state().map(|s| s.current_index);
        if current != self.last_playing_index {
            if let Some(i) = current {
                self.selected = i;
            }
            self.last_playing_index = current;
        }
        self.selected = self
            .selected
            .min(controller.tracks().len().saturating_sub(1));
    }
}

/// Main terminal event loop: fires the refresh tick, draws the screen and
/// dispatches input. Returns `Ok(())` when the user quits.
pub fn run<F: DecoderFactory, A: ArtworkSource>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    controller: &mut PlaybackController<F, A>,
    index: &impl MediaIndex,
    gate: &impl PermissionGate,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        controller.fire_due_tick(Instant::now());
        state.follow_playback(controller);

        terminal.draw(|f| {
            let screen = Screen {
                display: controller.display(),
                tracks: controller.tracks(),
                state: controller.state(),
                selected: state.selected,
                dir: &state.dir,
                ui: &settings.ui,
                controls: &settings.controls,
            };
            state.progress_area = ui::draw(f, &screen);
        })?;

        let timeout = poll_timeout(controller.tick_deadline(), Instant::now());
        if !event::poll(timeout)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key_event(key, settings, controller, index, gate, state) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => handle_mouse_event(mouse, controller, state),
            _ => {}
        }
    }
}

/// How long to wait for input before the next tick is due.
fn poll_timeout(deadline: Option<Instant>, now: Instant) -> Duration {
    deadline
        .map(|d| d.saturating_duration_since(now))
        .unwrap_or(IDLE_POLL)
        .min(IDLE_POLL)
}

/// Map a click column inside the progress bar to a fraction of the bar.
fn ratio_at(area: Rect, column: u16, row: u16) -> Option<f64> {
    let inside = area.width > 0
        && column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height;
    if !inside {
        return None;
    }
    let span = area.width.saturating_sub(1).max(1) as f64;
    Some(((column - area.x) as f64 / span).min(1.0))
}

fn handle_mouse_event<F: DecoderFactory, A: ArtworkSource>(
    mouse: MouseEvent,
    controller: &mut PlaybackController<F, A>,
    state: &EventLoopState,
) {
    let pressed = matches!(
        mouse.kind,
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left)
    );
    if !pressed {
        return;
    }
    if let Some(ratio) = ratio_at(state.progress_area, mouse.column, mouse.row) {
        let value = controller.display().progress.value_at_ratio(ratio);
        debug!(ratio, value, "progress bar clicked");
        controller.on_progress_change(ProgressChange::user(value));
    }
}

fn handle_key_event<F: DecoderFactory, A: ArtworkSource>(
    key: KeyEvent,
    settings: &config::Settings,
    controller: &mut PlaybackController<F, A>,
    index: &impl MediaIndex,
    gate: &impl PermissionGate,
    state: &mut EventLoopState,
) -> bool {
    let now = Instant::now();
    let scrub_millis = settings.controls.scrub_seconds.saturating_mul(1_000) as i64;
    let last = controller.tracks().len().saturating_sub(1);

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char(' ') | KeyCode::Char('p') => controller.toggle(now),
        KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Right => controller.play_next(now),
        KeyCode::Char('h') | KeyCode::Char('b') | KeyCode::Left => controller.play_previous(now),
        KeyCode::Char('L') => controller.seek_by(scrub_millis),
        KeyCode::Char('H') => controller.seek_by(-scrub_millis),
        KeyCode::Char(c @ '0'..='9') => {
            let tenths = c.to_digit(10).unwrap_or(0) as f64 / 10.0;
            let value = controller.display().progress.value_at_ratio(tenths);
            controller.on_progress_change(ProgressChange::user(value));
        }
        KeyCode::Char('j') | KeyCode::Down => state.selected = (state.selected + 1).min(last),
        KeyCode::Char('k') | KeyCode::Up => state.selected = state.selected.saturating_sub(1),
        KeyCode::Char('g') | KeyCode::Home => state.selected = 0,
        KeyCode::Char('G') | KeyCode::End => state.selected = last,
        KeyCode::Enter => controller.switch_to(state.selected, now),
        KeyCode::Char('r') => {
            controller.load_library(index, gate, now);
            state.selected = 0;
        }
        _ => {}
    }

    false
}
