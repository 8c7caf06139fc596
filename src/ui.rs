//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the single player screen using `ratatui`.

mod art;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::config::{ControlsSettings, UiSettings};
use crate::controller::{DisplayState, PlaybackState, Status};
use crate::library::Track;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next song");
    // H/L is filled dynamically from config.
    map.insert("0-9", "jump to 0-90%");
    map.insert("j/k", "up/down");
    map.insert("enter", "play selected");
    map.insert("r", "reload library");
    map.insert("q", "quit");
    map
});

/// Everything the screen needs for one frame.
pub struct Screen<'a> {
    pub display: &'a DisplayState,
    pub tracks: &'a [Track],
    pub state: Option<&'a PlaybackState>,
    pub selected: usize,
    pub dir: &'a str,
    pub ui: &'a UiSettings,
    pub controls: &'a ControlsSettings,
}

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let order = ["space/p", "h/l", "H/L", "0-9", "j/k", "enter", "r", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{scrub_seconds}s"))
            } else {
                CONTROLS_MAP.get(k).map(|v| format!("[{k}] {v}"))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Text of the "now playing" line.
fn now_playing_text(screen: &Screen) -> String {
    let display = screen.display;
    match display.status {
        Status::Track => {
            let marker = match screen.state {
                Some(s) if s.is_playing => "▶",
                _ => "⏸",
            };
            format!("{marker} {}", display.title)
        }
        Status::Idle => String::new(),
        _ => display.title.clone(),
    }
}

/// Compute a window of `height` rows over `total` items that keeps `selected` centered.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the screen. Returns the inner area of the progress bar so mouse
/// input can be mapped back to a position.
pub fn draw(frame: &mut Frame, screen: &Screen) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(screen.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" tonearm ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_body(frame, screen, chunks[1]);

    // Now playing
    let title_style = match screen.display.status {
        Status::Track | Status::Idle => Style::default().add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::Red),
    };
    let now_playing = Paragraph::new(now_playing_text(screen))
        .style(title_style)
        .block(padded(" now playing "))
        .wrap(Wrap { trim: true });
    frame.render_widget(now_playing, chunks[2]);

    // Progress
    let display = screen.display;
    let progress_block = Block::bordered().title(" progress ");
    let progress_inner = progress_block.inner(chunks[3]);
    let gauge = Gauge::default()
        .block(progress_block)
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
        .ratio(display.progress.ratio().clamp(0.0, 1.0))
        .label(format!("{} / {}", display.elapsed, display.total));
    frame.render_widget(gauge, chunks[3]);

    let footer = Paragraph::new(controls_text(screen.controls.scrub_seconds))
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    progress_inner
}

fn draw_body(frame: &mut Frame, screen: &Screen, area: Rect) {
    let ui = screen.ui;
    let (art_area, list_area) = match (ui.show_artwork, ui.show_track_list) {
        (true, true) => {
            // Cells are about twice as tall as wide; keep the art panel square.
            let art_width = area.height.saturating_sub(2).saturating_mul(2).saturating_add(2);
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(art_width), Constraint::Min(10)])
                .split(area);
            (Some(cols[0]), Some(cols[1]))
        }
        (true, false) => (Some(area), None),
        (false, true) => (None, Some(area)),
        (false, false) => (None, None),
    };

    if let Some(area) = art_area {
        let block = Block::bordered().title(" artwork ");
        let inner = block.inner(area);
        let lines = art::artwork_lines(&screen.display.artwork, inner.width, inner.height);
        let art = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(art, area);
    }

    if let Some(area) = list_area {
        draw_track_list(frame, screen, area);
    }
}

fn draw_track_list(frame: &mut Frame, screen: &Screen, area: Rect) {
    let total = screen.tracks.len();
    let height = area.height.saturating_sub(2) as usize;
    let selected = screen.selected.min(total.saturating_sub(1));
    let (start, end) = visible_window(total, height, selected);
    let current = screen.state.map(|s| s.current_index);

    // Only build ListItems for the visible window.
    let items: Vec<ListItem> = screen.tracks[start..end]
        .iter()
        .enumerate()
        .map(|(offset, track)| {
            let i = start + offset;
            if Some(i) == current {
                ListItem::new(format!("♪ {}", track.display_name)).bold()
            } else {
                ListItem::new(format!("  {}", track.display_name))
            }
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" tracks · {} ", screen.dir)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(selected - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::format_elapsed;
    use crate::library::Locator;
    use ratatui::{Terminal, backend::TestBackend};

    fn tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track {
                locator: Locator::new(format!("/m/{i}.mp3")),
                display_name: format!("song {i}"),
            })
            .collect()
    }

    fn render(screen: &Screen) -> (String, Rect) {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut progress = Rect::default();
        terminal.draw(|f| progress = draw(f, screen)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<Vec<_>>()
            .concat();
        (text, progress)
    }

    #[test]
    fn controls_text_includes_scrub_seconds() {
        let text = controls_text(7);
        assert!(text.contains("[H/L] scrub -/+7s"));
        assert!(text.starts_with("[space/p] play/pause"));
        assert!(text.ends_with("[q] quit"));
    }

    #[test]
    fn visible_window_centers_selection() {
        assert_eq!(visible_window(5, 10, 3), (0, 5));
        assert_eq!(visible_window(100, 10, 50), (45, 55));
        assert_eq!(visible_window(100, 10, 2), (0, 10));
        assert_eq!(visible_window(100, 10, 99), (90, 100));
    }

    #[test]
    fn draw_shows_fallback_message_and_times() {
        let mut display = DisplayState::default();
        display.show(Status::NoTracks);
        let ui = UiSettings::default();
        let controls = ControlsSettings::default();
        let screen = Screen {
            display: &display,
            tracks: &[],
            state: None,
            selected: 0,
            dir: "/music",
            ui: &ui,
            controls: &controls,
        };

        let (text, progress) = render(&screen);
        assert!(text.contains("no tracks found"));
        assert!(text.contains("0:00 / 0:00"));
        assert!(progress.width > 0);
        assert_eq!(progress.height, 1);
    }

    #[test]
    fn draw_marks_current_track_and_play_state() {
        let list = tracks(3);
        let mut display = DisplayState::default();
        display.status = Status::Track;
        display.title = "song 1".into();
        display.elapsed = format_elapsed(61_000);
        display.total = format_elapsed(200_000);
        let state = PlaybackState {
            current_index: 1,
            is_playing: true,
            position_millis: 61_000,
            duration_millis: 200_000,
        };
        let ui = UiSettings::default();
        let controls = ControlsSettings::default();
        let screen = Screen {
            display: &display,
            tracks: &list,
            state: Some(&state),
            selected: 1,
            dir: "/music",
            ui: &ui,
            controls: &controls,
        };

        let (text, _) = render(&screen);
        assert!(text.contains("▶ song 1"));
        assert!(text.contains("♪ song 1"));
        assert!(text.contains("1:01 / 3:20"));
    }
}
