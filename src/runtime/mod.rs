use std::env;
use std::time::Instant;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, warn};

use crate::artwork::TagArtwork;
use crate::audio::RodioOutput;
use crate::controller::{ControllerOptions, PlaybackController};
use crate::library::{DirectoryAccess, DirectoryIndex};
use crate::logging;

mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, fallback) = settings::load_settings();
    if let Some(reason) = &fallback {
        eprintln!("tonearm: {reason}; using defaults");
    }

    let _log_guard = match logging::init(&settings.log) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("tonearm: logging disabled: {e}");
            None
        }
    };
    if let Some(reason) = fallback {
        warn!(%reason, "using default settings");
    }

    let dir = startup::resolve_library_dir(env::args().nth(1), &settings.library);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        dir = %dir.display(),
        "starting tonearm"
    );

    let output = RodioOutput::open().inspect_err(|e| error!(error = %e, "audio output unavailable"))?;
    let mut controller = PlaybackController::new(
        output,
        TagArtwork,
        ControllerOptions::from(&settings.playback),
    );

    let index = DirectoryIndex::new(&dir, settings.library.clone());
    let gate = DirectoryAccess::new(&dir);
    controller.load_library(&index, &gate, Instant::now());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(dir.display().to_string(), &controller);
        event_loop::run(
            &mut terminal,
            &settings,
            &mut controller,
            &index,
            &gate,
            &mut state,
        )
    })();

    controller.shutdown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        error!(error = %e, "event loop failed");
    }
    info!("bye");
    run_result
}
