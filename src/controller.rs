//! Playback controller: the only stateful part of the player.
//!
//! It owns the ordered track list, the bound decoder, the refresh tick and
//! the display state, and mediates every transport command. All methods run
//! on the event-loop thread; the tick is a deferred callback the loop fires
//! through `fire_due_tick`.

mod display;
mod progress;
mod tick;

use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

pub use display::{DisplayState, Status, format_elapsed};
pub use progress::{Origin, ProgressChange};
use tick::TickTimer;

use crate::artwork::{ArtworkSource, load_artwork};
use crate::audio::{Decoder, DecoderFactory};
use crate::config::PlaybackSettings;
use crate::library::{MediaIndex, Permission, PermissionGate, Track};

/// Position tracking for the current track.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlaybackState {
    pub current_index: usize,
    pub is_playing: bool,
    pub position_millis: u64,
    pub duration_millis: u64,
}

#[derive(Copy, Clone, Debug)]
pub struct ControllerOptions {
    pub tick_interval: Duration,
    pub autoplay: bool,
    pub advance_on_end: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::from(&PlaybackSettings::default())
    }
}

impl From<&PlaybackSettings> for ControllerOptions {
    fn from(s: &PlaybackSettings) -> Self {
        Self {
            tick_interval: Duration::from_millis(s.tick_ms.max(1)),
            autoplay: s.autoplay,
            advance_on_end: s.advance_on_end,
        }
    }
}

pub struct PlaybackController<F: DecoderFactory, A: ArtworkSource> {
    factory: F,
    artwork: A,
    options: ControllerOptions,
    tracks: Vec<Track>,
    state: Option<PlaybackState>,
    decoder: Option<F::Decoder>,
    ticker: TickTimer,
    display: DisplayState,
}

impl<F: DecoderFactory, A: ArtworkSource> PlaybackController<F, A> {
    pub fn new(factory: F, artwork: A, options: ControllerOptions) -> Self {
        Self {
            factory,
            artwork,
            options,
            tracks: Vec::new(),
            state: None,
            decoder: None,
            ticker: TickTimer::new(options.tick_interval),
            display: DisplayState::default(),
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn state(&self) -> Option<&PlaybackState> {
        self.state.as_ref()
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn is_playing(&self) -> bool {
        self.decoder.as_ref().is_some_and(|d| d.is_playing())
    }

    /// When the event loop must next call `fire_due_tick`.
    pub fn tick_deadline(&self) -> Option<Instant> {
        self.ticker.deadline()
    }

    /// Query the media index and start playing the first track.
    pub fn load_library(
        &mut self,
        index: &impl MediaIndex,
        gate: &impl PermissionGate,
        now: Instant,
    ) {
        if gate.check() == Permission::Denied {
            self.clear();
            self.tracks.clear();
            self.display.show(Status::PermissionDenied);
            warn!(root = %index.root().display(), "library access denied");
            return;
        }

        let tracks = match index.load_tracks() {
            Ok(tracks) => tracks,
            Err(err) => {
                warn!(error = %err, "media index query failed");
                Vec::new()
            }
        };

        self.clear();
        self.tracks = tracks;

        if self.tracks.is_empty() {
            self.display.show(Status::NoTracks);
            info!(root = %index.root().display(), "library is empty");
            return;
        }

        info!(
            root = %index.root().display(),
            count = self.tracks.len(),
            "library loaded"
        );
        self.bind_track(0, now, self.options.autoplay);
    }

    pub fn play_next(&mut self, now: Instant) {
        let n = self.tracks.len();
        if n == 0 {
            return;
        }
        let next = self.state.map_or(0, |s| (s.current_index + 1) % n);
        self.switch_to(next, now);
    }

    pub fn play_previous(&mut self, now: Instant) {
        let n = self.tracks.len();
        if n == 0 {
            return;
        }
        let prev = self.state.map_or(0, |s| (s.current_index + n - 1) % n);
        self.switch_to(prev, now);
    }

    /// Bind the track at `index`, start it and begin the refresh tick.
    pub fn switch_to(&mut self, index: usize, now: Instant) {
        self.bind_track(index, now, true);
    }

    fn bind_track(&mut self, index: usize, now: Instant, start: bool) {
        let Some(track) = self.tracks.get(index).cloned() else {
            warn!(index, len = self.tracks.len(), "ignoring switch to missing track");
            return;
        };

        self.ticker.cancel();
        if let Some(previous) = self.decoder.take() {
            previous.release();
        }
        self.display = DisplayState::default();

        let mut decoder = match self.factory.bind(&track.locator) {
            Ok(decoder) => decoder,
            Err(err) => {
                warn!(track = %track.locator, error = %err, "failed to load track");
                self.state = Some(PlaybackState {
                    current_index: index,
                    is_playing: false,
                    position_millis: 0,
                    duration_millis: 0,
                });
                self.display.show(Status::LoadError);
                return;
            }
        };

        let duration_millis = decoder.duration().map_or(0, |d| d.as_millis() as u64);
        self.display.status = Status::Track;
        self.display.title = track.display_name.clone();
        self.display.total = format_elapsed(duration_millis);
        self.display.progress.set_max(duration_millis);
        let change = self.display.progress.set_value(0, Origin::Program);

        if start {
            decoder.start();
        }
        self.decoder = Some(decoder);
        self.state = Some(PlaybackState {
            current_index: index,
            is_playing: start,
            position_millis: 0,
            duration_millis,
        });
        self.on_progress_change(change);

        self.display.artwork = load_artwork(&self.artwork, &track.locator);

        if start {
            self.ticker.post(now);
        }
        info!(index, track = %track.display_name, duration_millis, "track switched");
    }

    /// Start playback if paused and restart the refresh tick. A track that
    /// played to its end starts over from the beginning.
    pub fn resume(&mut self, now: Instant) {
        let Some(decoder) = self.decoder.as_mut() else {
            return;
        };
        if decoder.is_finished() {
            if let Some(index) = self.state.map(|s| s.current_index) {
                debug!(index, "replaying finished track");
                self.switch_to(index, now);
            }
            return;
        }
        if !decoder.is_playing() {
            decoder.start();
            debug!("playback resumed");
        }
        if let Some(state) = self.state.as_mut() {
            state.is_playing = true;
        }
        self.ticker.post(now);
    }

    /// Pause if playing. The tick stops on its own at its next run.
    pub fn pause(&mut self) {
        let Some(decoder) = self.decoder.as_mut() else {
            return;
        };
        if decoder.is_playing() {
            decoder.pause();
            debug!("playback paused");
        }
        if let Some(state) = self.state.as_mut() {
            state.is_playing = false;
        }
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.is_playing() {
            self.pause();
        } else {
            self.resume(now);
        }
    }

    /// Relocate playback. Only called for user-originated input.
    pub fn seek(&mut self, position_millis: u64) {
        let (Some(decoder), Some(state)) = (self.decoder.as_mut(), self.state.as_mut()) else {
            return;
        };
        let target = if state.duration_millis > 0 {
            position_millis.min(state.duration_millis)
        } else {
            position_millis
        };

        if let Err(err) = decoder.seek(Duration::from_millis(target)) {
            warn!(target, error = %err, "seek failed");
            return;
        }

        state.position_millis = target;
        self.display.elapsed = format_elapsed(target);
        // The user already moved the indicator; this only syncs the model.
        self.display.progress.set_value(target, Origin::User);
        debug!(target, "seeked");
    }

    /// Scrub relative to the current position.
    pub fn seek_by(&mut self, delta_millis: i64) {
        let Some(state) = self.state else {
            return;
        };
        let target = (state.position_millis as i64).saturating_add(delta_millis).max(0) as u64;
        self.seek(target);
    }

    /// Listener for the progress indicator.
    pub fn on_progress_change(&mut self, change: ProgressChange) {
        match change.origin {
            Origin::User => self.seek(change.value_millis),
            Origin::Program => {}
        }
    }

    /// Run the refresh tick if it is due. Returns whether it ran.
    pub fn fire_due_tick(&mut self, now: Instant) -> bool {
        if self.ticker.take_due(now) {
            self.tick(now);
            true
        } else {
            false
        }
    }

    /// Refresh elapsed time and progress; reschedule while playing.
    pub fn tick(&mut self, now: Instant) {
        let (Some(decoder), Some(state)) = (self.decoder.as_ref(), self.state.as_mut()) else {
            return;
        };

        let mut position = decoder.position().as_millis() as u64;
        if state.duration_millis > 0 {
            position = position.min(state.duration_millis);
        }
        state.position_millis = position;
        self.display.elapsed = format_elapsed(position);
        let change = self.display.progress.set_value(position, Origin::Program);
        trace!(position, "tick");

        let playing = decoder.is_playing();
        let finished = decoder.is_finished();
        self.on_progress_change(change);

        if playing {
            self.ticker.post_delayed(now);
            return;
        }

        if let Some(state) = self.state.as_mut() {
            state.is_playing = false;
        }
        if finished && self.options.advance_on_end {
            debug!("track finished, advancing");
            self.play_next(now);
        }
    }

    /// Release the decoder and cancel any pending tick.
    pub fn shutdown(&mut self) {
        self.ticker.cancel();
        if let Some(decoder) = self.decoder.take() {
            decoder.release();
            debug!("decoder released");
        }
        if let Some(state) = self.state.as_mut() {
            state.is_playing = false;
        }
    }

    fn clear(&mut self) {
        self.shutdown();
        self.state = None;
        self.display = DisplayState::default();
    }
}

impl<F: DecoderFactory, A: ArtworkSource> Drop for PlaybackController<F, A> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
