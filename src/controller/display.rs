//! What the single screen shows, kept separate from the terminal widgets.

use crate::artwork::Artwork;

use super::progress::Progress;

pub const NO_TRACKS: &str = "no tracks found";
pub const LOAD_ERROR: &str = "error loading track";
pub const PERMISSION_DENIED: &str = "permission denied";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Status {
    /// Nothing loaded yet.
    #[default]
    Idle,
    /// A track is bound; the title field shows its name.
    Track,
    NoTracks,
    LoadError,
    PermissionDenied,
}

impl Status {
    /// Substitute text for the title field, if this is a fallback state.
    pub fn message(self) -> Option<&'static str> {
        match self {
            Self::NoTracks => Some(NO_TRACKS),
            Self::LoadError => Some(LOAD_ERROR),
            Self::PermissionDenied => Some(PERMISSION_DENIED),
            Self::Idle | Self::Track => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayState {
    pub status: Status,
    pub title: String,
    pub elapsed: String,
    pub total: String,
    pub progress: Progress,
    pub artwork: Artwork,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            title: String::new(),
            elapsed: format_elapsed(0),
            total: format_elapsed(0),
            progress: Progress::default(),
            artwork: Artwork::Default,
        }
    }
}

impl DisplayState {
    /// Replace everything with a fallback state whose message fills the title.
    pub fn show(&mut self, status: Status) {
        *self = Self::default();
        self.status = status;
        if let Some(msg) = status.message() {
            self.title = msg.to_string();
        }
    }
}

/// Format milliseconds as `m:ss`.
pub fn format_elapsed(millis: u64) -> String {
    let secs = millis / 1_000;
    format!("{}:{:02}", secs / 60, secs % 60)
}
