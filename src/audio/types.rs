//! Decoder traits and the audio error type.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::library::Locator;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    Output(#[from] rodio::StreamError),
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
    #[error("seek failed: {0}")]
    Seek(#[from] rodio::source::SeekError),
}

/// A bound playback handle for a single track.
pub trait Decoder {
    /// Start or continue playback.
    fn start(&mut self);
    fn pause(&mut self);
    /// Move playback to an absolute position.
    fn seek(&mut self, position: Duration) -> Result<(), AudioError>;
    fn position(&self) -> Duration;
    /// Total length, when the container reports one.
    fn duration(&self) -> Option<Duration>;
    fn is_playing(&self) -> bool;
    /// True once every sample of the track has been played.
    fn is_finished(&self) -> bool;
    /// Stop output and give the handle back.
    fn release(self);
}

/// Binds decoders to resource locators.
pub trait DecoderFactory {
    type Decoder: Decoder;

    /// Open `locator` and return a paused decoder positioned at the start.
    fn bind(&mut self, locator: &Locator) -> Result<Self::Decoder, AudioError>;
}
