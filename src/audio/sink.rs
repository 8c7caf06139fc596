//! `rodio`-backed decoder: one paused `Sink` per bound track.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

use crate::library::Locator;

use super::types::{AudioError, Decoder, DecoderFactory};

/// Owns the default output stream; every bound decoder plays into its mixer.
pub struct RodioOutput {
    stream: OutputStream,
}

impl RodioOutput {
    pub fn open() -> Result<Self, AudioError> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // rodio logs to stderr when OutputStream is dropped, which corrupts the TUI.
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

impl DecoderFactory for RodioOutput {
    type Decoder = RodioDecoder;

    fn bind(&mut self, locator: &Locator) -> Result<RodioDecoder, AudioError> {
        let (source, duration) = open_source(locator.path())?;

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.pause();

        debug!(track = %locator, ?duration, "decoder bound");
        Ok(RodioDecoder { sink, duration })
    }
}

/// Open and decode `path`, and work out its length. Needs no output device.
pub(super) fn open_source(
    path: &Path,
) -> Result<(impl Source + Send + 'static, Option<Duration>), AudioError> {
    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let source = rodio::Decoder::try_from(file).map_err(|source| AudioError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let duration = source
        .total_duration()
        .or_else(|| probe_duration(path))
        .filter(|d| !d.is_zero());
    Ok((source, duration))
}

/// Read the duration from the container headers when the decoder cannot tell.
fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
}

pub struct RodioDecoder {
    sink: Sink,
    duration: Option<Duration>,
}

impl Decoder for RodioDecoder {
    fn start(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn seek(&mut self, position: Duration) -> Result<(), AudioError> {
        self.sink.try_seek(position)?;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_playing(&self) -> bool {
        !self.sink.is_paused() && !self.sink.empty()
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }

    fn release(self) {
        self.sink.stop();
    }
}
