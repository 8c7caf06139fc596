//! Embedded album-art extraction.

use image::RgbImage;
use lofty::picture::{Picture, PictureType};
use lofty::prelude::TaggedFileExt;
use thiserror::Error;
use tracing::{debug, warn};

use crate::library::Locator;

/// Longest edge of the cached artwork thumbnail, in pixels.
const THUMBNAIL_EDGE: u32 = 96;

#[derive(Debug, Error)]
pub enum ArtworkError {
    #[error("cannot read tags: {0}")]
    Tags(#[from] lofty::error::LoftyError),
    #[error("cannot decode embedded picture: {0}")]
    Image(#[from] image::ImageError),
}

/// Yields the raw bytes of a track's embedded picture, if any.
pub trait ArtworkSource {
    fn embedded_picture(&self, locator: &Locator) -> Result<Option<Vec<u8>>, ArtworkError>;
}

/// Reads pictures from the file's tags, preferring the front cover.
pub struct TagArtwork;

impl ArtworkSource for TagArtwork {
    fn embedded_picture(&self, locator: &Locator) -> Result<Option<Vec<u8>>, ArtworkError> {
        let tagged = lofty::read_from_path(locator.path())?;
        let picture = tagged
            .tags()
            .iter()
            .flat_map(|tag| tag.pictures())
            .min_by_key(|p| cover_rank(p));
        Ok(picture.map(|p| p.data().to_vec()))
    }
}

fn cover_rank(picture: &Picture) -> u8 {
    match picture.pic_type() {
        PictureType::CoverFront => 0,
        PictureType::Other => 1,
        _ => 2,
    }
}

/// What the artwork panel shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Artwork {
    #[default]
    Default,
    Embedded(RgbImage),
}

impl Artwork {
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

/// Decode picture bytes into a small RGB thumbnail.
pub fn decode_thumbnail(bytes: &[u8]) -> Result<RgbImage, ArtworkError> {
    let img = image::load_from_memory(bytes)?;
    Ok(img.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE).to_rgb8())
}

/// Extract and decode the artwork for `locator`. Any failure yields the default artwork.
pub fn load_artwork(source: &impl ArtworkSource, locator: &Locator) -> Artwork {
    let bytes = match source.embedded_picture(locator) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            debug!(track = %locator, "no embedded artwork");
            return Artwork::Default;
        }
        Err(err) => {
            warn!(track = %locator, error = %err, "artwork extraction failed");
            return Artwork::Default;
        }
    };

    match decode_thumbnail(&bytes) {
        Ok(img) => Artwork::Embedded(img),
        Err(err) => {
            warn!(track = %locator, error = %err, "embedded artwork is not a readable image");
            Artwork::Default
        }
    }
}
