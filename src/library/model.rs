use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque reference to a playable resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Locator(PathBuf);

impl Locator {
    #[cfg(test)]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Build a locator for a media index row, whose identifier is relative to `root`.
    pub fn from_identifier(root: &Path, id: &str) -> Self {
        Self(root.join(id))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// One row returned by a media index query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaItem {
    pub id: String,
    pub display_name: String,
    pub mime_type: String,
}

impl MediaItem {
    pub fn is_audio(&self) -> bool {
        self.mime_type.starts_with("audio/")
    }
}

/// A playable track. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub locator: Locator,
    pub display_name: String,
}
