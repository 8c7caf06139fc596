use std::borrow::Cow;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::{Locator, MediaItem, Track};

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("cannot read library root {path}: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// A queryable index of media items.
pub trait MediaIndex {
    /// Root that item identifiers are relative to.
    fn root(&self) -> &Path;

    /// Return every audio item the index knows about, in index order.
    fn query_audio(&self) -> Result<Vec<MediaItem>, LibraryError>;

    /// Query the index and turn its rows into tracks.
    fn load_tracks(&self) -> Result<Vec<Track>, LibraryError> {
        let root = self.root().to_path_buf();
        Ok(self
            .query_audio()?
            .into_iter()
            .filter(MediaItem::is_audio)
            .map(|item| Track {
                locator: Locator::from_identifier(&root, &item.id),
                display_name: item.display_name,
            })
            .collect())
    }
}

/// Media index backed by a directory tree on disk.
pub struct DirectoryIndex {
    root: PathBuf,
    settings: LibrarySettings,
}

impl DirectoryIndex {
    pub fn new(root: impl Into<PathBuf>, settings: LibrarySettings) -> Self {
        Self {
            root: root.into(),
            settings,
        }
    }

    /// Mime type of `path` when its extension is one of the configured ones.
    fn mime_type(&self, path: &Path) -> Option<Cow<'static, str>> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        let configured = self
            .settings
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.'))
            .any(|e| e.eq_ignore_ascii_case(&ext));
        if configured {
            Some(mime_for_extension(&ext))
        } else {
            None
        }
    }
}

impl MediaIndex for DirectoryIndex {
    fn root(&self) -> &Path {
        &self.root
    }

    fn query_audio(&self) -> Result<Vec<MediaItem>, LibraryError> {
        let settings = &self.settings;
        let mut walker = WalkDir::new(&self.root)
            .follow_links(settings.follow_links)
            .sort_by_file_name();

        // Non-recursive = only the root directory.
        let depth_cap = if settings.recursive {
            settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        let mut items = Vec::new();
        for entry in walker
            .into_iter()
            .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(LibraryError::Root {
                        path: self.root.clone(),
                        source: err,
                    });
                }
                Err(err) => {
                    debug!(error = %err, "skipping unreadable library entry");
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(mime_type) = self.mime_type(path) else {
                continue;
            };
            let Ok(relative) = path.strip_prefix(&self.root) else {
                continue;
            };

            items.push(MediaItem {
                id: relative.to_string_lossy().into_owned(),
                display_name: entry.file_name().to_string_lossy().into_owned(),
                mime_type: mime_type.into_owned(),
            });
        }

        Ok(items)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Map a configured, lowercase audio extension to its mime type.
///
/// Extensions without a registered type get `audio/x-<ext>`, so the
/// configured list alone decides what counts as audio.
pub(crate) fn mime_for_extension(ext: &str) -> Cow<'static, str> {
    match ext {
        "mp3" => Cow::Borrowed("audio/mpeg"),
        "flac" => Cow::Borrowed("audio/flac"),
        "wav" => Cow::Borrowed("audio/wav"),
        "ogg" | "oga" => Cow::Borrowed("audio/ogg"),
        "opus" => Cow::Borrowed("audio/opus"),
        "m4a" | "aac" | "mp4" => Cow::Borrowed("audio/mp4"),
        other => Cow::Owned(format!("audio/x-{other}")),
    }
}
