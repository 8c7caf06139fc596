use std::env;
use std::path::PathBuf;

use crate::config::LibrarySettings;

/// Pick the music directory: command line, then `library.root`, then the
/// current directory.
pub fn resolve_library_dir(arg: Option<String>, library: &LibrarySettings) -> PathBuf {
    arg.or_else(|| library.root.clone())
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("Music"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_dir_wins_over_config() {
        let library = LibrarySettings {
            root: Some("/srv/music".into()),
            ..LibrarySettings::default()
        };
        assert_eq!(
            resolve_library_dir(Some("/tmp/tunes".into()), &library),
            PathBuf::from("/tmp/tunes")
        );
        assert_eq!(
            resolve_library_dir(None, &library),
            PathBuf::from("/srv/music")
        );
    }

    #[test]
    fn falls_back_to_current_dir() {
        let dir = resolve_library_dir(None, &LibrarySettings::default());
        assert_eq!(dir, env::current_dir().unwrap());
    }
}
