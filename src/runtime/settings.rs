use crate::config::Settings;

/// Settings to run with. A missing or broken config never stops the player:
/// it falls back to the defaults and says why.
pub fn load_settings() -> (Settings, Option<String>) {
    settle(Settings::load())
}

fn settle(loaded: Result<Settings, ::config::ConfigError>) -> (Settings, Option<String>) {
    let checked = loaded
        .map_err(|e| format!("failed to load config: {e}"))
        .and_then(|s| match s.validate() {
            Ok(()) => Ok(s),
            Err(msg) => Err(format!("invalid config: {msg}")),
        });
    match checked {
        Ok(s) => (s, None),
        Err(reason) => (Settings::default(), Some(reason)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_settings_are_kept() {
        let mut s = Settings::default();
        s.playback.tick_ms = 250;
        let (s, reason) = settle(Ok(s));
        assert_eq!(s.playback.tick_ms, 250);
        assert!(reason.is_none());
    }

    #[test]
    fn invalid_settings_fall_back_to_defaults() {
        let mut s = Settings::default();
        s.playback.tick_ms = 0;
        let (s, reason) = settle(Ok(s));
        assert_eq!(s.playback.tick_ms, Settings::default().playback.tick_ms);
        assert!(reason.unwrap().starts_with("invalid config: playback.tick_ms"));
    }

    #[test]
    fn load_errors_fall_back_to_defaults() {
        let err = ::config::ConfigError::Message("bad toml".into());
        let (_, reason) = settle(Err(err));
        assert_eq!(reason.as_deref(), Some("failed to load config: bad toml"));
    }
}
