use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_tonearm_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("TONEARM_CONFIG_PATH", "/tmp/tonearm-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/tonearm-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("tonearm")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("tonearm")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_uses_xdg_state_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state");

    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-state")
            .join("tonearm")
            .join("tonearm.log")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[library]
root = "/srv/music"
extensions = ["mp3"]
recursive = false
include_hidden = true
follow_links = false
max_depth = 3

[playback]
tick_ms = 250
autoplay = false
advance_on_end = false

[controls]
scrub_seconds = 9

[ui]
header_text = "hello"
show_artwork = false

[log]
level = "debug"
file = "/tmp/tonearm.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TONEARM_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("TONEARM__PLAYBACK__TICK_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.library.root.as_deref(), Some("/srv/music"));
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.max_depth, Some(3));
    assert_eq!(s.playback.tick_ms, 250);
    assert!(!s.playback.autoplay);
    assert!(!s.playback.advance_on_end);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.ui.header_text, "hello");
    assert!(!s.ui.show_artwork);
    assert!(s.ui.show_track_list);
    assert_eq!(s.log.level, "debug");
    assert_eq!(s.log.file.as_deref(), Some("/tmp/tonearm.log"));
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
tick_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TONEARM_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("TONEARM__PLAYBACK__TICK_MS", "1000");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.tick_ms, 1000);
}

#[test]
fn settings_defaults_deserialize_from_empty_toml() {
    let s: Settings = toml::from_str("").unwrap();
    assert_eq!(s.playback.tick_ms, 500);
    assert!(s.playback.autoplay);
    assert_eq!(s.controls.scrub_seconds, 5);
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_zero_tick_and_empty_extensions() {
    let mut s = Settings::default();
    s.playback.tick_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.extensions = vec!["  ".into()];
    assert!(s.validate().is_err());
}
