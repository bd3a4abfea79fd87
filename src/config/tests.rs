//! Configuration tests

use super::*;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

fn no_env(_: &str) -> Option<String> {
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

/// Serialized defaults must parse back
#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );
}

/// Every persisted field survives to_toml -> parse -> resolve
#[test]
fn test_config_roundtrip_preserves_values() {
    let mut config = Config::default();
    config.api_url = "https://logs.example.com".to_string();
    config.poll_interval = Duration::from_millis(1500);
    config.request_timeout = Duration::from_secs(4);
    config.session_file = PathBuf::from("/tmp/ls/session.toml");
    config.theme = "light".to_string();
    config.logging.level = "debug".to_string();
    config.logging.file_enabled = true;
    config.logging.file_rotation = LogRotation::Hourly;
    config.logging.file_prefix = "dash".to_string();

    let file: FileConfig = toml::from_str(&config.to_toml()).unwrap();
    let loaded = Config::resolve(file, no_env);

    assert_eq!(loaded.api_url, config.api_url);
    assert_eq!(loaded.poll_interval, config.poll_interval);
    assert_eq!(loaded.request_timeout, config.request_timeout);
    assert_eq!(loaded.session_file, config.session_file);
    assert_eq!(loaded.theme, config.theme);
    assert_eq!(loaded.logging, config.logging);
}

#[test]
fn test_windows_paths_are_escaped() {
    let mut config = Config::default();
    config.session_file = PathBuf::from(r"C:\Users\me\session.toml");

    let file: FileConfig = toml::from_str(&config.to_toml()).unwrap();
    assert_eq!(
        file.session_file.as_deref(),
        Some(r"C:\Users\me\session.toml")
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_file_gives_defaults() {
    let config = Config::resolve(FileConfig::default(), no_env);
    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
    assert_eq!(config.theme, "dark");
    assert!(config.enable_tui);
    assert!(!config.demo_mode);
    assert_eq!(config.logging, LoggingConfig::default());
}

#[test]
fn test_env_overrides_file() {
    let file = FileConfig {
        api_url: Some("http://file:5000".to_string()),
        poll_interval_ms: Some(5000),
        theme: Some("light".to_string()),
        ..Default::default()
    };
    let env = env_from(&[
        ("LOGSTREAM_API_URL", "http://env:5000"),
        ("LOGSTREAM_POLL_MS", "1000"),
    ]);

    let config = Config::resolve(file, env);
    assert_eq!(config.api_url, "http://env:5000");
    assert_eq!(config.poll_interval, Duration::from_millis(1000));
    // Not overridden
    assert_eq!(config.theme, "light");
}

#[test]
fn test_unparsable_env_interval_falls_back_to_file() {
    let file = FileConfig {
        poll_interval_ms: Some(4000),
        ..Default::default()
    };
    let config = Config::resolve(file, env_from(&[("LOGSTREAM_POLL_MS", "soon")]));
    assert_eq!(config.poll_interval, Duration::from_millis(4000));
}

#[test]
fn test_poll_interval_has_floor() {
    let config = Config::resolve(FileConfig::default(), env_from(&[("LOGSTREAM_POLL_MS", "0")]));
    assert_eq!(config.poll_interval, MIN_POLL_INTERVAL);
}

#[test]
fn test_runtime_flags() {
    let config = Config::resolve(
        FileConfig::default(),
        env_from(&[("LOGSTREAM_NO_TUI", "true"), ("LOGSTREAM_DEMO", "1")]),
    );
    assert!(!config.enable_tui);
    assert!(config.demo_mode);

    let config = Config::resolve(
        FileConfig::default(),
        env_from(&[("LOGSTREAM_NO_TUI", "0"), ("LOGSTREAM_DEMO", "no")]),
    );
    assert!(config.enable_tui);
    assert!(!config.demo_mode);
}

#[test]
fn test_unknown_rotation_defaults_to_daily() {
    assert_eq!(LogRotation::parse("weekly"), LogRotation::Daily);
    assert_eq!(LogRotation::parse("HOURLY"), LogRotation::Hourly);
}
