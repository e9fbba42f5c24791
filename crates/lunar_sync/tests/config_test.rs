//! Tests for client configuration loading.

use lunar_core::PlayerId;
use lunar_sync::{AnimationTimings, ClientConfig};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_load_full_config() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
server_url = "http://game.local:8080/"
player = 2
animations_enabled = false
poll_interval_ms = 250

[timings]
settle_ms = 100
token_ms = 50
"#
    )
    .unwrap();

    let config = ClientConfig::from_file(file.path()).unwrap();
    assert_eq!(config.server_url(), "http://game.local:8080");
    assert_eq!(*config.player(), PlayerId::TWO);
    assert!(!config.animations_enabled());
    assert_eq!(config.poll_interval(), Duration::from_millis(250));
    assert_eq!(*config.timings().settle_ms(), 100);
    assert_eq!(*config.timings().token_ms(), 50);
    assert_eq!(*config.timings().edge_ms(), 300, "unset timings keep defaults");
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.server_url(), "http://127.0.0.1:5000");
    assert_eq!(*config.player(), PlayerId::ONE);
    assert!(config.animations_enabled());
    assert_eq!(*config.timings(), AnimationTimings::default());
}

#[test]
fn test_invalid_player_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "player = 3").unwrap();

    let err = ClientConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("Player must be 1 or 2"));
}

#[test]
fn test_overrides_apply_and_trim() {
    let config = ClientConfig::default()
        .with_overrides(Some("http://other:9000/".to_string()), Some(" 2 ".to_string()))
        .unwrap();
    assert_eq!(config.server_url(), "http://other:9000");
    assert_eq!(*config.player(), PlayerId::TWO);

    assert!(ClientConfig::default()
        .with_overrides(None, Some("two".to_string()))
        .is_err());
}

#[test]
fn test_unparseable_file_reports_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "player = [").unwrap();
    let err = ClientConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("Failed to parse config"));
}
