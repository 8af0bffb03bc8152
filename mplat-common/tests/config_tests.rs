//! Integration tests for TOML bootstrap configuration
//!
//! Covers:
//! - Missing default config file falls back to defaults
//! - Explicit config file must exist
//! - Malformed TOML is a startup error
//! - Unknown keys are ignored so both services can share one file

use mplat_common::config::{load_toml_config, parse_toml_file};
use mplat_common::Error;
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_toml(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Should create temp file");
    file.write_all(content.as_bytes()).expect("Should write temp file");
    file
}

#[test]
fn test_parse_full_config() {
    let file = write_toml(
        r#"
        port = 9001
        database_path = "/tmp/mplat-test/resources.db"
        song_service_url = "http://songs.internal:8082"
        remote_timeout_ms = 1500
        max_upload_bytes = 1048576

        [logging]
        level = "debug"
        "#,
    );

    let config = parse_toml_file(file.path()).expect("Should parse config");
    assert_eq!(config.port, Some(9001));
    assert_eq!(
        config.database_path.as_deref(),
        Some(std::path::Path::new("/tmp/mplat-test/resources.db"))
    );
    assert_eq!(
        config.song_service_url.as_deref(),
        Some("http://songs.internal:8082")
    );
    assert_eq!(config.remote_timeout_ms, Some(1500));
    assert_eq!(config.max_upload_bytes, Some(1_048_576));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_parse_partial_config_uses_defaults() {
    let file = write_toml("port = 9002\n");

    let config = parse_toml_file(file.path()).expect("Should parse config");
    assert_eq!(config.port, Some(9002));
    assert!(config.database_path.is_none());
    assert!(config.song_service_url.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_unknown_keys_are_ignored() {
    let file = write_toml("port = 9003\nsomething_else = true\n");
    let config = parse_toml_file(file.path()).expect("Unknown keys should be ignored");
    assert_eq!(config.port, Some(9003));
}

#[test]
fn test_malformed_config_is_error() {
    let file = write_toml("port = \"not a number\"\n");
    let result = parse_toml_file(file.path());
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_explicit_missing_config_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    let result = load_toml_config(Some(&missing), "mplat-rs");
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_explicit_config_is_loaded() {
    let file = write_toml("port = 9004\n");
    let config = load_toml_config(Some(file.path()), "mplat-rs").unwrap();
    assert_eq!(config.port, Some(9004));
}

#[test]
#[serial]
fn test_missing_default_config_uses_defaults() {
    // Point the platform config dir at an empty folder
    let dir = tempfile::tempdir().unwrap();
    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    let result = load_toml_config(None, "mplat-test-module-without-config");

    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    let config = result.expect("Missing default config should not be an error");
    assert!(config.port.is_none());
    assert_eq!(config.logging.level, "info");
}
