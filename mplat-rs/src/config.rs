//! Configuration resolution for mplat-rs
//!
//! Priority per setting: command line / environment (via `clap`) → TOML → compiled default.

use mplat_common::config::{default_database_path, resolve_setting, TomlConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Module name used for config and database file names
pub const MODULE_NAME: &str = "mplat-rs";

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_SONG_SERVICE_URL: &str = "http://127.0.0.1:8082";
pub const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub song_service_url: Option<String>,
    pub remote_timeout_ms: Option<u64>,
    pub max_upload_bytes: Option<usize>,
    pub log_level: Option<String>,
}

/// Fully resolved Resource Service configuration
#[derive(Debug, Clone)]
pub struct ResourceServiceConfig {
    pub port: u16,
    pub database_path: PathBuf,
    pub song_service_url: String,
    pub remote_timeout: Duration,
    pub max_upload_bytes: usize,
    pub log_level: String,
}

impl ResourceServiceConfig {
    pub fn resolve(overrides: ConfigOverrides, toml: TomlConfig) -> Self {
        Self {
            port: resolve_setting(overrides.port, toml.port, DEFAULT_PORT),
            database_path: resolve_setting(
                overrides.database_path,
                toml.database_path,
                default_database_path(MODULE_NAME),
            ),
            song_service_url: resolve_setting(
                overrides.song_service_url,
                toml.song_service_url,
                DEFAULT_SONG_SERVICE_URL.to_string(),
            ),
            remote_timeout: Duration::from_millis(resolve_setting(
                overrides.remote_timeout_ms,
                toml.remote_timeout_ms,
                DEFAULT_REMOTE_TIMEOUT_MS,
            )),
            max_upload_bytes: resolve_setting(
                overrides.max_upload_bytes,
                toml.max_upload_bytes,
                DEFAULT_MAX_UPLOAD_BYTES,
            ),
            log_level: resolve_setting(overrides.log_level, None, toml.logging.level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResourceServiceConfig::resolve(ConfigOverrides::default(), TomlConfig::default());
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.song_service_url, DEFAULT_SONG_SERVICE_URL);
        assert_eq!(config.remote_timeout, Duration::from_millis(DEFAULT_REMOTE_TIMEOUT_MS));
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.database_path.file_name().unwrap(), "mplat-rs.db");
    }

    #[test]
    fn test_override_beats_toml() {
        let toml = TomlConfig {
            port: Some(9000),
            song_service_url: Some("http://songs:8082".to_string()),
            remote_timeout_ms: Some(250),
            ..TomlConfig::default()
        };
        let overrides = ConfigOverrides {
            port: Some(9100),
            log_level: Some("debug".to_string()),
            ..ConfigOverrides::default()
        };

        let config = ResourceServiceConfig::resolve(overrides, toml);
        assert_eq!(config.port, 9100);
        assert_eq!(config.song_service_url, "http://songs:8082");
        assert_eq!(config.remote_timeout, Duration::from_millis(250));
        assert_eq!(config.log_level, "debug");
    }
}
