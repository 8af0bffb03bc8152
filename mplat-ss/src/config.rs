//! Configuration resolution for mplat-ss

use mplat_common::config::{default_database_path, resolve_setting, TomlConfig};
use std::path::PathBuf;

/// Module name used for config and database file names
pub const MODULE_NAME: &str = "mplat-ss";

pub const DEFAULT_PORT: u16 = 8082;

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved Song Service configuration
#[derive(Debug, Clone)]
pub struct SongServiceConfig {
    pub port: u16,
    pub database_path: PathBuf,
    pub log_level: String,
}

impl SongServiceConfig {
    pub fn resolve(overrides: ConfigOverrides, toml: TomlConfig) -> Self {
        Self {
            port: resolve_setting(overrides.port, toml.port, DEFAULT_PORT),
            database_path: resolve_setting(
                overrides.database_path,
                toml.database_path,
                default_database_path(MODULE_NAME),
            ),
            log_level: resolve_setting(overrides.log_level, None, toml.logging.level),
        }
    }
}
