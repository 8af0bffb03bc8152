//! Bootstrap configuration loading
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Arguments and environment variables are handled by each binary's `clap` definition;
//! this module covers the TOML file and the compiled defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Directory name used under the platform config and data directories
pub const APP_DIR: &str = "mplat";

/// TOML bootstrap configuration
///
/// Every key is optional. Keys a module does not use are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// HTTP listen port
    #[serde(default)]
    pub port: Option<u16>,

    /// SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Base URL of the Song Service (Resource Service only)
    #[serde(default)]
    pub song_service_url: Option<String>,

    /// Timeout for calls to the Song Service in milliseconds (Resource Service only)
    #[serde(default)]
    pub remote_timeout_ms: Option<u64>,

    /// Maximum accepted upload size in bytes (Resource Service only)
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default TOML location for a module: `<config_dir>/mplat/<module>.toml`
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(format!("{}.toml", module_name)))
}

/// OS-dependent data folder
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("./mplat_data"))
}

/// Default database file for a module: `<data_local_dir>/mplat/<module>.db`
pub fn default_database_path(module_name: &str) -> PathBuf {
    default_data_dir().join(format!("{}.db", module_name))
}

/// Load the TOML config for a module
///
/// An explicitly requested file must exist. When no file is requested, the default
/// location is tried and a missing file falls back to defaults with a warning.
/// A file that exists but does not parse is always an error.
pub fn load_toml_config(explicit_path: Option<&Path>, module_name: &str) -> Result<TomlConfig> {
    let path = match explicit_path {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path(module_name) {
            Some(path) if path.exists() => path,
            Some(path) => {
                warn!(
                    "No config file at {} - using defaults",
                    path.display()
                );
                return Ok(TomlConfig::default());
            }
            None => {
                warn!("Could not determine config directory - using defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    let config = parse_toml_file(&path)?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Parse a TOML config file
pub fn parse_toml_file(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

/// Pick the first configured value, falling back to the compiled default
pub fn resolve_setting<T>(override_value: Option<T>, toml_value: Option<T>, default: T) -> T {
    override_value.or(toml_value).unwrap_or(default)
}
