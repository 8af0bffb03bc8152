//! mplat-rs (Resource Service)
//!
//! Stores uploaded MP3 files and keeps song metadata in the Song Service paired with
//! each stored file.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mplat_common::config::load_toml_config;
use mplat_common::shutdown::shutdown_signal;
use mplat_rs::config::{ConfigOverrides, ResourceServiceConfig, MODULE_NAME};
use mplat_rs::db::{init_database_pool, SqliteResourceStore};
use mplat_rs::services::{HttpSongGateway, Mp3Inspector};
use mplat_rs::{build_router, AppState};

/// Command-line arguments for mplat-rs
#[derive(Parser, Debug)]
#[command(name = "mplat-rs")]
#[command(about = "Resource Service: MP3 storage paired with Song Service metadata")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "MPLAT_RS_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "MPLAT_RS_PORT")]
    port: Option<u16>,

    /// SQLite database file
    #[arg(long, env = "MPLAT_RS_DATABASE")]
    database: Option<PathBuf>,

    /// Song Service base URL
    #[arg(long, env = "MPLAT_SONG_SERVICE_URL")]
    song_service_url: Option<String>,

    /// Song Service request timeout in milliseconds
    #[arg(long, env = "MPLAT_RS_REMOTE_TIMEOUT_MS")]
    remote_timeout_ms: Option<u64>,

    /// Maximum upload size in bytes
    #[arg(long, env = "MPLAT_RS_MAX_UPLOAD_BYTES")]
    max_upload_bytes: Option<usize>,

    /// Log level (overrides the TOML logging.level)
    #[arg(long, env = "MPLAT_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            database_path: self.database.clone(),
            song_service_url: self.song_service_url.clone(),
            remote_timeout_ms: self.remote_timeout_ms,
            max_upload_bytes: self.max_upload_bytes,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = load_toml_config(args.config.as_deref(), MODULE_NAME)
        .context("Failed to load configuration")?;
    let config = ResourceServiceConfig::resolve(args.overrides(), toml_config);

    // RUST_LOG wins over configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting mplat Resource Service (mplat-rs) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Database: {}", config.database_path.display());
    info!(
        "Song service: {} (timeout {} ms)",
        config.song_service_url,
        config.remote_timeout.as_millis()
    );

    let pool = init_database_pool(&config.database_path)
        .await
        .context("Failed to open resource database")?;
    info!("✓ Connected to database");

    let store = Arc::new(SqliteResourceStore::new(pool));
    let gateway = Arc::new(
        HttpSongGateway::new(config.song_service_url.clone(), config.remote_timeout)
            .context("Failed to create song service client")?,
    );
    let inspector = Arc::new(Mp3Inspector::new());

    let state = AppState::new(store, gateway, inspector, config.max_upload_bytes);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("mplat-rs listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}
