//! mplat-ss (Song Service)
//!
//! Stores song metadata records keyed by Resource Service ids.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mplat_common::config::load_toml_config;
use mplat_common::shutdown::shutdown_signal;
use mplat_ss::config::{ConfigOverrides, SongServiceConfig, MODULE_NAME};
use mplat_ss::db::init_database_pool;
use mplat_ss::{build_router, AppState};

/// Command-line arguments for mplat-ss
#[derive(Parser, Debug)]
#[command(name = "mplat-ss")]
#[command(about = "Song Service: song metadata keyed by resource id")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "MPLAT_SS_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "MPLAT_SS_PORT")]
    port: Option<u16>,

    /// SQLite database file
    #[arg(long, env = "MPLAT_SS_DATABASE")]
    database: Option<PathBuf>,

    /// Log level (overrides the TOML logging.level)
    #[arg(long, env = "MPLAT_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = load_toml_config(args.config.as_deref(), MODULE_NAME)
        .context("Failed to load configuration")?;
    let config = SongServiceConfig::resolve(
        ConfigOverrides {
            port: args.port,
            database_path: args.database,
            log_level: args.log_level,
        },
        toml_config,
    );

    // RUST_LOG wins over configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting mplat Song Service (mplat-ss) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Database: {}", config.database_path.display());

    let pool = init_database_pool(&config.database_path)
        .await
        .context("Failed to open song database")?;
    info!("✓ Connected to database");

    let app = build_router(AppState::new(pool));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("mplat-ss listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}
