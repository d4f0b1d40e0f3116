//! restkit demo server
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ request id ─▶ trace ─▶ timeout ─▶ CORS before ──┬─▶ routes
//!                                                          │            │
//!                                                 preflight / 403       │
//!                                                          ▼            ▼
//!     Client Response ◀──────────────────────────────── CORS after ◀────┘
//! ```
//!
//! Usage: `restkit [--config config.toml]`. Without a file every setting
//! takes its default.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use restkit::config::{load_config, RestKitConfig};
use restkit::observability::{logging, metrics};
use restkit::HttpServer;

#[derive(Parser)]
#[command(name = "restkit")]
#[command(about = "Demo server guarded by the CORS admission filter", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = Args::parse().config;
    let config = match &config_path {
        Some(path) => load_config(path)?,
        None => RestKitConfig::default(),
    };

    logging::init(&config.observability.log_level)?;

    tracing::info!("restkit v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config = ?config_path,
        bind_address = %config.server.bind_address,
        allowed_origins = %config.cors.allowed_origins,
        request_timeout_secs = config.server.request_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
