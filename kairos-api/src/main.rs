//! kairos-api - KAIROS concept service
//!
//! Serves concept extraction for recognized objects, symbolic equation
//! solving, and concept relationship graphs over HTTP.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kairos_common::concepts::KNOWLEDGE_BASE;
use kairos_common::config::{
    resolve_service_config, CliOverrides, DEFAULT_LOG_LEVEL, ENV_LOG_LEVEL,
};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

use kairos_api::{build_router, AppState};

/// Command-line arguments for kairos-api
#[derive(Parser, Debug)]
#[command(name = "kairos-api")]
#[command(about = "Concept extraction and equation solving service for KAIROS")]
#[command(version)]
struct Args {
    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level or filter directive (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Tracing starts before config resolution. The filter is reloaded once
    // the config file's log level is known.
    let early_level = args
        .log_level
        .clone()
        .or_else(|| std::env::var(ENV_LOG_LEVEL).ok())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let (filter, filter_handle) = reload::Layer::new(log_filter(&early_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting KAIROS API (kairos-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = resolve_service_config(&CliOverrides {
        host: args.host,
        port: args.port,
        config_file: args.config,
        log_level: args.log_level,
    })
    .context("Failed to resolve configuration")?;

    if config.log_level != early_level {
        filter_handle
            .reload(log_filter(&config.log_level))
            .context("Failed to apply configured log level")?;
    }
    info!(
        "Configuration: bind {}, log level {}",
        config.bind_address(),
        config.log_level
    );
    info!("Knowledge base: {} objects", KNOWLEDGE_BASE.len());

    let app = build_router(AppState::default());

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("kairos-api listening on http://{}", addr);
    info!("Health check: http://{}/api/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// `RUST_LOG` when set, otherwise `level` for this service's crates
fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "kairos_api={0},kairos_common={0},tower_http={0}",
            level
        ))
    })
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
