//! mortgage-leads service.
//!
//! ```text
//!   browser ──▶ listener ──▶ layers (request id, trace, timeout, limits, CORS, headers)
//!                              │
//!                              ├─▶ POST /api/leads ──▶ rate limit ──▶ intake ──▶ leads.json
//!                              ├─▶ POST /api/calculators/*
//!                              ├─▶ GET  /health, /admin/*
//!                              └─▶ static site (index.html fallback)
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use mortgage_leads::config::{load_config, validate_config, ConfigWatcher, LeadsConfig};
use mortgage_leads::lifecycle::{wait_for_signal, Shutdown};
use mortgage_leads::observability::{logging, metrics};
use mortgage_leads::HttpServer;

#[derive(Parser)]
#[command(name = "mortgage-leads", version, about = "Lead capture service for the mortgage site")]
struct Args {
    /// TOML configuration file. Watched for changes.
    #[arg(short, long, env = "MORTGAGE_LEADS_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let config = LeadsConfig::default();
            if let Err(errors) = validate_config(&config) {
                return Err(format!("invalid default configuration: {errors:?}").into());
            }
            config
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "mortgage-leads starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        leads_path = %config.storage.leads_path,
        rate_limit_window_secs = config.rate_limit.window_secs,
        rate_limit_max_requests = config.rate_limit.max_requests,
        admin_enabled = config.admin.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    // Watcher must stay alive for the life of the server.
    let (_watcher, config_updates) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_tx, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let server_task = tokio::spawn(server.run(listener, config_updates, shutdown.subscribe()));

    wait_for_signal().await;
    tracing::info!("Shutting down");
    shutdown.trigger();

    server_task.await??;
    tracing::info!("Shutdown complete");
    Ok(())
}
