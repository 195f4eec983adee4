//! Round-Robin HTTP Load Balancer
//!
//! Distributes inbound HTTP requests across a fixed set of upstream
//! servers, skipping backends believed dead and failing over to a
//! different backend when a forward attempt hits a transport error.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────┐
//!                      │                LOAD BALANCER               │
//!                      │                                            │
//!   Client Request     │  ┌─────────┐    ┌──────────────┐          │
//!   ──────────────────▶│  │  http   │───▶│load_balancer │          │
//!                      │  │ server  │    │ (server pool)│          │
//!                      │  └────┬────┘    └──────┬───────┘          │
//!                      │       │                │ next live peer    │
//!                      │       ▼                ▼                   │
//!   Client Response    │  ┌─────────┐    ┌──────────────┐          │     Backend
//!   ◀──────────────────┼──│response │◀───│   forward    │◀─────────┼──── Servers
//!                      │  │ relay   │    │  (transport) │          │
//!                      │  └─────────┘    └──────────────┘          │
//!                      │                                            │
//!                      │  ┌──────────────────────────────────────┐ │
//!                      │  │   health monitor (periodic probes)   │ │
//!                      │  │   config · lifecycle · tracing       │ │
//!                      │  └──────────────────────────────────────┘ │
//!                      └────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use http_balancer::config::{load_config, validate_config, BalancerConfig, ConfigError};
use http_balancer::http::HttpServer;
use http_balancer::lifecycle::Shutdown;

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(name = "http-balancer", version, about = "Round-robin HTTP load balancer")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Load balanced backends, use commas to separate.
    #[arg(long, value_delimiter = ',')]
    backends: Vec<String>,

    /// Port to serve on.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "http_balancer=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // File config first, flags override.
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BalancerConfig::default(),
    };
    if !cli.backends.is_empty() {
        config.backends = cli.backends.clone();
    }
    if let Some(port) = cli.port {
        config.listener.bind_address = format!("0.0.0.0:{}", port);
    }

    // Malformed addresses or an empty backend list are fatal here; the
    // process never starts serving with a bad candidate set.
    let backends = validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backends = backends.len(),
        max_attempts = config.proxy.max_attempts,
        health_interval_secs = config.health_check.interval_secs,
        "Configuration loaded"
    );
    for url in &backends {
        tracing::info!(addr = %url, "Configured backend");
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Shutdown signal received"),
                Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C"),
            }
            shutdown.trigger();
        });
    }

    let server = HttpServer::new(config, backends);
    server.run(listener, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
