//! allauth-proxy
//!
//! Forwards authentication requests from a frontend to the backend
//! authentication API.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request          ┌──────────────────────────────────────────────┐
//!     ────────────────────────┼─▶ http server ──▶ forwarder ──▶ csrf source ─┼──── GET {origin}/csrf/
//!                             │   (per verb)         │                       │
//!                             │                      ▼                       │
//!     Client Response         │               backend call  ─────────────────┼───▶ {origin}/_allauth/{path}
//!     ◀───────────────────────┼── response relay ◀───┘ (minus set-cookie)    │
//!                             │                                              │
//!                             │   config · observability · lifecycle         │
//!                             └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use allauth_proxy::config::load_config;
use allauth_proxy::lifecycle::shutdown_signal;
use allauth_proxy::observability::{logging, metrics};
use allauth_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "allauth-proxy")]
#[command(about = "Reverse proxy for the authentication API", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind.to_string();
    }

    logging::init_logging(&config.observability);

    tracing::info!("allauth-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.origin,
        max_body_size = config.security.max_body_size,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
