//! Forward-proxy gateway binary.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌───────────────────────────────────────────────┐
//!                       │               FORWARD GATEWAY                  │
//!                       │                                               │
//!   Client Request      │  ┌─────────┐   ┌──────────┐   ┌────────────┐ │
//!   ────────────────────┼─▶│  http   │──▶│ routing  │──▶│  forward   │─┼──▶ Destination
//!                       │  │ server  │   │ decision │   │  engine    │ │    (any host the
//!                       │  └─────────┘   └──────────┘   └────────────┘ │     client names)
//!                       │       │              │               │       │
//!   Client Response     │  ┌─────────┐   ┌──────────┐   ┌────────────┐ │
//!   ◀───────────────────┼──│  CORS   │◀──│ response │◀──│  header    │◀┼──── upstream
//!                       │  │ headers │   │ finalize │   │  rewrite   │ │     response
//!                       │  └─────────┘   └──────────┘   └────────────┘ │
//!                       │                                               │
//!                       │  Cross-cutting: config, observability,        │
//!                       │  lifecycle (startup / graceful shutdown)      │
//!                       └───────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;

use forward_gateway::config::{self, GatewayConfig};
use forward_gateway::http::HttpServer;
use forward_gateway::lifecycle::Shutdown;
use forward_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "forward-gateway")]
#[command(about = "Single-hop HTTP forward-proxy gateway", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener port from the config file.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => match config::load_config(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to load configuration");
                return ExitCode::FAILURE;
            }
        },
        None => GatewayConfig::default(),
    };

    if let Some(port) = cli.port {
        config.listener.bind_address = match config.listener.bind_address.parse::<SocketAddr>() {
            Ok(addr) => SocketAddr::new(addr.ip(), port).to_string(),
            Err(_) => format!("0.0.0.0:{}", port),
        };
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_redirects = config.forwarding.max_redirects,
        connect_timeout_secs = config.timeouts.connect_secs,
        response_timeout_secs = config.timeouts.response_secs,
        "Configuration loaded"
    );

    // Bind failure (port in use, bad address) is fatal to startup
    let listener = match TcpListener::bind(&config.listener.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(
                address = %config.listener.bind_address,
                error = %e,
                "Failed to bind listener; is the port already in use?"
            );
            return ExitCode::FAILURE;
        }
    };

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = match HttpServer::new(&config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize outbound client");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    shutdown.trigger_on_interrupt();

    if let Err(e) = server.run(listener, shutdown.subscribe()).await {
        tracing::error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
