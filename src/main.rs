//! Autometer gateway.
//!
//! Makes the autometer backend reachable from browsers on other origins.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                   GATEWAY                     │
//!   Browser request     │  ┌──────────┐   OPTIONS   ┌──────────────┐    │
//!   /api/<path>  ───────┼─▶│  router  │────────────▶│ 200 + CORS   │    │
//!                       │  │ (mount)  │             └──────────────┘    │
//!                       │  └────┬─────┘                                 │
//!                       │       │ other methods                         │
//!                       │       ▼                                       │
//!                       │  ┌──────────┐           ┌──────────────┐      │
//!                       │  │ request  │──────────▶│ hyper client │──────┼──▶ <origin>/<path>
//!                       │  │ rewrite  │           └──────┬───────┘      │
//!                       │  └──────────┘                  │              │
//!   JSON response       │  ┌──────────┐                  │              │
//!   ◀───────────────────┼──│ response │◀─────────────────┘              │
//!                       │  │ decode   │   failure → 500 {error,message} │
//!                       │  └──────────┘                                 │
//!                       └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use autometer_gateway::config::{load_config, load_from_env};
use autometer_gateway::lifecycle::{shutdown_signal, Shutdown};
use autometer_gateway::observability::init_logging;
use autometer_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "autometer-gateway")]
#[command(about = "Forwards browser requests to the autometer backend", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults plus AUTOMETER_* overrides when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };

    init_logging(&config.observability)?;

    tracing::info!("autometer-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.normalized_origin(),
        mount_path = %config.backend.mount_path,
        upstream_timeout_secs = ?config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        trigger.trigger();
    });

    let server = HttpServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
