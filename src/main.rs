//! CI/CD Lab App
//!
//! A small HTTP service that serves a welcome message, appending a beta
//! suffix when a remotely-managed feature flag is enabled.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                  SERVICE                     │
//!                       │                                              │
//!   GET /health ────────┼─▶ fixed "OK" (never touches flag state)      │
//!                       │                                              │
//!   GET / ──────────────┼─▶ http/server ──▶ flags/client ──┐           │
//!                       │        ▲                         │ read      │
//!                       │        │                         ▼           │
//!                       │   message/fallback        current snapshot   │
//!                       │   config                        ▲            │
//!                       │                                 │ atomic swap│
//!                       │                          flags/refresh ◀─────┼── flag provider
//!                       │                                              │    (HTTP, polled)
//!                       │  ┌────────────────────────────────────────┐  │
//!                       │  │          Cross-Cutting Concerns        │  │
//!                       │  │   config │ lifecycle │ observability   │  │
//!                       │  └────────────────────────────────────────┘  │
//!                       └──────────────────────────────────────────────┘
//! ```
//!
//! Readiness strategy: serve-with-fallback. Both routes are reachable from
//! the first accepted connection; the content route uses the configured
//! fallback value until the flag client's first successful fetch.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use cicd_lab_app::config;
use cicd_lab_app::flags::FlagClient;
use cicd_lab_app::http::HttpServer;
use cicd_lab_app::lifecycle::{signals, Shutdown};
use cicd_lab_app::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "cicd-lab-app", version, about = "Flag-gated welcome service")]
struct Args {
    /// Path to a TOML configuration file. Environment variables override it.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = config::load_config(args.config.as_deref())?;

    logging::init(&config.observability.log_level);

    tracing::info!(
        port = config.server.port,
        provider_url = %config.provider.url,
        flag = %config.message.flag_name,
        refresh_interval_secs = config.provider.refresh_interval_secs,
        fallback_beta_enabled = config.fallback.beta_enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let shutdown = Shutdown::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            signals::wait_for_signal().await;
            shutdown.trigger();
        });
    }

    // Bind before flag initialization so probes can connect from the start;
    // /health never depends on the provider.
    let bind = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = TcpListener::bind(&bind).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // Non-blocking: the handle is usable immediately, the first fetch runs in
    // the background. An unreachable provider is not a startup error.
    let flags = FlagClient::initialize(&config.provider, &shutdown)?;

    let server = HttpServer::new(&config, flags.clone());
    let served = server.run(listener, shutdown.subscribe()).await;

    // Stop the refresh loop even if the server exited on an error.
    shutdown.trigger();
    flags
        .shutdown(Duration::from_secs(config.lifecycle.grace_period_secs))
        .await;
    served?;

    tracing::info!("Shutdown complete");
    Ok(())
}
