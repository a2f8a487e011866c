//! AMQP-to-webhook bridge daemon.
//!
//! # Architecture Overview
//!
//! ```text
//!      broker (AMQP)                 WEBHOOK BRIDGE                  HTTP endpoints
//!     ┌────────────┐  deliveries  ┌───────────────────────────┐  POST  ┌──────────┐
//!     │  queue A   │ ───────────▶ │ consumer ─▶ transform ─┐  │ ─────▶ │ endpoint │
//!     │  queue B   │ ───────────▶ │ consumer ─▶ transform ─┼──┼─────▶  │ endpoint │
//!     └────────────┘ ◀─── ack ─── │        dispatch ◀──────┘  │        └──────────┘
//!                                 │                           │
//!                                 │  config │ lifecycle │ obs │
//!                                 └───────────────────────────┘
//! ```
//!
//! One consumer task per configured binding; every delivery is forwarded as
//! an HTTP POST and acknowledged exactly once, success or failure.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use webhook_bridge::config::load_config;
use webhook_bridge::lifecycle::startup;

#[derive(Parser)]
#[command(name = "webhook-bridge")]
#[command(about = "Forwards messages from durable AMQP queues to HTTP webhook endpoints")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webhook_bridge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("webhook-bridge v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(
                path = %cli.config.display(),
                error = %e,
                "Failed to load configuration"
            );
            std::process::exit(1);
        }
    };

    tracing::info!(
        broker_url = %config.broker.url,
        bindings = config.bindings.len(),
        "Configuration loaded"
    );
    for binding in &config.bindings {
        tracing::info!(
            queue = %binding.queue,
            url = %binding.url,
            auth = binding.auth.is_some(),
            "Binding configured"
        );
    }

    if let Err(e) = startup::run(config).await {
        tracing::error!(error = %e, "Unrecoverable error, exiting");
        std::process::exit(1);
    }

    tracing::info!("Shutdown complete");
}
