//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order from validated configuration
//! - Connect to the broker, start all consumers, then wait for a signal
//! - Close the broker connection on both termination paths
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and maps to exit code 1
//! - A signal maps to a graceful close and exit code 0
//! - Close errors during teardown are logged, never escalated

use std::sync::Arc;

use lapin::{Connection, ConnectionProperties};
use thiserror::Error;

use crate::broker::{connect_with_retry, ConnectError, ConnectPolicy, ConsumerManager, SetupError};
use crate::config::BridgeConfig;
use crate::dispatch::WebhookDispatcher;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

/// Unrecoverable startup error. The process exits nonzero on any of these.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("webhook client initialization failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error(transparent)]
    Connect(#[from] ConnectError<lapin::Error>),

    #[error(transparent)]
    Setup(#[from] SetupError),
}

/// Run the bridge until a termination signal arrives.
pub async fn run(config: BridgeConfig) -> Result<(), FatalError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let dispatcher = Arc::new(WebhookDispatcher::new()?);

    let policy = ConnectPolicy::from_config(&config.broker);
    let broker_url = config.broker.url.as_str();
    let connection = connect_with_retry(&policy, || {
        Connection::connect(broker_url, ConnectionProperties::default())
    })
    .await?;

    let shutdown = Shutdown::new();
    let manager = ConsumerManager::new(dispatcher);
    if let Err(e) = manager
        .start_all(&connection, &config.bindings, &shutdown)
        .await
    {
        close_connection(&connection).await;
        return Err(e.into());
    }

    tracing::info!("Webhook bridge is running and waiting for messages");

    let signal = signals::wait_for_signal().await;
    tracing::info!(signal, "Termination signal received, closing broker connection");
    shutdown.trigger();
    close_connection(&connection).await;

    Ok(())
}

async fn close_connection(connection: &Connection) {
    if let Err(e) = connection.close(200, "shutting down").await {
        tracing::warn!(error = %e, "Error closing broker connection");
    }
}
