//! Per-binding queue consumption.

use std::sync::Arc;

use futures_util::StreamExt;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicQosOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{Channel, Connection, Consumer};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::config::Binding;
use crate::dispatch::WebhookDispatcher;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::transform::build_request;

/// Error during consumer setup. Any one of these aborts startup; consumers
/// already started are not rolled back.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to open channel for queue '{queue}': {source}")]
    Channel {
        queue: String,
        source: lapin::Error,
    },

    #[error("failed to set prefetch on queue '{queue}': {source}")]
    Qos {
        queue: String,
        source: lapin::Error,
    },

    #[error("failed to declare queue '{queue}': {source}")]
    Declare {
        queue: String,
        source: lapin::Error,
    },

    #[error("failed to register consumer on queue '{queue}': {source}")]
    Consume {
        queue: String,
        source: lapin::Error,
    },
}

/// Starts and owns one consumer task per binding.
///
/// All consumers share one broker connection but get their own channel, so
/// a slow endpoint on one binding never interferes with another.
pub struct ConsumerManager {
    dispatcher: Arc<WebhookDispatcher>,
}

impl ConsumerManager {
    pub fn new(dispatcher: Arc<WebhookDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Set up every binding concurrently and fail fast on the first error.
    pub async fn start_all(
        &self,
        connection: &Connection,
        bindings: &[Binding],
        shutdown: &Shutdown,
    ) -> Result<(), SetupError> {
        let setups = bindings
            .iter()
            .map(|binding| self.start_binding(connection, binding, shutdown));
        futures_util::future::try_join_all(setups).await?;

        tracing::info!(consumers = bindings.len(), "All queue consumers set up");
        Ok(())
    }

    /// Declare the queue and register the consumer for one binding, then
    /// spawn the task that drives its delivery stream.
    async fn start_binding(
        &self,
        connection: &Connection,
        binding: &Binding,
        shutdown: &Shutdown,
    ) -> Result<(), SetupError> {
        tracing::info!(
            queue = %binding.queue,
            url = %binding.url,
            prefetch = binding.prefetch,
            "Starting consumer"
        );

        let channel = connection
            .create_channel()
            .await
            .map_err(|source| SetupError::Channel {
                queue: binding.queue.clone(),
                source,
            })?;

        channel
            .basic_qos(binding.prefetch, BasicQosOptions::default())
            .await
            .map_err(|source| SetupError::Qos {
                queue: binding.queue.clone(),
                source,
            })?;

        // Idempotent: asserts durability whether or not the queue pre-exists.
        channel
            .queue_declare(
                &binding.queue,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|source| SetupError::Declare {
                queue: binding.queue.clone(),
                source,
            })?;

        let consumer = channel
            .basic_consume(
                &binding.queue,
                &format!("bridge-{}", binding.queue),
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(|source| SetupError::Consume {
                queue: binding.queue.clone(),
                source,
            })?;

        tokio::spawn(consume_loop(
            binding.clone(),
            channel,
            consumer,
            self.dispatcher.clone(),
            shutdown.subscribe(),
        ));

        tracing::info!(queue = %binding.queue, "Consumer registered");
        Ok(())
    }
}

/// Drive one binding's delivery stream until shutdown or server-side cancel.
async fn consume_loop(
    binding: Binding,
    channel: Channel,
    mut consumer: Consumer,
    dispatcher: Arc<WebhookDispatcher>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            delivery = consumer.next() => match delivery {
                Some(Ok(delivery)) => {
                    // Each delivery gets its own task: with prefetch > 1 the
                    // broker pushes further messages before earlier ones are
                    // acknowledged, and a stalled webhook must only stall its
                    // own message.
                    let binding = binding.clone();
                    let channel = channel.clone();
                    let dispatcher = dispatcher.clone();
                    tokio::spawn(async move {
                        handle_delivery(delivery, &binding, &channel, &dispatcher).await;
                    });
                }
                Some(Err(e)) => {
                    tracing::warn!(queue = %binding.queue, error = %e, "Error on delivery stream");
                }
                None => {
                    tracing::warn!(
                        queue = %binding.queue,
                        "Delivery stream closed, consumer cancelled by server?"
                    );
                    break;
                }
            },
            _ = shutdown.recv() => {
                tracing::info!(queue = %binding.queue, "Consumer received shutdown signal, exiting loop");
                break;
            }
        }
    }
}

/// Transform, dispatch, acknowledge. The ack happens exactly once per
/// delivery, success or failure: a failing endpoint must not trap the queue
/// in a redelivery loop. Queue-to-webhook delivery is at-most-once.
async fn handle_delivery(
    delivery: lapin::message::Delivery,
    binding: &Binding,
    channel: &Channel,
    dispatcher: &WebhookDispatcher,
) {
    let content = String::from_utf8_lossy(&delivery.data).into_owned();
    tracing::debug!(
        queue = %binding.queue,
        bytes = delivery.data.len(),
        "Message received"
    );
    metrics::record_message(&binding.queue);

    let request = build_request(&content, binding);
    let outcome = dispatcher.dispatch(&request).await;
    metrics::record_dispatch(&binding.queue, outcome.success);

    if let Err(e) = channel
        .basic_ack(delivery.delivery_tag, BasicAckOptions::default())
        .await
    {
        tracing::error!(
            queue = %binding.queue,
            delivery_tag = delivery.delivery_tag,
            error = %e,
            "Failed to acknowledge message"
        );
    }

    if outcome.success {
        tracing::info!(queue = %binding.queue, "Message forwarded");
    } else {
        tracing::warn!(
            queue = %binding.queue,
            detail = outcome.detail.as_deref().unwrap_or(""),
            "Message acknowledged despite webhook failure to prevent a requeue loop"
        );
    }
}
