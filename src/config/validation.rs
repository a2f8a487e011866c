//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check required fields are non-empty (broker URL, queue names, webhook URLs)
//! - Validate value ranges (connect attempts, prefetch)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Webhook URL schemes are NOT checked here; an unsupported scheme is a
//!   per-dispatch failure, not a startup failure

use crate::config::schema::BridgeConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No broker URL configured.
    EmptyBrokerUrl,
    /// Connection retry would never attempt anything.
    ZeroConnectAttempts,
    /// The binding list is empty.
    NoBindings,
    /// A binding has an empty queue name.
    EmptyQueueName { index: usize },
    /// A binding has an empty webhook URL.
    EmptyWebhookUrl { queue: String },
    /// A binding has a zero prefetch window.
    ZeroPrefetch { queue: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyBrokerUrl => write!(f, "broker.url is required"),
            ValidationError::ZeroConnectAttempts => {
                write!(f, "broker.max_connect_attempts must be at least 1")
            }
            ValidationError::NoBindings => {
                write!(f, "at least one binding is required")
            }
            ValidationError::EmptyQueueName { index } => {
                write!(f, "bindings[{}]: queue must not be empty", index)
            }
            ValidationError::EmptyWebhookUrl { queue } => {
                write!(f, "binding for queue '{}': url must not be empty", queue)
            }
            ValidationError::ZeroPrefetch { queue } => {
                write!(f, "binding for queue '{}': prefetch must be at least 1", queue)
            }
        }
    }
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.broker.url.is_empty() {
        errors.push(ValidationError::EmptyBrokerUrl);
    }
    if config.broker.max_connect_attempts == 0 {
        errors.push(ValidationError::ZeroConnectAttempts);
    }

    if config.bindings.is_empty() {
        errors.push(ValidationError::NoBindings);
    }
    for (index, binding) in config.bindings.iter().enumerate() {
        if binding.queue.is_empty() {
            errors.push(ValidationError::EmptyQueueName { index });
        }
        if binding.url.is_empty() {
            errors.push(ValidationError::EmptyWebhookUrl {
                queue: binding.queue.clone(),
            });
        }
        if binding.prefetch == 0 {
            errors.push(ValidationError::ZeroPrefetch {
                queue: binding.queue.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
