//! Broker connection establishment with bounded retry.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::config::BrokerConfig;
use crate::observability::metrics;

/// Retry parameters for connection establishment.
///
/// The delay is fixed, not exponential: the broker is typically a co-located
/// service restarting on the same deployment cycle, so a short constant wait
/// keeps reconnection time bounded and predictable.
#[derive(Debug, Clone, Copy)]
pub struct ConnectPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl ConnectPolicy {
    pub fn from_config(config: &BrokerConfig) -> Self {
        Self {
            max_attempts: config.max_connect_attempts,
            retry_delay: Duration::from_millis(config.connect_retry_delay_ms),
        }
    }
}

/// All connection attempts failed; carries the last broker error.
#[derive(Debug, Error)]
#[error("broker unreachable after {attempts} attempts: {source}")]
pub struct ConnectError<E: std::error::Error + 'static> {
    pub attempts: u32,
    #[source]
    pub source: E,
}

/// Establish a connection, retrying on failure with a fixed delay.
///
/// `connect` is called once per attempt. Attempts are numbered from 1; after
/// `max_attempts` failures the last error propagates as fatal. Generic over
/// the connect future so the retry loop is exercised in tests without a
/// live broker.
pub async fn connect_with_retry<T, E, F, Fut>(
    policy: &ConnectPolicy,
    mut connect: F,
) -> Result<T, ConnectError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::error::Error + 'static,
{
    let mut attempt = 1;
    loop {
        tracing::info!(attempt, "Connecting to broker");
        match connect().await {
            Ok(connection) => {
                tracing::info!(attempt, "Broker connection established");
                metrics::record_connect_attempt(true);
                return Ok(connection);
            }
            Err(e) => {
                tracing::error!(attempt, error = %e, "Failed to connect to broker");
                metrics::record_connect_attempt(false);
                if attempt >= policy.max_attempts {
                    tracing::error!(attempts = attempt, "Connection attempts exhausted");
                    return Err(ConnectError {
                        attempts: attempt,
                        source: e,
                    });
                }
                tracing::info!(
                    delay_ms = policy.retry_delay.as_millis() as u64,
                    "Retrying broker connection after delay"
                );
                tokio::time::sleep(policy.retry_delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refused() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused")
    }

    fn policy() -> ConnectPolicy {
        ConnectPolicy {
            max_attempts: 10,
            retry_delay: Duration::from_secs(5),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_first_attempt_without_waiting() {
        let started = tokio::time::Instant::now();
        let result = connect_with_retry(&policy(), || async { Ok::<_, std::io::Error>(7u32) }).await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_with_fixed_delay_until_success() {
        let mut calls = 0u32;
        let started = tokio::time::Instant::now();

        let result = connect_with_retry(&policy(), || {
            calls += 1;
            let fail = calls <= 3;
            async move {
                if fail {
                    Err(refused())
                } else {
                    Ok(42u32)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 4);
        // Three failures, each followed by the fixed 5 s wait.
        assert_eq!(started.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_propagates_last_error() {
        let mut calls = 0u32;
        let started = tokio::time::Instant::now();

        let result = connect_with_retry(&policy(), || {
            calls += 1;
            async { Err::<u32, _>(refused()) }
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.attempts, 10);
        assert_eq!(err.source.kind(), std::io::ErrorKind::ConnectionRefused);
        assert_eq!(calls, 10);
        // No wait after the final failure.
        assert_eq!(started.elapsed(), Duration::from_secs(45));
    }

    #[tokio::test]
    async fn single_attempt_policy_never_sleeps() {
        let single = ConnectPolicy {
            max_attempts: 1,
            retry_delay: Duration::from_secs(5),
        };
        let mut calls = 0u32;

        let result = connect_with_retry(&single, || {
            calls += 1;
            async { Err::<u32, _>(refused()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
