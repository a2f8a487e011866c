//! HTTP delivery of outgoing requests.

use reqwest::{Client, StatusCode};
use url::Url;

use crate::transform::OutgoingRequest;

/// Final outcome of one dispatch attempt. Never persisted, only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub success: bool,
    pub detail: Option<String>,
}

impl DispatchOutcome {
    pub fn delivered() -> Self {
        Self {
            success: true,
            detail: None,
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            detail: Some(detail.into()),
        }
    }
}

/// Performs webhook POSTs over a shared HTTP client.
///
/// Deliberately has no request timeout: a stalled endpoint delays the
/// acknowledgment of that one message, nothing else.
pub struct WebhookDispatcher {
    client: Client,
}

impl WebhookDispatcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(format!("webhook-bridge/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// POST one request. Business-level failures (bad scheme, network error,
    /// non-2xx response) come back as a false outcome, never an `Err`.
    pub async fn dispatch(&self, request: &OutgoingRequest) -> DispatchOutcome {
        let url = match Url::parse(&request.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(url = %request.url, error = %e, "Invalid webhook URL");
                return DispatchOutcome::failed(format!("invalid webhook URL: {}", e));
            }
        };
        if url.scheme() != "http" && url.scheme() != "https" {
            tracing::error!(
                url = %request.url,
                scheme = %url.scheme(),
                "Unsupported URL scheme, only http and https are supported"
            );
            return DispatchOutcome::failed(format!("unsupported URL scheme: {}", url.scheme()));
        }

        let mut outgoing = self.client.post(url);
        for (name, value) in &request.headers {
            outgoing = outgoing.header(name.as_str(), value.as_str());
        }

        match outgoing.body(request.body.clone()).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    if status == StatusCode::OK {
                        tracing::info!(url = %request.url, "Webhook delivered");
                    } else {
                        tracing::info!(
                            url = %request.url,
                            status = status.as_u16(),
                            "Webhook responded with non-200 but successful status"
                        );
                    }
                    DispatchOutcome::delivered()
                } else {
                    let body = response.text().await.unwrap_or_default();
                    tracing::error!(
                        url = %request.url,
                        status = status.as_u16(),
                        body = %body,
                        "Webhook request failed"
                    );
                    DispatchOutcome::failed(format!("status {}: {}", status.as_u16(), body))
                }
            }
            Err(e) => {
                tracing::error!(url = %request.url, error = %e, "Error sending to webhook");
                DispatchOutcome::failed(e.to_string())
            }
        }
    }
}
