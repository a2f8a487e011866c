//! AMQP-to-webhook bridge library.

pub mod broker;
pub mod config;
pub mod dispatch;
pub mod lifecycle;
pub mod observability;
pub mod transform;

pub use config::{Binding, BridgeConfig};
pub use dispatch::{DispatchOutcome, WebhookDispatcher};
pub use lifecycle::Shutdown;
pub use transform::{build_request, OutgoingRequest};
