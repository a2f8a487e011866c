//! Webhook dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! OutgoingRequest
//!     → webhook.rs (scheme check, HTTP POST, status classification)
//!     → DispatchOutcome (success flag + diagnostic text)
//! ```
//!
//! # Design Decisions
//! - Dispatch never returns an error; every network or remote failure is
//!   folded into a false outcome so the caller's ack path is unconditional
//! - Only http and https URLs are dispatched; anything else fails locally
//!   without a network call
//! - Any 2xx status is success; non-2xx captures the response body for
//!   diagnostics

pub mod webhook;

pub use webhook::{DispatchOutcome, WebhookDispatcher};
