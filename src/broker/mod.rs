//! Broker connectivity subsystem.
//!
//! # Data Flow
//! ```text
//! broker URL
//!     → connector.rs (bounded retry, fixed delay)
//!     → lapin::Connection (one per process)
//!     → consumer.rs (channel + durable queue + consumer per binding)
//!     → transform → dispatch → ack, per delivery
//! ```
//!
//! # Design Decisions
//! - One connection, one channel per binding; channels are never shared
//!   across bindings
//! - Every delivery is acknowledged exactly once, whatever the dispatch
//!   outcome
//! - Consumer setup fails fast; a single bad binding aborts startup

pub mod connector;
pub mod consumer;

pub use connector::{connect_with_retry, ConnectError, ConnectPolicy};
pub use consumer::{ConsumerManager, SetupError};
