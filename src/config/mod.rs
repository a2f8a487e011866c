//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BridgeConfig (validated, immutable)
//!     → passed into each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable for the process lifetime; no reload, no dynamic
//!   add/remove of bindings
//! - Broker and observability sections have defaults; bindings must be
//!   spelled out
//! - Validation separates syntactic (serde) from semantic checks and
//!   reports every problem, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{Binding, BridgeConfig, BrokerConfig, ObservabilityConfig, PayloadFormat};
